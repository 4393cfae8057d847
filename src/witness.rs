use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::{BigInt, Sign};
use num_traits::Num;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named circuit inputs as decimal strings, i.e. a snarkjs `input.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Witness(BTreeMap<String, String>);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("signal `{name}` has non-numeric value `{value}`")]
pub struct WitnessError {
    pub name: String,
    pub value: String,
}

impl Witness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl ToString, value: impl ToString) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses every value as an integer. Accepts an optional `-` and `0x` hex.
    pub fn to_bigints(&self) -> Result<BTreeMap<String, BigInt>, WitnessError> {
        self.0
            .iter()
            .map(|(name, value)| {
                parse_signed(value)
                    .map(|v| (name.clone(), v))
                    .ok_or_else(|| WitnessError {
                        name: name.clone(),
                        value: value.clone(),
                    })
            })
            .collect()
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for Witness {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

fn parse_signed(value: &str) -> Option<BigInt> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let magnitude = match digits.strip_prefix("0x") {
        Some(hex) => BigInt::from_str_radix(hex, 16).ok()?,
        None => BigInt::from_str_radix(digits, 10).ok()?,
    };
    if magnitude.sign() == Sign::Minus {
        return None;
    }
    Some(if negative { -magnitude } else { magnitude })
}

/// Reduces an integer into the scalar field the way circom does:
/// negative values wrap to `r - |x|`.
pub fn to_field(value: &BigInt) -> Fr {
    let (sign, magnitude) = value.to_bytes_le();
    let el = Fr::from_le_bytes_mod_order(&magnitude);
    match sign {
        Sign::Minus => -el,
        _ => el,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_input_json() {
        let w = Witness::new().with("in1", 1).with("in2", "2");
        assert_eq!(
            serde_json::to_string(&w).unwrap(),
            r#"{"in1":"1","in2":"2"}"#
        );
        let back: Witness = serde_json::from_str(r#"{"a":"1","b":"2"}"#).unwrap();
        assert_eq!(back.get("b"), Some("2"));
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn parses_values() {
        let w: Witness = [("a", "10"), ("b", "0x10"), ("c", "-1")].into_iter().collect();
        let ints = w.to_bigints().unwrap();
        assert_eq!(ints["a"], BigInt::from(10));
        assert_eq!(ints["b"], BigInt::from(16));
        assert_eq!(ints["c"], BigInt::from(-1));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let w = Witness::new().with("a", "one");
        assert_eq!(
            w.to_bigints().unwrap_err(),
            WitnessError {
                name: "a".to_string(),
                value: "one".to_string()
            }
        );
        assert!(Witness::new().with("a", "--1").to_bigints().is_err());
    }

    #[test]
    fn field_reduction() {
        assert_eq!(to_field(&BigInt::from(6)), Fr::from(6u64));
        assert_eq!(to_field(&BigInt::from(-1)), -Fr::from(1u64));
        let r = BigInt::from_str_radix(
            "21888242871839275222246405745257275088548364400416034343698204186575808495617",
            10,
        )
        .unwrap();
        assert_eq!(to_field(&(r + 5)), Fr::from(5u64));
    }
}
