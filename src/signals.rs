//! Stringified big-integer trees as emitted by snarkjs.
//!
//! Provers hand back proofs and public signals with every field element encoded
//! as a decimal (or `0x` hex) string. [`Signal`] is the closed set of shapes such
//! a document can take; [`Signal::normalize`] turns every numeric string leaf into
//! an arbitrary-precision integer while leaving everything else alone.
use ethers_core::types::U256;
use num_bigint::{BigInt, Sign};
use num_traits::Num;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Null,
    Bool(bool),
    /// A JSON number that was never a string. Kept verbatim.
    Number(serde_json::Number),
    Int(BigInt),
    Str(String),
    List(Vec<Signal>),
    Map(BTreeMap<String, Signal>),
}

/// Parses `^[0-9]+$` as decimal and `^0x[0-9a-fA-F]+$` as hex. Anything else,
/// including signs, whitespace and an uppercase `0X`, is not numeric.
pub fn parse_numeric(s: &str) -> Option<BigInt> {
    if let Some(digits) = s.strip_prefix("0x") {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return BigInt::from_str_radix(digits, 16).ok();
        }
        return None;
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return BigInt::from_str_radix(s, 10).ok();
    }
    None
}

impl Signal {
    /// Converts a JSON document and normalises it in one pass.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Signal::Null,
            Value::Bool(b) => Signal::Bool(b),
            Value::Number(n) => Signal::Number(n),
            Value::String(s) => Signal::Str(s).normalize(),
            Value::Array(items) => Signal::List(items.into_iter().map(Signal::from_json).collect()),
            Value::Object(map) => Signal::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Signal::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Replaces every numeric string leaf with its integer value. Idempotent.
    pub fn normalize(self) -> Self {
        match self {
            Signal::Str(s) => match parse_numeric(&s) {
                Some(n) => Signal::Int(n),
                None => Signal::Str(s),
            },
            Signal::List(items) => Signal::List(items.into_iter().map(Signal::normalize).collect()),
            Signal::Map(map) => {
                Signal::Map(map.into_iter().map(|(k, v)| (k, v.normalize())).collect())
            }
            other => other,
        }
    }

    /// Writes the tree back out with integers as decimal strings.
    pub fn to_json(&self) -> Value {
        match self {
            Signal::Null => Value::Null,
            Signal::Bool(b) => Value::Bool(*b),
            Signal::Number(n) => Value::Number(n.clone()),
            Signal::Int(n) => Value::String(n.to_str_radix(10)),
            Signal::Str(s) => Value::String(s.clone()),
            Signal::List(items) => Value::Array(items.iter().map(Signal::to_json).collect()),
            Signal::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Signal> {
        match self {
            Signal::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn at(&self, index: usize) -> Option<&Signal> {
        self.as_list()?.get(index)
    }

    pub fn as_list(&self) -> Option<&[Signal]> {
        match self {
            Signal::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Signal::Int(n) => Some(n),
            _ => None,
        }
    }

    /// The integer leaf as an EVM word; `None` if it is negative, wider than
    /// 256 bits, or not an integer at all.
    pub fn as_u256(&self) -> Option<U256> {
        bigint_to_u256(self.as_int()?)
    }
}

impl From<Value> for Signal {
    fn from(value: Value) -> Self {
        Signal::from_json(value)
    }
}

pub(crate) fn bigint_to_u256(n: &BigInt) -> Option<U256> {
    let (sign, bytes) = n.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return None;
    }
    Some(U256::from_big_endian(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_patterns() {
        assert_eq!(parse_numeric("42"), Some(BigInt::from(42)));
        assert_eq!(parse_numeric("0x2a"), Some(BigInt::from(42)));
        assert_eq!(parse_numeric("0xFF"), Some(BigInt::from(255)));
        assert_eq!(parse_numeric("007"), Some(BigInt::from(7)));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("0x"), None);
        assert_eq!(parse_numeric("-1"), None);
        assert_eq!(parse_numeric(" 1"), None);
        assert_eq!(parse_numeric("0X1"), None);
        assert_eq!(parse_numeric("groth16"), None);
    }

    #[test]
    fn big_values_keep_their_magnitude() {
        let r = "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        let n = parse_numeric(r).unwrap();
        assert_eq!(n.to_str_radix(10), r);
        assert!(Signal::Int(n).as_u256().is_some());
    }

    #[test]
    fn walks_nested_documents() {
        let doc = Signal::from_json(json!({
            "pi_a": ["1", "0x10", "1"],
            "protocol": "groth16",
            "nested": {"12": ["3", true, null, 4]},
        }));

        assert_eq!(doc.get("pi_a").unwrap().at(1).unwrap().as_int(), Some(&BigInt::from(16)));
        assert_eq!(doc.get("protocol"), Some(&Signal::Str("groth16".to_string())));

        // keys stay strings even when they look numeric
        let nested = doc.get("nested").unwrap();
        let inner = nested.get("12").unwrap().as_list().unwrap();
        assert_eq!(inner[0], Signal::Int(BigInt::from(3)));
        assert_eq!(inner[1], Signal::Bool(true));
        assert_eq!(inner[2], Signal::Null);
        assert!(matches!(inner[3], Signal::Number(_)));
    }

    #[test]
    fn normalize_is_idempotent() {
        let doc = Signal::from_json(json!(["6", ["0x01", "x"], {"k": "9"}]));
        assert_eq!(doc.clone().normalize(), doc);
    }

    #[test]
    fn json_round_trip() {
        let doc = Signal::from_json(json!({"pi_c": ["0x0a", "11", "1"], "curve": "bn128"}));
        let out = doc.to_json();
        assert_eq!(out, json!({"pi_c": ["10", "11", "1"], "curve": "bn128"}));
        assert_eq!(Signal::from_json(out), doc);
    }

    #[test]
    fn raw_strings_normalize_in_place() {
        let raw = Signal::List(vec![Signal::Str("5".into()), Signal::Str("five".into())]);
        assert_eq!(
            raw.normalize(),
            Signal::List(vec![Signal::Int(BigInt::from(5)), Signal::Str("five".into())])
        );
    }

    #[test]
    fn u256_bounds() {
        assert_eq!(Signal::Int(BigInt::from(-1)).as_u256(), None);
        let too_wide = BigInt::from(1) << 256;
        assert_eq!(Signal::Int(too_wide).as_u256(), None);
        assert_eq!(Signal::Str("1".into()).as_u256(), None);
    }
}
