use ethers_core::types::{Bytes, U256};
use serde_json::Value;

use super::{field, p256, parse_word, word, CalldataError};
use crate::{ethereum::g1_from_signal, signals::Signal};

const G1_POINTS: [&str; 9] = ["A", "B", "C", "Z", "T1", "T2", "T3", "Wxi", "Wxiw"];
const EVALUATIONS: [&str; 7] = [
    "eval_a", "eval_b", "eval_c", "eval_s1", "eval_s2", "eval_zw", "eval_r",
];

/// Serialized proof size: nine uncompressed G1 points and seven scalars.
pub const PLONK_PROOF_LEN: usize = G1_POINTS.len() * 64 + EVALUATIONS.len() * 32;

/// `verifyProof(bytes proof, uint[] pubSignals)` arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlonkArgs {
    pub proof: Bytes,
    pub public_signals: Vec<U256>,
}

impl PlonkArgs {
    /// A one-byte proof against a single signal; rejected by any verifier.
    pub fn invalid() -> Self {
        Self {
            proof: Bytes::from(vec![0u8]),
            public_signals: vec![U256::one()],
        }
    }

    pub fn to_calldata(&self) -> String {
        let inputs = self
            .public_signals
            .iter()
            .map(|s| format!("\"{}\"", p256(s)))
            .collect::<Vec<_>>()
            .join(",");
        format!("0x{},[{}]", hex::encode(&self.proof), inputs)
    }
}

pub(super) fn export(proof: &Signal, inputs: &[U256]) -> Result<String, CalldataError> {
    let mut buf = Vec::with_capacity(PLONK_PROOF_LEN);
    let mut word_buf = [0u8; 32];

    for name in G1_POINTS {
        let point =
            g1_from_signal(field(proof, name)?).ok_or_else(|| CalldataError::NotAffine(name.to_string()))?;
        for coord in [point.x, point.y] {
            coord.to_big_endian(&mut word_buf);
            buf.extend_from_slice(&word_buf);
        }
    }
    for name in EVALUATIONS {
        word(field(proof, name)?, name)?.to_big_endian(&mut word_buf);
        buf.extend_from_slice(&word_buf);
    }

    let args = PlonkArgs {
        proof: buf.into(),
        public_signals: inputs.to_vec(),
    };
    Ok(args.to_calldata())
}

pub(super) fn parse(calldata: &str) -> Result<PlonkArgs, CalldataError> {
    let (proof, signals) = calldata
        .split_once(',')
        .ok_or(CalldataError::Arity {
            expected: 2,
            found: 1,
        })?;

    let proof = proof.trim();
    let digits = proof
        .strip_prefix("0x")
        .ok_or_else(|| CalldataError::InvalidHex(proof.to_string()))?;
    let proof_bytes = hex::decode(digits).map_err(|_| CalldataError::InvalidHex(proof.to_string()))?;

    let signals: Vec<Value> = serde_json::from_str(signals)?;
    let public_signals = signals
        .iter()
        .map(|v| match v {
            Value::String(s) => parse_word(s),
            Value::Number(n) => parse_word(&n.to_string()),
            other => Err(CalldataError::InvalidNumber(other.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlonkArgs {
        proof: proof_bytes.into(),
        public_signals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calldata::{export_calldata, parse_calldata, ProofSystem, VerifierArgs};
    use serde_json::{json, Map};

    fn proof_doc() -> Signal {
        let mut doc = Map::new();
        for (i, name) in G1_POINTS.iter().enumerate() {
            let x = (2 * i + 1).to_string();
            let y = (2 * i + 2).to_string();
            doc.insert(name.to_string(), json!([x, y, "1"]));
        }
        for (i, name) in EVALUATIONS.iter().enumerate() {
            doc.insert(name.to_string(), json!((100 + i).to_string()));
        }
        doc.insert("protocol".to_string(), json!("plonk"));
        Signal::from_json(Value::Object(doc))
    }

    #[test]
    fn export_lays_out_points_then_evaluations() {
        let public = Signal::from_json(json!(["6"]));
        let calldata = export_calldata(ProofSystem::Plonk, &proof_doc(), &public).unwrap();

        let (proof, signals) = calldata.split_once(',').unwrap();
        assert_eq!(signals, format!("[\"0x{:064x}\"]", 6));

        let bytes = hex::decode(proof.strip_prefix("0x").unwrap()).unwrap();
        assert_eq!(bytes.len(), PLONK_PROOF_LEN);
        assert_eq!(bytes.len(), 800);
        // A.x, A.y
        assert_eq!(bytes[31], 1);
        assert_eq!(bytes[63], 2);
        // Wxiw.y is the last point word
        assert_eq!(bytes[9 * 64 - 1], 18);
        // eval_a, eval_r
        assert_eq!(bytes[9 * 64 + 31], 100);
        assert_eq!(bytes[PLONK_PROOF_LEN - 1], 106);
    }

    #[test]
    fn parse_recovers_proof_and_signals() {
        let public = Signal::from_json(json!(["6", "7"]));
        let calldata = export_calldata(ProofSystem::Plonk, &proof_doc(), &public).unwrap();
        let args = match parse_calldata(ProofSystem::Plonk, &calldata).unwrap() {
            VerifierArgs::Plonk(args) => args,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(args.proof.len(), PLONK_PROOF_LEN);
        assert_eq!(args.public_signals, vec![U256::from(6), U256::from(7)]);
        assert_eq!(args.to_calldata(), calldata);
    }

    #[test]
    fn parse_accepts_plain_numbers() {
        let args = parse("0x00,[1, \"0x02\"]").unwrap();
        assert_eq!(args.proof.as_ref(), &[0u8]);
        assert_eq!(args.public_signals, vec![U256::from(1), U256::from(2)]);
    }

    #[test]
    fn parse_rejects_malformed_calldata() {
        assert!(matches!(
            parse("0x00"),
            Err(CalldataError::Arity {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(parse("00,[1]"), Err(CalldataError::InvalidHex(_))));
        assert!(matches!(parse("0x0,[1]"), Err(CalldataError::InvalidHex(_))));
        assert!(matches!(parse("0x00,1]"), Err(CalldataError::Json(_))));
        assert!(matches!(parse("0x00,[true]"), Err(CalldataError::InvalidNumber(_))));
    }

    #[test]
    fn export_requires_every_evaluation() {
        let mut doc = proof_doc().to_json();
        doc.as_object_mut().unwrap().remove("eval_zw");
        let err = export(&Signal::from_json(doc), &[]).unwrap_err();
        assert!(matches!(err, CalldataError::MissingField(f) if f == "eval_zw"));
    }

    #[test]
    fn invalid_args() {
        let args = PlonkArgs::invalid();
        assert_eq!(args.to_calldata(), format!("0x00,[\"0x{:064x}\"]", 1));
    }
}
