//! Solidity calldata for snarkjs-style verifier contracts.
//!
//! [`export_calldata`] renders a normalised proof the way
//! `snarkjs <protocol> exportSolidityCallData` does, and [`parse_calldata`]
//! turns such a string back into the positional arguments of `verifyProof`.
use ethers_core::types::U256;
use std::{fmt, str::FromStr};

use crate::signals::{parse_numeric, Signal};

mod groth16;
pub use groth16::Groth16Args;

mod plonk;
pub use plonk::{PlonkArgs, PLONK_PROOF_LEN};

#[derive(thiserror::Error, Debug)]
pub enum CalldataError {
    #[error("expected {expected} calldata fields, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("invalid numeric token `{0}`")]
    InvalidNumber(String),
    #[error("value does not fit in 256 bits: `{0}`")]
    Overflow(String),
    #[error("invalid hex proof `{0}`")]
    InvalidHex(String),
    #[error("public signals are not a JSON array: {0}")]
    Json(#[from] serde_json::Error),
    #[error("proof is missing field `{0}`")]
    MissingField(String),
    #[error("field `{0}` is not an integer")]
    NotAnInteger(String),
    #[error("point `{0}` is not in affine form")]
    NotAffine(String),
    #[error("unknown proof system `{0}`")]
    UnknownProofSystem(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofSystem {
    Groth16,
    Plonk,
}

impl ProofSystem {
    /// The snarkjs protocol name, also used as the CLI subcommand.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofSystem::Groth16 => "groth16",
            ProofSystem::Plonk => "plonk",
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofSystem {
    type Err = CalldataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groth16" => Ok(ProofSystem::Groth16),
            "plonk" => Ok(ProofSystem::Plonk),
            other => Err(CalldataError::UnknownProofSystem(other.to_string())),
        }
    }
}

/// Positional arguments for a verifier's `verifyProof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierArgs {
    Groth16(Groth16Args),
    Plonk(PlonkArgs),
}

impl VerifierArgs {
    pub fn proof_system(&self) -> ProofSystem {
        match self {
            VerifierArgs::Groth16(_) => ProofSystem::Groth16,
            VerifierArgs::Plonk(_) => ProofSystem::Plonk,
        }
    }

    /// The public inputs carried by the arguments.
    pub fn public_inputs(&self) -> &[U256] {
        match self {
            VerifierArgs::Groth16(args) => &args.inputs,
            VerifierArgs::Plonk(args) => &args.public_signals,
        }
    }
}

impl From<Groth16Args> for VerifierArgs {
    fn from(args: Groth16Args) -> Self {
        VerifierArgs::Groth16(args)
    }
}

impl From<PlonkArgs> for VerifierArgs {
    fn from(args: PlonkArgs) -> Self {
        VerifierArgs::Plonk(args)
    }
}

/// Renders `proof` and `public` (both normalised) as verifier calldata.
pub fn export_calldata(
    system: ProofSystem,
    proof: &Signal,
    public: &Signal,
) -> Result<String, CalldataError> {
    let inputs = public_words(public)?;
    match system {
        ProofSystem::Groth16 => groth16::export(proof, &inputs),
        ProofSystem::Plonk => plonk::export(proof, &inputs),
    }
}

/// Parses calldata produced by `exportSolidityCallData` for `system`.
pub fn parse_calldata(system: ProofSystem, calldata: &str) -> Result<VerifierArgs, CalldataError> {
    tracing::debug!(%system, calldata, "parsing calldata");
    match system {
        ProofSystem::Groth16 => groth16::parse(calldata).map(VerifierArgs::Groth16),
        ProofSystem::Plonk => plonk::parse(calldata).map(VerifierArgs::Plonk),
    }
}

fn public_words(public: &Signal) -> Result<Vec<U256>, CalldataError> {
    let items = public
        .as_list()
        .ok_or_else(|| CalldataError::NotAnInteger("publicSignals".to_string()))?;
    items
        .iter()
        .enumerate()
        .map(|(i, s)| word(s, &format!("publicSignals[{}]", i)))
        .collect()
}

pub(crate) fn word(signal: &Signal, name: &str) -> Result<U256, CalldataError> {
    let n = signal
        .as_int()
        .ok_or_else(|| CalldataError::NotAnInteger(name.to_string()))?;
    crate::signals::bigint_to_u256(n).ok_or_else(|| CalldataError::Overflow(n.to_string()))
}

pub(crate) fn field<'a>(proof: &'a Signal, key: &str) -> Result<&'a Signal, CalldataError> {
    proof
        .get(key)
        .ok_or_else(|| CalldataError::MissingField(key.to_string()))
}

/// `BigInt(token)` semantics: decimal or `0x` hex, at most 256 bits.
pub(crate) fn parse_word(token: &str) -> Result<U256, CalldataError> {
    let n = parse_numeric(token).ok_or_else(|| CalldataError::InvalidNumber(token.to_string()))?;
    crate::signals::bigint_to_u256(&n).ok_or_else(|| CalldataError::Overflow(token.to_string()))
}

/// A 32-byte big-endian word as `0x` + 64 hex digits.
pub(crate) fn p256(n: &U256) -> String {
    let mut buf = [0u8; 32];
    n.to_big_endian(&mut buf);
    format!("0x{}", hex::encode(buf))
}
