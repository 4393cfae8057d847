//! Boolean verification entry points.
//!
//! A [`Verifier`] mirrors a deployed `verifyProof`: it takes the positional
//! arguments parsed from calldata and answers `true` or `false`. Arguments of
//! the right shape but wrong content (forged points, out-of-range inputs) are a
//! `false`, not an error.
use async_trait::async_trait;

use crate::{
    calldata::{ProofSystem, VerifierArgs},
    ethereum::{PointError, VerificationKeyError},
};

mod native;
pub use native::NativeGroth16Verifier;

#[cfg(feature = "ethereum")]
pub mod contract;
#[cfg(feature = "ethereum")]
pub use contract::{ContractVerifier, VerifierArtifact};

#[derive(thiserror::Error, Debug)]
pub enum VerifyError {
    #[error("verifier expects {expected} arguments, got {found}")]
    UnsupportedProofSystem {
        expected: ProofSystem,
        found: ProofSystem,
    },
    #[error("verifier expects {expected} public inputs, got {found}")]
    InputCount { expected: usize, found: usize },
    #[error(transparent)]
    VerificationKey(#[from] VerificationKeyError),
    #[error("invalid verification key: {0}")]
    Point(#[from] PointError),
    #[error("pairing check failed: {0}")]
    Synthesis(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("abi error: {0}")]
    Abi(String),
    #[error("verifier call failed: {0}")]
    Contract(String),
}

#[async_trait]
pub trait Verifier: Send + Sync {
    fn proof_system(&self) -> ProofSystem;

    async fn verify(&self, args: &VerifierArgs) -> Result<bool, VerifyError>;
}

pub(crate) fn unsupported(expected: ProofSystem, args: &VerifierArgs) -> VerifyError {
    VerifyError::UnsupportedProofSystem {
        expected,
        found: args.proof_system(),
    }
}
