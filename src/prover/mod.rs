//! Proof generation backends.
//!
//! A [`Prover`] takes a witness and circuit artifacts and hands back the proof
//! and public signals exactly as snarkjs would print them: JSON with every
//! field element stringified.
use async_trait::async_trait;
use serde_json::Value;

use crate::{
    calldata::ProofSystem, circuits::CircuitError, config::CircuitArtifacts, signals::Signal,
    witness::Witness,
};

mod native;
pub use native::NativeGroth16Prover;

mod snarkjs;
pub use snarkjs::SnarkjsProver;

#[derive(thiserror::Error, Debug)]
pub enum ProverError {
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error("constraint synthesis failed: {0}")]
    Synthesis(String),
    #[error("{0} proofs are not supported by this prover")]
    UnsupportedProofSystem(ProofSystem),
    #[error("prover exited with {status:?}: {stderr}")]
    Command { status: Option<i32>, stderr: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("prover produced invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// `{ proof, publicSignals }` as returned by `fullProve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProverOutput {
    pub proof: Value,
    pub public_signals: Value,
}

impl ProverOutput {
    /// Both documents with their numeric strings turned into integers.
    pub fn normalized(&self) -> (Signal, Signal) {
        (
            Signal::from_json(self.proof.clone()),
            Signal::from_json(self.public_signals.clone()),
        )
    }

    /// The first public signal as printed by the prover.
    pub fn first_public_signal(&self) -> Option<&str> {
        self.public_signals.get(0)?.as_str()
    }
}

#[async_trait]
pub trait Prover: Send + Sync {
    async fn full_prove(
        &self,
        circuit: &CircuitArtifacts,
        witness: &Witness,
    ) -> Result<ProverOutput, ProverError>;
}
