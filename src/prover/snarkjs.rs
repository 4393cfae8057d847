use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use super::{Prover, ProverError, ProverOutput};
use crate::{config::CircuitArtifacts, witness::Witness};

/// Runs `snarkjs <protocol> fullprove` against circom artifacts on disk.
#[derive(Debug, Clone)]
pub struct SnarkjsProver {
    program: PathBuf,
}

impl Default for SnarkjsProver {
    fn default() -> Self {
        Self::new("snarkjs")
    }
}

impl SnarkjsProver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Prover for SnarkjsProver {
    async fn full_prove(
        &self,
        circuit: &CircuitArtifacts,
        witness: &Witness,
    ) -> Result<ProverOutput, ProverError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.json");
        let proof = dir.path().join("proof.json");
        let public = dir.path().join("public.json");

        tokio::fs::write(&input, serde_json::to_vec(witness)?).await?;

        tracing::debug!(
            program = %self.program.display(),
            protocol = %circuit.proof_system,
            wasm = %circuit.wasm.display(),
            zkey = %circuit.zkey.display(),
            "running fullprove"
        );
        let output = Command::new(&self.program)
            .arg(circuit.proof_system.as_str())
            .arg("fullprove")
            .arg(&input)
            .arg(&circuit.wasm)
            .arg(&circuit.zkey)
            .arg(&proof)
            .arg(&public)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(status = ?output.status.code(), %stderr, "fullprove failed");
            return Err(ProverError::Command {
                status: output.status.code(),
                stderr,
            });
        }

        Ok(ProverOutput {
            proof: serde_json::from_slice(&tokio::fs::read(&proof).await?)?,
            public_signals: serde_json::from_slice(&tokio::fs::read(&public).await?)?,
        })
    }
}
