use ark_bn254::Bn254;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, VerifyingKey};
use async_trait::async_trait;
use std::path::Path;

use super::{unsupported, Verifier, VerifyError};
use crate::{
    calldata::{ProofSystem, VerifierArgs},
    config::CircuitArtifacts,
    ethereum::{self, Inputs, VerificationKeyError},
    signals::Signal,
};

type GrothBn = Groth16<Bn254>;

/// Groth16 pairing check with arkworks, behaving like the snarkjs Solidity
/// verifier for the same verification key.
#[derive(Clone)]
pub struct NativeGroth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
}

impl NativeGroth16Verifier {
    pub fn new(vk: &VerifyingKey<Bn254>) -> Self {
        Self {
            pvk: prepare_verifying_key(vk),
        }
    }

    pub fn from_ethereum(vk: ethereum::VerifyingKey) -> Result<Self, VerifyError> {
        if vk.ic.is_empty() {
            return Err(VerificationKeyError("IC".to_string()).into());
        }
        let vk: VerifyingKey<Bn254> = vk.try_into()?;
        Ok(Self::new(&vk))
    }

    /// From a normalised snarkjs `verification_key.json`.
    pub fn from_snarkjs(doc: &Signal) -> Result<Self, VerifyError> {
        Self::from_ethereum(ethereum::VerifyingKey::from_snarkjs(doc)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let raw = std::fs::read(path)?;
        Self::from_snarkjs(&Signal::from_json(serde_json::from_slice(&raw)?))
    }

    /// Loads the `verificationKey` a suite manifest names for `circuit`.
    /// Resolve the artifacts against the suite root first.
    pub fn from_artifacts(circuit: &CircuitArtifacts) -> Result<Self, VerifyError> {
        if circuit.proof_system != ProofSystem::Groth16 {
            return Err(VerifyError::UnsupportedProofSystem {
                expected: ProofSystem::Groth16,
                found: circuit.proof_system,
            });
        }
        let path = circuit
            .verification_key
            .as_deref()
            .ok_or_else(|| VerificationKeyError("verificationKey".to_string()))?;
        Self::from_file(path)
    }

    pub fn num_public_inputs(&self) -> usize {
        self.pvk.vk.gamma_abc_g1.len().saturating_sub(1)
    }
}

#[async_trait]
impl Verifier for NativeGroth16Verifier {
    fn proof_system(&self) -> ProofSystem {
        ProofSystem::Groth16
    }

    async fn verify(&self, args: &VerifierArgs) -> Result<bool, VerifyError> {
        let args = match args {
            VerifierArgs::Groth16(args) => args,
            other => return Err(unsupported(ProofSystem::Groth16, other)),
        };
        // arkworks indexes the constant term unconditionally
        if self.pvk.vk.gamma_abc_g1.is_empty() {
            return Err(VerificationKeyError("IC".to_string()).into());
        }

        if args.inputs.len() != self.num_public_inputs() {
            return Err(VerifyError::InputCount {
                expected: self.num_public_inputs(),
                found: args.inputs.len(),
            });
        }

        let proof: ark_groth16::Proof<Bn254> = match args.proof().try_into() {
            Ok(proof) => proof,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting proof points");
                return Ok(false);
            }
        };
        let inputs = match Inputs(args.inputs.clone()).to_scalars() {
            Ok(inputs) => inputs,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting public inputs");
                return Ok(false);
            }
        };

        GrothBn::verify_proof(&self.pvk, &proof, &inputs)
            .map_err(|e| VerifyError::Synthesis(e.to_string()))
    }
}
