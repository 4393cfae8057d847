use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_std::rand::{rngs::StdRng, thread_rng, RngCore, SeedableRng};
use async_trait::async_trait;
use ethers_core::types::U256;
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Mutex};

use super::{Prover, ProverError, ProverOutput};
use crate::{
    calldata::ProofSystem,
    circuits::{CircuitBuilder, CircuitKind},
    config::CircuitArtifacts,
    ethereum::{G1, G2},
    witness::Witness,
};

type GrothBn = Groth16<Bn254>;

/// Groth16 over BN254 with arkworks, for the built-in circuits.
///
/// Each circuit gets its own random (toxic-waste-in-memory) setup the first
/// time it is proved, which is then reused for every later proof.
pub struct NativeGroth16Prover {
    keys: Mutex<HashMap<CircuitKind, ProvingKey<Bn254>>>,
    rng: Mutex<StdRng>,
}

impl Default for NativeGroth16Prover {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeGroth16Prover {
    pub fn new() -> Self {
        Self::with_seed(thread_rng().next_u64())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn proving_key(&self, kind: CircuitKind) -> Result<ProvingKey<Bn254>, ProverError> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pk) = keys.get(&kind) {
            return Ok(pk.clone());
        }

        tracing::debug!(circuit = %kind, "running groth16 setup");
        let circuit = CircuitBuilder::new(kind).setup();
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let pk = GrothBn::generate_random_parameters_with_reduction(circuit, &mut *rng)
            .map_err(|e| ProverError::Synthesis(e.to_string()))?;
        keys.insert(kind, pk.clone());
        Ok(pk)
    }

    pub fn verifying_key(&self, kind: CircuitKind) -> Result<VerifyingKey<Bn254>, ProverError> {
        Ok(self.proving_key(kind)?.vk)
    }

    /// The key in snarkjs `verification_key.json` form.
    pub fn verification_key(&self, kind: CircuitKind) -> Result<Value, ProverError> {
        let vk = self.verifying_key(kind)?;
        Ok(json!({
            "protocol": "groth16",
            "curve": "bn128",
            "nPublic": vk.gamma_abc_g1.len() - 1,
            "vk_alpha_1": g1_json(&vk.alpha_g1),
            "vk_beta_2": g2_json(&vk.beta_g2),
            "vk_gamma_2": g2_json(&vk.gamma_g2),
            "vk_delta_2": g2_json(&vk.delta_g2),
            "IC": vk.gamma_abc_g1.iter().map(g1_json).collect::<Vec<_>>(),
        }))
    }

    /// Builds the witness, proves it and returns the proof with its public inputs.
    pub fn prove(
        &self,
        kind: CircuitKind,
        witness: &Witness,
    ) -> Result<(Proof<Bn254>, Vec<Fr>), ProverError> {
        let pk = self.proving_key(kind)?;
        let circuit = CircuitBuilder::new(kind).with_witness(witness)?.build()?;
        let inputs = circuit.get_public_inputs().unwrap_or_default();

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let proof = GrothBn::create_random_proof_with_reduction(circuit, &pk, &mut *rng)
            .map_err(|e| ProverError::Synthesis(e.to_string()))?;
        Ok((proof, inputs))
    }
}

#[async_trait]
impl Prover for NativeGroth16Prover {
    async fn full_prove(
        &self,
        circuit: &CircuitArtifacts,
        witness: &Witness,
    ) -> Result<ProverOutput, ProverError> {
        if circuit.proof_system != ProofSystem::Groth16 {
            return Err(ProverError::UnsupportedProofSystem(circuit.proof_system));
        }
        let kind: CircuitKind = circuit.circuit.parse()?;
        let (proof, inputs) = self.prove(kind, witness)?;

        Ok(ProverOutput {
            proof: json!({
                "pi_a": g1_json(&proof.a),
                "pi_b": g2_json(&proof.b),
                "pi_c": g1_json(&proof.c),
                "protocol": "groth16",
                "curve": "bn128",
            }),
            public_signals: inputs
                .iter()
                .map(|x| Value::String(crate::ethereum::point_to_u256(*x).to_string()))
                .collect(),
        })
    }
}

fn g1_json(p: &G1Affine) -> Value {
    if p.infinity {
        return json!(["0", "1", "0"]);
    }
    let p = G1::from(p);
    json!([dec(&p.x), dec(&p.y), "1"])
}

fn g2_json(p: &G2Affine) -> Value {
    if p.infinity {
        return json!([["0", "0"], ["1", "0"], ["0", "0"]]);
    }
    let p = G2::from(p);
    json!([
        [dec(&p.x[0]), dec(&p.x[1])],
        [dec(&p.y[0]), dec(&p.y[1])],
        ["1", "0"]
    ])
}

fn dec(n: &U256) -> String {
    n.to_string()
}
