//! Prove, marshal, verify, and compare against an expected verdict.
//!
//! Every circuit suite runs two scenarios against the same verifier: a genuine
//! proof that must verify, and a forged argument tuple of the right shape that
//! must not.
use tracing::Instrument;

use crate::{
    calldata::{
        export_calldata, parse_calldata, CalldataError, Groth16Args, PlonkArgs, ProofSystem,
        VerifierArgs,
    },
    config::CircuitArtifacts,
    prover::{Prover, ProverError},
    verifier::{Verifier, VerifyError},
    witness::Witness,
};

#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Prover(#[from] ProverError),
    #[error(transparent)]
    Calldata(#[from] CalldataError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error("{scenario}: expected verifyProof to return {expected}, got {actual}")]
    Mismatch {
        scenario: String,
        expected: bool,
        actual: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub args: VerifierArgs,
    pub expected: bool,
}

impl Scenario {
    pub fn genuine(args: VerifierArgs) -> Self {
        Self {
            name: "Should return true for correct proof".to_string(),
            args,
            expected: true,
        }
    }

    /// Zeroed points (Groth16) or a one-byte proof (PLONK).
    pub fn forged(system: ProofSystem, n_public: usize) -> Self {
        let args = match system {
            ProofSystem::Groth16 => Groth16Args::zeroed(n_public).into(),
            ProofSystem::Plonk => PlonkArgs::invalid().into(),
        };
        Self {
            name: "Should return false for invalid proof".to_string(),
            args,
            expected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub expected: bool,
    pub actual: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub suite: String,
    pub scenarios: Vec<(String, Outcome)>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.scenarios
            .iter()
            .filter(|(_, o)| o.expected == o.actual)
            .count()
    }
}

/// Runs one scenario, failing on the first mismatch.
pub async fn check<V: Verifier + ?Sized>(
    verifier: &V,
    scenario: &Scenario,
) -> Result<Outcome, HarnessError> {
    let actual = verifier.verify(&scenario.args).await?;
    if actual != scenario.expected {
        tracing::error!(
            scenario = %scenario.name,
            expected = scenario.expected,
            actual,
            "verification mismatch"
        );
        return Err(HarnessError::Mismatch {
            scenario: scenario.name.clone(),
            expected: scenario.expected,
            actual,
        });
    }
    tracing::info!(scenario = %scenario.name, actual, "ok");
    Ok(Outcome {
        expected: scenario.expected,
        actual,
    })
}

pub struct Harness<P, V> {
    pub prover: P,
    pub verifier: V,
}

impl<P: Prover, V: Verifier> Harness<P, V> {
    pub fn new(prover: P, verifier: V) -> Self {
        Self { prover, verifier }
    }

    /// Proves `witness` and round-trips the proof through verifier calldata.
    pub async fn genuine_args(
        &self,
        circuit: &CircuitArtifacts,
        witness: &Witness,
    ) -> Result<VerifierArgs, HarnessError> {
        let output = self.prover.full_prove(circuit, witness).await?;
        if let Some(signal) = output.first_public_signal() {
            tracing::info!("{} = {}", circuit.output_label(), signal);
        }

        let (proof, public) = output.normalized();
        let calldata = export_calldata(circuit.proof_system, &proof, &public)?;
        Ok(parse_calldata(circuit.proof_system, &calldata)?)
    }

    /// The genuine scenario followed by the forged one.
    pub async fn run_suite(&self, circuit: &CircuitArtifacts) -> Result<Report, HarnessError> {
        let span = tracing::info_span!("suite", label = %circuit.label);
        async {
            let args = self.genuine_args(circuit, &circuit.witness).await?;
            let n_public = args.public_inputs().len();

            let mut report = Report {
                suite: circuit.label.clone(),
                scenarios: Vec::new(),
            };
            for scenario in [
                Scenario::genuine(args),
                Scenario::forged(circuit.proof_system, n_public),
            ] {
                let outcome = check(&self.verifier, &scenario).await?;
                report.scenarios.push((scenario.name, outcome));
            }
            Ok::<_, HarnessError>(report)
        }
        .instrument(span)
        .await
    }
}
