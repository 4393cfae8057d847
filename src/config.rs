use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{calldata::ProofSystem, witness::Witness};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid suite manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// One circuit / proof system pairing and the artifacts needed to prove and
/// verify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitArtifacts {
    /// Suite name, e.g. `Multiplier3 with PLONK`.
    pub label: String,
    /// Circuit name, e.g. `Multiplier3`.
    pub circuit: String,
    pub proof_system: ProofSystem,
    /// Witness generator compiled by circom.
    pub wasm: PathBuf,
    pub zkey: PathBuf,
    /// Name of the verifier contract.
    pub verifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_key: Option<PathBuf>,
    #[serde(default)]
    pub witness: Witness,
    /// Printed before the first public signal, e.g. `1x2x3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_label: Option<String>,
}

impl CircuitArtifacts {
    pub fn output_label(&self) -> &str {
        self.output_label.as_deref().unwrap_or(&self.circuit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    #[serde(default)]
    pub artifacts_root: PathBuf,
    pub circuits: Vec<CircuitArtifacts>,
}

impl SuiteConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let reader = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: SuiteConfig = serde_json::from_reader(BufReader::new(reader))?;
        if cfg.artifacts_root.as_os_str().is_empty() {
            if let Some(parent) = path.parent() {
                cfg.artifacts_root = parent.to_path_buf();
            }
        }
        Ok(cfg)
    }

    /// The HelloWorld, Multiplier3/Groth16 and Multiplier3/PLONK suites of a
    /// hardhat project rooted at `artifacts_root`.
    pub fn default_suite(artifacts_root: impl Into<PathBuf>) -> Self {
        let multiplier3 = Witness::new()
            .with("in1", "1")
            .with("in2", "2")
            .with("in3", "3");
        Self {
            artifacts_root: artifacts_root.into(),
            circuits: vec![
                CircuitArtifacts {
                    label: "HelloWorld".to_string(),
                    circuit: "HelloWorld".to_string(),
                    proof_system: ProofSystem::Groth16,
                    wasm: "contracts/circuits/HelloWorld/HelloWorld_js/HelloWorld.wasm".into(),
                    zkey: "contracts/circuits/HelloWorld/circuit_final.zkey".into(),
                    verifier: "HelloWorldVerifier".to_string(),
                    verification_key: None,
                    witness: Witness::new().with("a", "1").with("b", "2"),
                    output_label: Some("1x2".to_string()),
                },
                CircuitArtifacts {
                    label: "Multiplier3 with Groth16".to_string(),
                    circuit: "Multiplier3".to_string(),
                    proof_system: ProofSystem::Groth16,
                    wasm: "contracts/circuits/Multiplier3/Multiplier3_js/Multiplier3.wasm".into(),
                    zkey: "contracts/circuits/Multiplier3/circuit_final.zkey".into(),
                    verifier: "Multiplier3Verifier".to_string(),
                    verification_key: None,
                    witness: multiplier3.clone(),
                    output_label: Some("1x2x3".to_string()),
                },
                CircuitArtifacts {
                    label: "Multiplier3 with PLONK".to_string(),
                    circuit: "Multiplier3".to_string(),
                    proof_system: ProofSystem::Plonk,
                    wasm: "contracts/circuits/_plonkMultiplier3/Multiplier3_js/Multiplier3.wasm"
                        .into(),
                    zkey: "contracts/circuits/_plonkMultiplier3/circuit_0000.zkey".into(),
                    verifier: "_plonkMultiplier3Verifier".to_string(),
                    verification_key: None,
                    witness: multiplier3,
                    output_label: Some("1x2x3".to_string()),
                },
            ],
        }
    }

    /// Artifacts with every relative path joined onto `artifacts_root`.
    pub fn resolve(&self, circuit: &CircuitArtifacts) -> CircuitArtifacts {
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                self.artifacts_root.join(p)
            }
        };
        CircuitArtifacts {
            wasm: join(&circuit.wasm),
            zkey: join(&circuit.zkey),
            verification_key: circuit.verification_key.as_deref().map(join),
            ..circuit.clone()
        }
    }

    /// Where hardhat leaves the compiled verifier contract.
    pub fn verifier_artifact(&self, circuit: &CircuitArtifacts) -> PathBuf {
        self.artifacts_root
            .join("artifacts")
            .join("contracts")
            .join(format!("{}.sol", circuit.verifier))
            .join(format!("{}.json", circuit.verifier))
    }

    pub fn find(&self, label: &str) -> Option<&CircuitArtifacts> {
        self.circuits.iter().find(|c| c.label == label)
    }
}
