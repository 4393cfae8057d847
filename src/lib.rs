//! Arkworks - Circom calldata harness
//!
//! Proves Circom-style circuits, renders the proofs as Solidity verifier calldata
//! (byte-compatible with `snarkjs exportSolidityCallData`), parses that calldata
//! back into `verifyProof` arguments and checks them against a verifier.
pub mod signals;
pub use signals::Signal;

pub mod calldata;
pub use calldata::{export_calldata, parse_calldata, ProofSystem, VerifierArgs};

pub mod circuits;
pub use circuits::{CircuitBuilder, CircuitKind};

pub mod config;
pub use config::{CircuitArtifacts, SuiteConfig};

pub mod ethereum;

pub mod harness;
pub use harness::{Harness, HarnessError};

pub mod prover;
pub use prover::{NativeGroth16Prover, Prover, SnarkjsProver};

pub mod verifier;
pub use verifier::{NativeGroth16Verifier, Verifier};

mod witness;
pub use witness::{Witness, WitnessError};

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
