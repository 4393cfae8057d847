//! `verifyProof` on a deployed snarkjs verifier contract, via `eth_call`.
use async_trait::async_trait;
use ethers::{
    abi::{Abi, Function, ParamType, Token},
    contract::ContractFactory,
    providers::Middleware,
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, U256},
};
use serde::Deserialize;
use std::{path::Path, sync::Arc};

use super::{unsupported, Verifier, VerifyError};
use crate::calldata::{ProofSystem, VerifierArgs};

const VERIFY_PROOF: &str = "verifyProof";

/// The parts of a hardhat compilation artifact needed to deploy a verifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierArtifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl VerifierArtifact {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

/// The `verifyProof` ABI of the verifiers snarkjs generates.
pub fn snarkjs_abi(system: ProofSystem, n_public: usize) -> Result<Abi, VerifyError> {
    let signature = match system {
        ProofSystem::Groth16 => format!(
            "function verifyProof(uint256[2] a, uint256[2][2] b, uint256[2] c, uint256[{}] input) view returns (bool)",
            n_public
        ),
        ProofSystem::Plonk => {
            "function verifyProof(bytes proof, uint256[] pubSignals) view returns (bool)".to_string()
        }
    };
    ethers::abi::parse_abi(&[signature.as_str()]).map_err(|e| VerifyError::Abi(e.to_string()))
}

#[derive(Debug)]
pub struct ContractVerifier<M> {
    client: Arc<M>,
    address: Address,
    abi: Abi,
    system: ProofSystem,
}

impl<M: Middleware> ContractVerifier<M> {
    pub fn with_abi(address: Address, client: Arc<M>, system: ProofSystem, abi: Abi) -> Self {
        Self {
            client,
            address,
            abi,
            system,
        }
    }

    /// A verifier at `address` with the stock snarkjs ABI.
    pub fn snarkjs(
        address: Address,
        client: Arc<M>,
        system: ProofSystem,
        n_public: usize,
    ) -> Result<Self, VerifyError> {
        Ok(Self::with_abi(
            address,
            client,
            system,
            snarkjs_abi(system, n_public)?,
        ))
    }

    /// Deploys a fresh instance of `artifact`.
    pub async fn deploy(
        client: Arc<M>,
        artifact: &VerifierArtifact,
        system: ProofSystem,
    ) -> Result<Self, VerifyError> {
        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            client.clone(),
        );
        let contract = factory
            .deploy(())
            .map_err(|e| VerifyError::Contract(e.to_string()))?
            .send()
            .await
            .map_err(|e| VerifyError::Contract(e.to_string()))?;

        tracing::info!(
            contract = %artifact.contract_name,
            address = ?contract.address(),
            "deployed verifier"
        );
        Ok(Self::with_abi(
            contract.address(),
            client,
            system,
            artifact.abi.clone(),
        ))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn function(&self) -> Result<&Function, VerifyError> {
        self.abi
            .function(VERIFY_PROOF)
            .map_err(|e| VerifyError::Abi(e.to_string()))
    }

    /// ABI-encodes `args` for this contract's `verifyProof`.
    pub fn encode(&self, args: &VerifierArgs) -> Result<Bytes, VerifyError> {
        let function = self.function()?;
        let param = |i: usize| {
            function
                .inputs
                .get(i)
                .map(|p| &p.kind)
                .ok_or_else(|| VerifyError::Abi(format!("{} takes too few arguments", VERIFY_PROOF)))
        };

        let tokens = match (self.system, args) {
            (ProofSystem::Groth16, VerifierArgs::Groth16(args)) => vec![
                fixed(&args.a),
                Token::FixedArray(args.b.iter().map(|limbs| fixed(limbs)).collect()),
                fixed(&args.c),
                array(param(3)?, &args.inputs)?,
            ],
            (ProofSystem::Plonk, VerifierArgs::Plonk(args)) => vec![
                Token::Bytes(args.proof.to_vec()),
                array(param(1)?, &args.public_signals)?,
            ],
            (expected, other) => return Err(unsupported(expected, other)),
        };

        function
            .encode_input(&tokens)
            .map(Bytes::from)
            .map_err(|e| VerifyError::Abi(e.to_string()))
    }
}

fn fixed(words: &[U256]) -> Token {
    Token::FixedArray(words.iter().copied().map(Token::Uint).collect())
}

// `uint[N]` in older templates, `uint[]` in newer ones
fn array(kind: &ParamType, words: &[U256]) -> Result<Token, VerifyError> {
    let tokens = words.iter().copied().map(Token::Uint).collect::<Vec<_>>();
    match kind {
        ParamType::FixedArray(_, n) if *n != words.len() => Err(VerifyError::InputCount {
            expected: *n,
            found: words.len(),
        }),
        ParamType::FixedArray(..) => Ok(Token::FixedArray(tokens)),
        _ => Ok(Token::Array(tokens)),
    }
}

#[async_trait]
impl<M: Middleware> Verifier for ContractVerifier<M> {
    fn proof_system(&self) -> ProofSystem {
        self.system
    }

    async fn verify(&self, args: &VerifierArgs) -> Result<bool, VerifyError> {
        let data = self.encode(args)?;
        let tx: TypedTransaction = TransactionRequest::new().to(self.address).data(data).into();

        let output = self
            .client
            .call(&tx, None)
            .await
            .map_err(|e| VerifyError::Contract(e.to_string()))?;

        let decoded = self
            .function()?
            .decode_output(&output)
            .map_err(|e| VerifyError::Abi(e.to_string()))?;
        match decoded.first() {
            Some(Token::Bool(ok)) => Ok(*ok),
            _ => Err(VerifyError::Abi(format!(
                "{} did not return a bool",
                VERIFY_PROOF
            ))),
        }
    }
}
