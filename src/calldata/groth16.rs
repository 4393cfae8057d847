use ark_bn254::{Bn254, Fr};
use ethers_core::types::U256;

use super::{field, p256, parse_word, CalldataError};
use crate::{
    ethereum::{self, g1_words, g2_words, Inputs, G1, G2},
    signals::Signal,
};

/// Words before the public inputs: `a` (2), `b` (2x2), `c` (2).
const PROOF_WORDS: usize = 8;

/// `verifyProof(uint[2] a, uint[2][2] b, uint[2] c, uint[] input)` arguments.
/// `b` is in calldata order, i.e. each Fq2 limb pair is c1-first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Groth16Args {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub inputs: Vec<U256>,
}

impl Groth16Args {
    pub fn from_proof(proof: &ark_groth16::Proof<Bn254>, inputs: &[Fr]) -> Self {
        Self::from_parts(&ethereum::Proof::from(proof), Inputs::from(inputs))
    }

    pub fn from_parts(proof: &ethereum::Proof, inputs: Inputs) -> Self {
        let ((ax, ay), (bx, by), (cx, cy)) = proof.as_tuple();
        Self {
            a: [ax, ay],
            b: [bx, by],
            c: [cx, cy],
            inputs: inputs.0,
        }
    }

    /// All-zero points with `n_inputs` zero inputs.
    pub fn zeroed(n_inputs: usize) -> Self {
        Self {
            inputs: vec![U256::zero(); n_inputs],
            ..Default::default()
        }
    }

    /// The proof points with G2 limbs back in `[c0, c1]` order.
    pub fn proof(&self) -> ethereum::Proof {
        ethereum::Proof {
            a: G1 {
                x: self.a[0],
                y: self.a[1],
            },
            b: G2::from_tuple(self.b[0], self.b[1]),
            c: G1 {
                x: self.c[0],
                y: self.c[1],
            },
        }
    }

    pub fn to_calldata(&self) -> String {
        let inputs = self.inputs.iter().map(p256).collect::<Vec<_>>();
        format!(
            "[{}, {}],[[{}, {}],[{}, {}]],[{}, {}],[{}]",
            quoted(&self.a[0]),
            quoted(&self.a[1]),
            quoted(&self.b[0][0]),
            quoted(&self.b[0][1]),
            quoted(&self.b[1][0]),
            quoted(&self.b[1][1]),
            quoted(&self.c[0]),
            quoted(&self.c[1]),
            inputs
                .iter()
                .map(|i| format!("\"{}\"", i))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

fn quoted(n: &U256) -> String {
    format!("\"{}\"", p256(n))
}

pub(super) fn export(proof: &Signal, inputs: &[U256]) -> Result<String, CalldataError> {
    // x and y exactly as written, even for the point at infinity
    let a = g1_words(field(proof, "pi_a")?)
        .ok_or_else(|| CalldataError::NotAffine("pi_a".to_string()))?;
    let b = g2_words(field(proof, "pi_b")?)
        .ok_or_else(|| CalldataError::NotAffine("pi_b".to_string()))?;
    let c = g1_words(field(proof, "pi_c")?)
        .ok_or_else(|| CalldataError::NotAffine("pi_c".to_string()))?;

    let args = Groth16Args::from_parts(&ethereum::Proof { a, b, c }, Inputs(inputs.to_vec()));
    Ok(args.to_calldata())
}

pub(super) fn parse(calldata: &str) -> Result<Groth16Args, CalldataError> {
    let stripped: String = calldata
        .chars()
        .filter(|c| !matches!(c, '"' | '[' | ']') && !c.is_whitespace())
        .collect();
    // `[]` for a circuit without public inputs leaves a trailing separator
    let stripped = stripped.strip_suffix(',').unwrap_or(&stripped);
    let words = stripped
        .split(',')
        .map(parse_word)
        .collect::<Result<Vec<_>, _>>()?;

    if words.len() < PROOF_WORDS {
        return Err(CalldataError::Arity {
            expected: PROOF_WORDS,
            found: words.len(),
        });
    }

    Ok(Groth16Args {
        a: [words[0], words[1]],
        b: [[words[2], words[3]], [words[4], words[5]]],
        c: [words[6], words[7]],
        inputs: words[PROOF_WORDS..].to_vec(),
    })
}
