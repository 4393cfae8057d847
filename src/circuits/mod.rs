//! Native R1CS versions of the circom multiplier circuits.
//!
//! Both circuits multiply their private inputs together and expose the product
//! as their single public output:
//!
//! ```text
//! HelloWorld:   c   <== a * b
//! Multiplier3:  m   <== in1 * in2
//!               out <== m * in3
//! ```
use std::{fmt, str::FromStr};

mod builder;
pub use builder::CircuitBuilder;

mod multiplier;
pub use multiplier::NativeCircuit;

use crate::witness::WitnessError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("unknown circuit `{0}`")]
    UnknownCircuit(String),
    #[error("`{0}` is not an input of the circuit")]
    UnknownInput(String),
    #[error("missing value for input `{0}`")]
    MissingInput(String),
    #[error("input `{0}` takes a single value")]
    MultipleValues(String),
    #[error(transparent)]
    Witness(#[from] WitnessError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CircuitKind {
    HelloWorld,
    Multiplier3,
}

impl CircuitKind {
    pub fn name(&self) -> &'static str {
        match self {
            CircuitKind::HelloWorld => "HelloWorld",
            CircuitKind::Multiplier3 => "Multiplier3",
        }
    }

    /// Private input signals, in multiplication order.
    pub fn inputs(&self) -> &'static [&'static str] {
        match self {
            CircuitKind::HelloWorld => &["a", "b"],
            CircuitKind::Multiplier3 => &["in1", "in2", "in3"],
        }
    }
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CircuitKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HelloWorld" => Ok(CircuitKind::HelloWorld),
            "Multiplier3" => Ok(CircuitKind::Multiplier3),
            other => Err(CircuitError::UnknownCircuit(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in [CircuitKind::HelloWorld, CircuitKind::Multiplier3] {
            assert_eq!(kind.name().parse::<CircuitKind>().unwrap(), kind);
        }
        assert_eq!(
            "Multiplier2".parse::<CircuitKind>(),
            Err(CircuitError::UnknownCircuit("Multiplier2".to_string()))
        );
    }
}
