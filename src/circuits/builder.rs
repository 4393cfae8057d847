use num_bigint::BigInt;
use std::collections::HashMap;

use super::{CircuitError, CircuitKind, NativeCircuit};
use crate::witness::{to_field, Witness};

#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    pub kind: CircuitKind,
    pub inputs: HashMap<String, Vec<BigInt>>,
}

impl CircuitBuilder {
    pub fn new(kind: CircuitKind) -> Self {
        Self {
            kind,
            inputs: HashMap::new(),
        }
    }

    /// Pushes an input value at the specified name.
    pub fn push_input<T: Into<BigInt>>(&mut self, name: impl ToString, val: T) {
        let values = self.inputs.entry(name.to_string()).or_default();
        values.push(val.into());
    }

    /// Pushes every signal of a snarkjs-style witness.
    pub fn with_witness(mut self, witness: &Witness) -> Result<Self, CircuitError> {
        for (name, value) in witness.to_bigints()? {
            self.push_input(name, value);
        }
        Ok(self)
    }

    /// Generates an empty circuit with no witness set, to be used for
    /// generation of the trusted setup parameters
    pub fn setup(&self) -> NativeCircuit {
        NativeCircuit {
            kind: self.kind,
            witness: None,
        }
    }

    /// Creates the circuit populated with the witness corresponding to the previously
    /// provided inputs
    pub fn build(self) -> Result<NativeCircuit, CircuitError> {
        let expected = self.kind.inputs();
        if let Some(unknown) = self
            .inputs
            .keys()
            .find(|name| !expected.contains(&name.as_str()))
        {
            return Err(CircuitError::UnknownInput(unknown.clone()));
        }

        let witness = expected
            .iter()
            .map(|name| match self.inputs.get(*name).map(Vec::as_slice) {
                Some([value]) => Ok(to_field(value)),
                Some([]) | None => Err(CircuitError::MissingInput(name.to_string())),
                Some(_) => Err(CircuitError::MultipleValues(name.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let circuit = NativeCircuit {
            kind: self.kind,
            witness: Some(witness),
        };

        // sanity check
        debug_assert!({
            use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
            let cs = ConstraintSystem::<ark_bn254::Fr>::new_ref();
            circuit.clone().generate_constraints(cs.clone()).is_ok()
                && cs.is_satisfied().unwrap_or(false)
        });

        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn builds_from_witness() {
        let witness = Witness::new().with("a", "1").with("b", "2");
        let circuit = CircuitBuilder::new(CircuitKind::HelloWorld)
            .with_witness(&witness)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(circuit.witness, Some(vec![Fr::from(1u64), Fr::from(2u64)]));
        assert_eq!(circuit.get_public_inputs(), Some(vec![Fr::from(2u64)]));
    }

    #[test]
    fn setup_has_no_witness() {
        let builder = CircuitBuilder::new(CircuitKind::Multiplier3);
        assert_eq!(builder.setup().witness, None);
        assert_eq!(builder.setup().get_public_inputs(), None);
    }

    #[test]
    fn rejects_unknown_input() {
        let mut builder = CircuitBuilder::new(CircuitKind::HelloWorld);
        builder.push_input("a", 3);
        // This isn't an input to the circuit, should fail
        builder.push_input("foo", 11);
        assert_eq!(
            builder.build().unwrap_err(),
            CircuitError::UnknownInput("foo".to_string())
        );
    }

    #[test]
    fn rejects_missing_and_repeated_inputs() {
        let mut builder = CircuitBuilder::new(CircuitKind::Multiplier3);
        builder.push_input("in1", 1);
        builder.push_input("in2", 2);
        assert_eq!(
            builder.clone().build().unwrap_err(),
            CircuitError::MissingInput("in3".to_string())
        );

        builder.push_input("in3", 3);
        builder.push_input("in3", 4);
        assert_eq!(
            builder.build().unwrap_err(),
            CircuitError::MultipleValues("in3".to_string())
        );
    }

    #[test]
    fn rejects_bad_witness_values() {
        let witness = Witness::new().with("a", "x");
        assert!(matches!(
            CircuitBuilder::new(CircuitKind::HelloWorld).with_witness(&witness),
            Err(CircuitError::Witness(_))
        ));
    }
}
