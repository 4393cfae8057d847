use ark_bn254::Fr;
use ark_relations::{
    lc,
    r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError},
};

use super::CircuitKind;

#[derive(Clone, Debug, PartialEq)]
pub struct NativeCircuit {
    pub kind: CircuitKind,
    /// Private inputs in `kind.inputs()` order; `None` for setup.
    pub witness: Option<Vec<Fr>>,
}

impl NativeCircuit {
    pub fn get_public_inputs(&self) -> Option<Vec<Fr>> {
        self.witness
            .as_ref()
            .map(|w| vec![w.iter().product::<Fr>()])
    }
}

impl ConstraintSynthesizer<Fr> for NativeCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let arity = self.kind.inputs().len();
        let value = |i: usize| {
            self.witness
                .as_ref()
                .map(|w| w[i])
                .ok_or(SynthesisError::AssignmentMissing)
        };

        let mut acc = cs.new_witness_variable(|| value(0))?;
        let mut acc_value = self.witness.as_ref().map(|w| w[0]);

        for i in 1..arity {
            let factor = cs.new_witness_variable(|| value(i))?;
            let product_value = acc_value.zip(self.witness.as_ref().map(|w| w[i])).map(|(a, b)| a * b);
            let product = || product_value.ok_or(SynthesisError::AssignmentMissing);

            // the last product is the circuit's public output
            let next = if i + 1 == arity {
                cs.new_input_variable(product)?
            } else {
                cs.new_witness_variable(product)?
            };
            cs.enforce_constraint(lc!() + acc, lc!() + factor, lc!() + next)?;

            acc = next;
            acc_value = product_value;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn satisfied() {
        let mut builder = CircuitBuilder::new(CircuitKind::Multiplier3);
        builder.push_input("in1", 1);
        builder.push_input("in2", 2);
        builder.push_input("in3", 3);

        let circuit = builder.build().unwrap();
        assert_eq!(circuit.get_public_inputs(), Some(vec![Fr::from(6u64)]));

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_constraints(), 2);
        // the implicit `one` plus the output
        assert_eq!(cs.num_instance_variables(), 2);
    }

    #[test]
    fn hello_world_has_one_constraint() {
        let circuit = NativeCircuit {
            kind: CircuitKind::HelloWorld,
            witness: Some(vec![Fr::from(1u64), Fr::from(2u64)]),
        };
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_constraints(), 1);
        assert_eq!(cs.num_witness_variables(), 2);
    }

    #[test]
    fn wrong_output_is_unsatisfied() {
        let circuit = NativeCircuit {
            kind: CircuitKind::HelloWorld,
            witness: Some(vec![Fr::from(3u64), Fr::from(4u64)]),
        };
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        // overwrite the public output with a wrong value
        cs.borrow_mut().unwrap().instance_assignment[1] = Fr::from(11u64);
        assert!(!cs.is_satisfied().unwrap());
    }
}
