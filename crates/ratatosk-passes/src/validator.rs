//! Hardware-constraint validators.

use rustc_hash::FxHashSet;

use ratatosk_core::{CompileError, CompileResult, Ir, Validator};

use crate::router::Connectivity;

/// Checks that every two-qubit interaction in the circuit is an edge
/// of the connectivity graph.
#[derive(Debug, Clone)]
pub struct InteractionValidator {
    connectivity: Connectivity,
}

impl InteractionValidator {
    /// A validator against the given connectivity.
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl Validator for InteractionValidator {
    fn name(&self) -> &str {
        "interaction_validator"
    }

    fn validate(&self, ir: &Ir) -> CompileResult<()> {
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut offending: Vec<(usize, usize)> = Vec::new();
        for gate in ir.gates() {
            let operands = gate.qubit_operands();
            if operands.len() != 2 {
                continue;
            }
            let (a, b) = (operands[0].index(), operands[1].index());
            if self.connectivity.is_connected(a, b) {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                offending.push((a, b));
            }
        }
        if offending.is_empty() {
            Ok(())
        } else {
            Err(CompileError::UnroutableInteractions { pairs: offending })
        }
    }
}

/// Checks that every gate carries a name from the primitive gate set.
/// Anonymous gates always fail.
#[derive(Debug, Clone)]
pub struct PrimitiveGateValidator {
    primitive_gate_set: Vec<String>,
}

impl PrimitiveGateValidator {
    /// A validator for the given primitive gate set.
    pub fn new(primitive_gate_set: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            primitive_gate_set: primitive_gate_set.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for PrimitiveGateValidator {
    fn name(&self) -> &str {
        "primitive_gate_validator"
    }

    fn validate(&self, ir: &Ir) -> CompileResult<()> {
        let mut offending: Vec<String> = Vec::new();
        for gate in ir.gates() {
            let name = gate.name().unwrap_or("<anonymous>");
            let allowed =
                !gate.is_anonymous() && self.primitive_gate_set.iter().any(|g| g == name);
            if !allowed && !offending.iter().any(|n| n == name) {
                offending.push(name.to_string());
            }
        }
        if offending.is_empty() {
            Ok(())
        } else {
            Err(CompileError::NonPrimitiveGates { names: offending })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatosk_core::{CircuitBuilder, QubitId};

    #[test]
    fn test_interaction_validator_collects_offending_pairs() {
        // Connectivity from the hardware description; the circuit uses
        // three interactions that are not edges.
        let connectivity = Connectivity::from_pairs(&[
            (0, &[1, 2]),
            (1, &[0, 2, 3]),
            (2, &[0, 1, 4]),
            (3, &[1, 4]),
            (4, &[2, 3]),
        ]);
        let mut builder = CircuitBuilder::new(5, 0);
        builder
            .cnot(QubitId(0), QubitId(3))
            .unwrap()
            .cnot(QubitId(2), QubitId(3))
            .unwrap()
            .cnot(QubitId(0), QubitId(4))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap();
        let circuit = builder.to_circuit();

        let result = circuit.validate(&InteractionValidator::new(connectivity));
        match result {
            Err(CompileError::UnroutableInteractions { pairs }) => {
                assert_eq!(pairs, vec![(0, 3), (2, 3), (0, 4)]);
            }
            other => panic!("expected UnroutableInteractions, got {other:?}"),
        }
    }

    #[test]
    fn test_interaction_validator_accepts_connected_circuit() {
        let mut builder = CircuitBuilder::new(3, 0);
        builder
            .cnot(QubitId(0), QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(2))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        let circuit = builder.to_circuit();
        assert!(circuit
            .validate(&InteractionValidator::new(Connectivity::linear(3)))
            .is_ok());
    }

    #[test]
    fn test_primitive_gate_validator_reports_names() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder
            .h(QubitId(0))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .rz(0.5, QubitId(0))
            .unwrap();
        let circuit = builder.to_circuit();

        let validator =
            PrimitiveGateValidator::new(["I", "X90", "mX90", "Y90", "mY90", "Rz", "CZ"]);
        match circuit.validate(&validator) {
            Err(CompileError::NonPrimitiveGates { names }) => {
                assert_eq!(names, vec!["H".to_string(), "CNOT".to_string()]);
            }
            other => panic!("expected NonPrimitiveGates, got {other:?}"),
        }
    }

    #[test]
    fn test_primitive_gate_validator_rejects_anonymous() {
        use ratatosk_core::{Axis, BlochSphereRotation, Gate, GateKind, Statement};

        let mut builder = CircuitBuilder::new(1, 0);
        builder
            .push_statement(Statement::Gate(Gate::anonymous(GateKind::Rotation(
                BlochSphereRotation::new(QubitId(0), Axis::x(), 0.4, 0.0),
            ))))
            .unwrap();
        let circuit = builder.to_circuit();

        let validator = PrimitiveGateValidator::new(["Rz", "X90"]);
        match circuit.validate(&validator) {
            Err(CompileError::NonPrimitiveGates { names }) => {
                assert_eq!(names, vec!["<anonymous>".to_string()]);
            }
            other => panic!("expected NonPrimitiveGates, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_circuit_passes_both() {
        let circuit = CircuitBuilder::new(2, 0).to_circuit();
        assert!(circuit
            .validate(&InteractionValidator::new(Connectivity::linear(2)))
            .is_ok());
        assert!(circuit
            .validate(&PrimitiveGateValidator::new(["Rz"]))
            .is_ok());
    }
}
