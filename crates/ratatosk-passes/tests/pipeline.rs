//! End-to-end pipeline tests: route → rewrite to CZ → merge → McKay →
//! validate, mirroring a full compilation against a linear-chain
//! device.

use std::f64::consts::PI;

use ratatosk_core::expander::circuit_matrix;
use ratatosk_core::{BitId, Circuit, CircuitBuilder, Ir, QubitId, Statement};
use ratatosk_passes::{
    Cnot2CzDecomposer, Connectivity, InteractionValidator, McKayDecomposer,
    PrimitiveGateValidator, ShortestPathRouter, SingleQubitGatesMerger, Swap2CzDecomposer,
};

fn chain_connectivity() -> Connectivity {
    Connectivity::from_pairs(&[(0, &[1]), (1, &[0, 2]), (2, &[1])])
}

fn tutorial_circuit() -> Circuit {
    let mut builder = CircuitBuilder::new(3, 2);
    builder
        .init_all()
        .unwrap()
        .ry(PI / 2.0, QubitId(0))
        .unwrap()
        .x(QubitId(0))
        .unwrap()
        .cnot(QubitId(0), QubitId(2))
        .unwrap()
        .barrier_all()
        .unwrap()
        .measure(QubitId(0), BitId(0))
        .unwrap()
        .measure(QubitId(2), BitId(1))
        .unwrap();
    builder.to_circuit()
}

#[test]
fn test_full_pipeline_against_chain() {
    let mut circuit = tutorial_circuit();

    circuit
        .route(&ShortestPathRouter::new(chain_connectivity()))
        .unwrap();
    circuit.decompose(&Swap2CzDecomposer).unwrap();
    circuit.decompose(&Cnot2CzDecomposer).unwrap();
    circuit.merge(&SingleQubitGatesMerger).unwrap();
    circuit.decompose(&McKayDecomposer).unwrap();

    circuit
        .validate(&InteractionValidator::new(chain_connectivity()))
        .unwrap();
    circuit
        .validate(&PrimitiveGateValidator::new([
            "I", "X90", "mX90", "Y90", "mY90", "Rz", "CZ",
        ]))
        .unwrap();

    // No anonymous gates survive McKay.
    assert!(circuit.ir().gates().all(|g| !g.is_anonymous()));

    // Measurements follow the routed qubits: virtual qubit 0 was
    // swapped onto physical qubit 1.
    let measured: Vec<_> = circuit
        .ir()
        .iter()
        .filter(|s| s.is_measure())
        .map(|s| s.qubit_operands()[0])
        .collect();
    assert_eq!(measured, vec![QubitId(1), QubitId(2)]);
}

#[test]
fn test_unitary_preserved_without_routing() {
    // The unitary part of the tutorial circuit, decomposed all the way
    // to the primitive set, must keep its matrix up to a global phase.
    let mut builder = CircuitBuilder::new(3, 0);
    builder
        .ry(PI / 2.0, QubitId(0))
        .unwrap()
        .x(QubitId(0))
        .unwrap()
        .cnot(QubitId(0), QubitId(2))
        .unwrap();
    let mut circuit = builder.to_circuit();
    let reference = circuit_matrix(circuit.ir(), 3).unwrap();

    circuit.decompose(&Cnot2CzDecomposer).unwrap();
    circuit.merge(&SingleQubitGatesMerger).unwrap();
    circuit.decompose(&McKayDecomposer).unwrap();

    let lowered = circuit_matrix(circuit.ir(), 3).unwrap();
    assert!(reference.equal_up_to_global_phase(&lowered, 1e-6));

    circuit
        .validate(&PrimitiveGateValidator::new([
            "I", "X90", "mX90", "Y90", "mY90", "Rz", "CZ",
        ]))
        .unwrap();
}

#[test]
fn test_swap_rewrite_roundtrip_is_identity() {
    // SWAP → 3 CNOTs, then CNOT → CZ sandwiches; the result still
    // multiplies out to the SWAP matrix.
    let mut builder = CircuitBuilder::new(2, 0);
    builder.swap(QubitId(0), QubitId(1)).unwrap();
    let mut circuit = builder.to_circuit();
    let reference = circuit_matrix(circuit.ir(), 2).unwrap();

    circuit
        .decompose(&ratatosk_passes::Swap2CnotDecomposer)
        .unwrap();
    circuit.decompose(&Cnot2CzDecomposer).unwrap();

    let lowered = circuit_matrix(circuit.ir(), 2).unwrap();
    assert!(reference.equal_up_to_global_phase(&lowered, 1e-6));
}

#[test]
fn test_empty_circuit_flows_through_every_pass() {
    let mut circuit = Circuit::new(2, 0);
    circuit.merge(&SingleQubitGatesMerger).unwrap();
    circuit.decompose(&McKayDecomposer).unwrap();
    circuit
        .route(&ShortestPathRouter::new(Connectivity::linear(2)))
        .unwrap();
    circuit
        .validate(&InteractionValidator::new(Connectivity::linear(2)))
        .unwrap();
    assert_eq!(circuit.ir(), &Ir::new());
}

#[test]
fn test_merger_keeps_barriers_in_routed_circuit() {
    let mut circuit = tutorial_circuit();
    circuit
        .route(&ShortestPathRouter::new(chain_connectivity()))
        .unwrap();
    circuit.merge(&SingleQubitGatesMerger).unwrap();

    let barriers = circuit
        .ir()
        .iter()
        .filter(|s| matches!(s, Statement::Control(_)))
        .count();
    assert_eq!(barriers, 3);
}
