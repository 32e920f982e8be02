//! Predefined gate rewrites: CNOT→CZ, SWAP→CNOT, SWAP→CZ.

use std::f64::consts::PI;

use ratatosk_core::{library, CompileResult, Decomposer, Gate, QubitId};

/// Rewrites each CNOT as a CZ sandwiched by Y rotations on the target:
///
/// ```text
/// ---•---     -----------------•----------------
///    |     →                   |
/// ---⊕---     --[Ry(-π/2)]----[Z]---[Ry(π/2)]---
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Cnot2CzDecomposer;

impl Decomposer for Cnot2CzDecomposer {
    fn name(&self) -> &str {
        "cnot2cz_decomposer"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        if gate.name() != Some("CNOT") {
            return Ok(vec![gate.clone()]);
        }
        let [control, target] = two_operands(gate);
        Ok(vec![
            library::ry(target, -PI / 2.0),
            library::cz(control, target),
            library::ry(target, PI / 2.0),
        ])
    }
}

/// Rewrites each SWAP as three CNOT gates:
///
/// ```text
/// ---x---     ----•---[X]---•----
///    |     →     |    |    |
/// ---x---     ---[X]---•---[X]---
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Swap2CnotDecomposer;

impl Decomposer for Swap2CnotDecomposer {
    fn name(&self) -> &str {
        "swap2cnot_decomposer"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        if gate.name() != Some("SWAP") {
            return Ok(vec![gate.clone()]);
        }
        let [q0, q1] = two_operands(gate);
        Ok(vec![
            library::cnot(q0, q1),
            library::cnot(q1, q0),
            library::cnot(q0, q1),
        ])
    }
}

/// Rewrites each SWAP as three CZ gates with Ry basis changes on the
/// alternating target qubit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swap2CzDecomposer;

impl Decomposer for Swap2CzDecomposer {
    fn name(&self) -> &str {
        "swap2cz_decomposer"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        if gate.name() != Some("SWAP") {
            return Ok(vec![gate.clone()]);
        }
        let [q0, q1] = two_operands(gate);
        Ok(vec![
            library::ry(q1, -PI / 2.0),
            library::cz(q0, q1),
            library::ry(q1, PI / 2.0),
            library::ry(q0, -PI / 2.0),
            library::cz(q1, q0),
            library::ry(q0, PI / 2.0),
            library::ry(q1, -PI / 2.0),
            library::cz(q0, q1),
            library::ry(q1, PI / 2.0),
        ])
    }
}

fn two_operands(gate: &Gate) -> [QubitId; 2] {
    let operands = gate.qubit_operands();
    [operands[0], operands[1]]
}
