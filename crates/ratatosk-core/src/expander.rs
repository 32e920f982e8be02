//! Expansion of gates into full-register unitaries.
//!
//! Qubit `i` of the register is the `i`-th least significant bit of the
//! ket index. Gate-local matrices are written with their operands
//! reversed, so the first operand of a two-qubit gate is the most
//! significant gate-local bit.

use crate::error::{CompileError, CompileResult};
use crate::gate::{Gate, GateKind};
use crate::ir::Ir;
use crate::matrix::SquareMatrix;
use crate::qubit::QubitId;
use crate::statement::Statement;

/// Largest register size dense expansion will accept.
const MAX_EXPANSION_QUBITS: usize = 12;

/// Extract the bits of `ket` at the given qubit positions, in order.
fn reduced_ket(ket: usize, qubits: &[QubitId]) -> usize {
    let mut reduced = 0;
    for (i, qubit) in qubits.iter().enumerate() {
        reduced |= ((ket >> qubit.index()) & 1) << i;
    }
    reduced
}

/// Deposit the bits of `reduced` into `base` at the given qubit
/// positions, leaving all other bits of `base` untouched.
fn expanded_ket(base: usize, reduced: usize, qubits: &[QubitId]) -> usize {
    let mut expanded = base;
    for (i, qubit) in qubits.iter().enumerate() {
        expanded &= !(1 << qubit.index());
        expanded |= ((reduced >> i) & 1) << qubit.index();
    }
    expanded
}

/// Embed a gate-local matrix acting on `operands` into the full
/// register space. `operands` are given most-significant-first, per the
/// matrix convention.
fn embed(
    small: &SquareMatrix,
    operands_msb_first: &[QubitId],
    qubit_register_size: usize,
) -> CompileResult<SquareMatrix> {
    let qubits_lsb_first: Vec<QubitId> =
        operands_msb_first.iter().rev().copied().collect();
    for qubit in &qubits_lsb_first {
        if qubit.index() >= qubit_register_size {
            return Err(CompileError::invalid_gate(format!(
                "operand {qubit} is out of range for a register of size {qubit_register_size}"
            )));
        }
    }
    let dim = 1usize << qubit_register_size;
    let mut expanded = SquareMatrix::zeros(dim);
    for col in 0..dim {
        let small_col = reduced_ket(col, &qubits_lsb_first);
        for small_row in 0..small.dim() {
            let row = expanded_ket(col, small_row, &qubits_lsb_first);
            expanded.set(row, col, small.get(small_row, small_col));
        }
    }
    Ok(expanded)
}

/// The unitary of a single gate on a register of `qubit_register_size`
/// qubits.
pub fn gate_matrix(gate: &Gate, qubit_register_size: usize) -> CompileResult<SquareMatrix> {
    if qubit_register_size > MAX_EXPANSION_QUBITS {
        return Err(CompileError::domain(format!(
            "dense expansion is limited to {MAX_EXPANSION_QUBITS} qubits"
        )));
    }
    match &gate.kind {
        GateKind::Rotation(rotation) => {
            embed(&rotation.to_matrix(), &[rotation.qubit], qubit_register_size)
        }
        GateKind::Controlled(controlled) => {
            if controlled.control.index() >= qubit_register_size {
                return Err(CompileError::invalid_gate(format!(
                    "control {} is out of range",
                    controlled.control
                )));
            }
            let mut expanded = gate_matrix(&controlled.target, qubit_register_size)?;
            let control_bit = 1usize << controlled.control.index();
            for col in 0..expanded.dim() {
                if col & control_bit == 0 {
                    for row in 0..expanded.dim() {
                        let value = if row == col { 1.0 } else { 0.0 };
                        expanded.set(row, col, num_complex::Complex64::new(value, 0.0));
                    }
                }
            }
            Ok(expanded)
        }
        GateKind::Matrix(matrix_gate) => {
            embed(&matrix_gate.matrix, &matrix_gate.operands, qubit_register_size)
        }
    }
}

/// The accumulated unitary of the gate statements of an IR.
///
/// Barriers, waits, and asm declarations contribute nothing; a
/// non-unitary instruction is an error.
pub fn circuit_matrix(ir: &Ir, qubit_register_size: usize) -> CompileResult<SquareMatrix> {
    if qubit_register_size > MAX_EXPANSION_QUBITS {
        return Err(CompileError::domain(format!(
            "dense expansion is limited to {MAX_EXPANSION_QUBITS} qubits"
        )));
    }
    let mut accumulated = SquareMatrix::identity(1 << qubit_register_size);
    for statement in ir.iter() {
        match statement {
            Statement::Gate(gate) => {
                accumulated = gate_matrix(gate, qubit_register_size)?.mul(&accumulated);
            }
            Statement::Control(_) | Statement::Asm(_) => {}
            Statement::NonUnitary(_) => {
                return Err(CompileError::invalid_gate(
                    "cannot compute the unitary of a circuit with non-unitary instructions",
                ));
            }
        }
    }
    Ok(accumulated)
}

/// Reindex the operands of `gates` into a compact register `0..k` and
/// compute the accumulated unitary over that register. `operands`
/// defines the reindexing: `operands[i]` becomes qubit `i`.
pub fn reindexed_circuit_matrix(
    gates: &[Gate],
    operands: &[QubitId],
) -> CompileResult<SquareMatrix> {
    let mut ir = Ir::new();
    for gate in gates {
        // Remapping is infallible, so check membership up front.
        for qubit in gate.qubit_operands() {
            if !operands.contains(&qubit) {
                return Err(CompileError::invalid_gate(format!(
                    "operand {qubit} is not in the reindex set"
                )));
            }
        }
        ir.add_gate(gate.remapped(&|q| {
            QubitId::from(operands.iter().position(|&o| o == q).unwrap_or(0))
        }));
    }
    circuit_matrix(&ir, operands.len())
}
