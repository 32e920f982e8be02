//! cQASM 3 serialization.

use crate::circuit::Circuit;
use crate::gate::{Gate, GateKind};
use crate::library;
use crate::statement::{ControlInstruction, NonUnitary, Statement};

/// Number of significant digits used when printing floats.
const SIGNIFICANT_DIGITS: i32 = 7;

/// Format a float with [`SIGNIFICANT_DIGITS`] significant digits.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    if value == 0.0 {
        return "0.0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(SIGNIFICANT_DIGITS - 1 - magnitude);
    let rounded = (value * factor).round() / factor;
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

/// Serialize a circuit to its cQASM 3 string form.
pub fn circuit_to_string(circuit: &Circuit) -> String {
    let mut out = String::from("version 3.0\n");
    out.push('\n');
    if circuit.qubit_register_size() > 0 {
        out.push_str(&format!("qubit[{}] q\n", circuit.qubit_register_size()));
    }
    if circuit.bit_register_size() > 0 {
        out.push_str(&format!("bit[{}] b\n", circuit.bit_register_size()));
    }
    if !circuit.ir().is_empty() {
        out.push('\n');
        for statement in circuit.ir().iter() {
            out.push_str(&statement_line(statement));
            out.push('\n');
        }
    }
    out
}

fn statement_line(statement: &Statement) -> String {
    match statement {
        Statement::Gate(gate) => gate_line(gate),
        Statement::NonUnitary(NonUnitary::Init(q)) => format!("init q[{}]", q.0),
        Statement::NonUnitary(NonUnitary::Reset(q)) => format!("reset q[{}]", q.0),
        Statement::NonUnitary(NonUnitary::Measure { qubit, bit }) => {
            format!("b[{}] = measure q[{}]", bit.0, qubit.0)
        }
        Statement::Control(ControlInstruction::Barrier(q)) => format!("barrier q[{}]", q.0),
        Statement::Control(ControlInstruction::Wait { qubit, cycles }) => {
            format!("wait({cycles}) q[{}]", qubit.0)
        }
        Statement::Asm(asm) => {
            format!("asm({}) '''{}'''", asm.backend_name, asm.payload)
        }
    }
}

fn operand_list(gate: &Gate) -> String {
    gate.qubit_operands()
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn gate_line(gate: &Gate) -> String {
    if let Some(name) = gate.name() {
        let params = if gate.params.is_empty() {
            String::new()
        } else {
            format!(
                "({})",
                gate.params
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        return format!("{name}{params} {}", operand_list(gate));
    }
    anonymous_gate_line(gate)
}

fn anonymous_gate_line(gate: &Gate) -> String {
    match &gate.kind {
        GateKind::Rotation(r) if library::is_catalog_name("Rn") => {
            let [nx, ny, nz] = r.axis.components();
            format!(
                "Rn({}, {}, {}, {}, {}) q[{}]",
                format_float(nx),
                format_float(ny),
                format_float(nz),
                format_float(r.angle),
                format_float(r.phase),
                r.qubit.0,
            )
        }
        GateKind::Rotation(r) => format!(
            "BlochSphereRotation(q[{}], axis={}, angle={}, phase={})",
            r.qubit.0,
            r.axis,
            format_float(r.angle),
            format_float(r.phase),
        ),
        GateKind::Controlled(c) => format!(
            "ControlledGate(q[{}], {})",
            c.control.0,
            gate_line(&c.target),
        ),
        GateKind::Matrix(_) => format!("MatrixGate({})", operand_list(gate)),
    }
}
