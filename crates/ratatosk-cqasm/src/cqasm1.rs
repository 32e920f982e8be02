//! Lowering to the legacy cQASM 1 dialect.

use ratatosk_core::writer::format_float;
use ratatosk_core::{
    Circuit, CompileError, CompileResult, ControlInstruction, Exporter, Gate, GateKind,
    NonUnitary, Param, Statement, ATOL,
};

/// Serializes a circuit as cQASM 1: `version 1.0`, a `qubits N`
/// declaration, lowercased gate names with parameters after the
/// operands, `measure_z`/`prep_z` for measurements and state
/// preparation, and consecutive barriers merged into one SGMQ
/// statement. Bit registers and measurement targets are dropped (the
/// dialect assigns outcomes implicitly).
///
/// Anonymous gates and rotations about non-axis-aligned axes cannot be
/// represented and report [`CompileError::UnsupportedGate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Cqasm1Exporter;

impl Exporter for Cqasm1Exporter {
    type Output = String;

    fn name(&self) -> &str {
        "cqasm_v1_exporter"
    }

    fn export(&self, circuit: &Circuit) -> CompileResult<String> {
        let mut out = String::from("version 1.0\n");
        if circuit.qubit_register_size() > 0 {
            out.push_str(&format!("\nqubits {}\n", circuit.qubit_register_size()));
        }

        let mut body = String::new();
        let mut barrier_run: Vec<u32> = Vec::new();
        for statement in circuit.ir().iter() {
            if let Statement::Control(ControlInstruction::Barrier(qubit)) = statement {
                barrier_run.push(qubit.0);
                continue;
            }
            flush_barriers(&mut body, &mut barrier_run);
            match statement {
                Statement::Gate(gate) => body.push_str(&gate_line(gate)?),
                Statement::NonUnitary(NonUnitary::Measure { qubit, .. }) => {
                    body.push_str(&format!("measure_z q[{}]\n", qubit.0));
                }
                Statement::NonUnitary(NonUnitary::Init(qubit))
                | Statement::NonUnitary(NonUnitary::Reset(qubit)) => {
                    body.push_str(&format!("prep_z q[{}]\n", qubit.0));
                }
                Statement::Control(ControlInstruction::Wait { qubit, cycles }) => {
                    body.push_str(&format!("wait q[{}], {cycles}\n", qubit.0));
                }
                Statement::Control(ControlInstruction::Barrier(_)) | Statement::Asm(_) => {}
            }
        }
        flush_barriers(&mut body, &mut barrier_run);

        if !body.is_empty() {
            out.push('\n');
            out.push_str(&body);
        }
        Ok(out)
    }
}

fn flush_barriers(body: &mut String, barrier_run: &mut Vec<u32>) {
    if barrier_run.is_empty() {
        return;
    }
    let list = barrier_run
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    body.push_str(&format!("barrier q[{list}]\n"));
    barrier_run.clear();
}

fn gate_line(gate: &Gate) -> CompileResult<String> {
    let Some(name) = gate.name() else {
        return Err(CompileError::unsupported(
            "anonymous gates cannot be written as cQASM 1",
        ));
    };

    // Rn survives only when it is axis-aligned, as a plain rotation.
    if name == "Rn" {
        return rn_line(gate);
    }

    let operands = gate
        .qubit_operands()
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ");
    let params = gate
        .params
        .iter()
        .map(|param| match param {
            Param::Int(v) => v.to_string(),
            Param::Float(v) => format_float(*v),
        })
        .collect::<Vec<_>>()
        .join(", ");

    Ok(if params.is_empty() {
        format!("{} {operands}\n", name.to_lowercase())
    } else {
        format!("{} {operands}, {params}\n", name.to_lowercase())
    })
}

fn rn_line(gate: &Gate) -> CompileResult<String> {
    let Some(rotation) = gate.as_rotation() else {
        return Err(CompileError::unsupported("malformed Rn gate"));
    };
    let [nx, ny, nz] = rotation.axis.components();
    let aligned = [
        (nx, "rx"),
        (ny, "ry"),
        (nz, "rz"),
    ];
    for (component, name) in aligned {
        if (component.abs() - 1.0).abs() < ATOL {
            let angle = rotation.angle * component.signum();
            return Ok(format!(
                "{name} q[{}], {}\n",
                rotation.qubit.0,
                format_float(angle)
            ));
        }
    }
    Err(CompileError::unsupported(format!(
        "Rn about axis {} has no cQASM 1 form; decompose first",
        rotation.axis
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatosk_core::{BitId, CircuitBuilder, QubitId};

    #[test]
    fn test_basic_lowering() {
        let mut builder = CircuitBuilder::new(2, 2);
        builder
            .reset(QubitId(0))
            .unwrap()
            .i(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap()
            .rx(5.123, QubitId(0))
            .unwrap()
            .measure(QubitId(0), BitId(0))
            .unwrap()
            .measure(QubitId(1), BitId(1))
            .unwrap();
        let text = builder.to_circuit().export(&Cqasm1Exporter).unwrap();

        assert_eq!(
            text,
            "version 1.0\n\nqubits 2\n\nprep_z q[0]\ni q[0]\nh q[0]\ncnot q[0], q[1]\nrx q[0], 5.123\nmeasure_z q[0]\nmeasure_z q[1]\n"
        );
    }

    #[test]
    fn test_empty_circuit() {
        let circuit = CircuitBuilder::new(3, 0).to_circuit();
        let text = circuit.export(&Cqasm1Exporter).unwrap();
        assert_eq!(text, "version 1.0\n\nqubits 3\n");
    }

    #[test]
    fn test_barrier_grouping() {
        let mut builder = CircuitBuilder::new(3, 0);
        builder
            .h(QubitId(0))
            .unwrap()
            .barrier(QubitId(0))
            .unwrap()
            .barrier(QubitId(1))
            .unwrap()
            .barrier(QubitId(2))
            .unwrap()
            .x(QubitId(1))
            .unwrap();
        let text = builder.to_circuit().export(&Cqasm1Exporter).unwrap();
        assert!(text.contains("barrier q[0, 1, 2]\n"));
    }

    #[test]
    fn test_axis_aligned_rn_lowers_to_rotation() {
        let mut builder = CircuitBuilder::new(1, 0);
        builder.rn(0.0, 0.0, -1.0, 0.5, 0.0, QubitId(0)).unwrap();
        let text = builder.to_circuit().export(&Cqasm1Exporter).unwrap();
        assert!(text.contains("rz q[0], -0.5\n"));
    }

    #[test]
    fn test_tilted_rn_rejected() {
        let mut builder = CircuitBuilder::new(1, 0);
        builder.rn(1.0, 1.0, 0.0, 0.5, 0.0, QubitId(0)).unwrap();
        assert!(matches!(
            builder.to_circuit().export(&Cqasm1Exporter),
            Err(CompileError::UnsupportedGate { .. })
        ));
    }

    #[test]
    fn test_anonymous_gate_rejected() {
        use ratatosk_core::{Axis, BlochSphereRotation, Gate, GateKind, Statement};
        let mut builder = CircuitBuilder::new(1, 0);
        builder
            .push_statement(Statement::Gate(Gate::anonymous(GateKind::Rotation(
                BlochSphereRotation::new(QubitId(0), Axis::x(), 0.3, 0.0),
            ))))
            .unwrap();
        assert!(builder.to_circuit().export(&Cqasm1Exporter).is_err());
    }

    #[test]
    fn test_crk_parameter_is_integer() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder.crk(3, QubitId(0), QubitId(1)).unwrap();
        let text = builder.to_circuit().export(&Cqasm1Exporter).unwrap();
        assert!(text.contains("crk q[0], q[1], 3\n"));
    }
}
