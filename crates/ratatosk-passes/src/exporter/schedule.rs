//! Lowering to a schedule of hardware operations.

use rustc_hash::FxHashMap;
use serde::Serialize;

use ratatosk_core::{
    Circuit, CompileError, CompileResult, ControlInstruction, Exporter, GateKind, NonUnitary,
    Statement, ATOL,
};

/// Decimal places kept after radian→degree conversion.
const DEG_PRECISION: i32 = 5;

fn degrees(radians: f64) -> f64 {
    let factor = 10f64.powi(DEG_PRECISION);
    (radians.to_degrees() * factor).round() / factor
}

/// One schedule operation. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScheduleOp {
    /// Rotation in the XY plane by `theta` about the axis at azimuth
    /// `phi`.
    Rxy {
        /// Rotation angle in degrees.
        theta: f64,
        /// Axis azimuth in degrees.
        phi: f64,
        /// Physical qubit.
        qubit: usize,
    },
    /// Z rotation.
    Rz {
        /// Rotation angle in degrees.
        theta: f64,
        /// Physical qubit.
        qubit: usize,
    },
    /// Controlled-X.
    Cnot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Controlled-Z.
    Cz {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Measurement.
    Measure {
        /// Measured qubit.
        qubit: usize,
        /// Zero-based index among this qubit's measurements.
        acq_index: usize,
    },
    /// Reset to |0⟩.
    Reset {
        /// Reset qubit.
        qubit: usize,
    },
}

/// A lowered circuit: the operation sequence plus the
/// measurement-to-bit map (for each measured qubit, the ordered bit
/// indices its outcomes were assigned to).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    /// Operations in program order.
    pub operations: Vec<ScheduleOp>,
    /// Measured qubit index → ordered list of receiving bit indices.
    pub measurement_to_bit: FxHashMap<usize, Vec<usize>>,
}

/// Lowers a decomposed circuit to a [`Schedule`].
///
/// Supports XY-plane and Z-axis rotations, CNOT, CZ, measure, and
/// reset. `init` and barriers are dropped; anything else (H, SWAP,
/// off-plane rotations, other two-qubit gates) must be decomposed
/// first and reports [`CompileError::UnsupportedGate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleExporter;

impl Exporter for ScheduleExporter {
    type Output = Schedule;

    fn name(&self) -> &str {
        "schedule_exporter"
    }

    fn export(&self, circuit: &Circuit) -> CompileResult<Schedule> {
        let mut schedule = Schedule::default();
        let mut measurements_per_qubit: FxHashMap<usize, usize> = FxHashMap::default();

        for statement in circuit.ir().iter() {
            match statement {
                Statement::Gate(gate) => {
                    schedule.operations.push(lower_gate(gate)?);
                }
                Statement::NonUnitary(NonUnitary::Measure { qubit, bit }) => {
                    let count = measurements_per_qubit.entry(qubit.index()).or_insert(0);
                    schedule.operations.push(ScheduleOp::Measure {
                        qubit: qubit.index(),
                        acq_index: *count,
                    });
                    *count += 1;
                    schedule
                        .measurement_to_bit
                        .entry(qubit.index())
                        .or_default()
                        .push(bit.index());
                }
                Statement::NonUnitary(NonUnitary::Reset(qubit)) => {
                    schedule.operations.push(ScheduleOp::Reset {
                        qubit: qubit.index(),
                    });
                }
                Statement::NonUnitary(NonUnitary::Init(_))
                | Statement::Control(ControlInstruction::Barrier(_))
                | Statement::Control(ControlInstruction::Wait { .. })
                | Statement::Asm(_) => {}
            }
        }
        Ok(schedule)
    }
}

fn lower_gate(gate: &ratatosk_core::Gate) -> CompileResult<ScheduleOp> {
    match &gate.kind {
        GateKind::Rotation(rotation) => {
            let [nx, ny, nz] = rotation.axis.components();
            if nz.abs() < ATOL {
                return Ok(ScheduleOp::Rxy {
                    theta: degrees(rotation.angle),
                    phi: degrees(ny.atan2(nx)),
                    qubit: rotation.qubit.index(),
                });
            }
            if nx.abs() < ATOL && ny.abs() < ATOL {
                return Ok(ScheduleOp::Rz {
                    theta: degrees(rotation.angle * nz),
                    qubit: rotation.qubit.index(),
                });
            }
            Err(CompileError::unsupported(format!(
                "rotation about axis {} cannot be scheduled; decompose first",
                rotation.axis
            )))
        }
        GateKind::Controlled(controlled) => {
            let Some(target) = controlled.target.as_rotation() else {
                return Err(CompileError::unsupported(
                    "controlled gate with a non-rotation target",
                ));
            };
            let control = controlled.control.index();
            let qubit = target.qubit;
            let x_reference = ratatosk_core::library::x(qubit);
            let z_reference = ratatosk_core::library::z(qubit);
            if Some(target) == x_reference.as_rotation() {
                return Ok(ScheduleOp::Cnot {
                    control,
                    target: qubit.index(),
                });
            }
            if Some(target) == z_reference.as_rotation() {
                return Ok(ScheduleOp::Cz {
                    control,
                    target: qubit.index(),
                });
            }
            Err(CompileError::unsupported(
                "only controlled-X and controlled-Z can be scheduled",
            ))
        }
        GateKind::Matrix(_) => Err(CompileError::unsupported(format!(
            "matrix gate '{}' cannot be scheduled; decompose first",
            gate.name().unwrap_or("<anonymous>"),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatosk_core::{BitId, CircuitBuilder, QubitId};
    use std::f64::consts::PI;

    #[test]
    fn test_rotations_measure_and_reset() {
        let mut builder = CircuitBuilder::new(2, 2);
        builder
            .init(QubitId(0))
            .unwrap()
            .rx(PI / 2.0, QubitId(0))
            .unwrap()
            .rz(-PI / 4.0, QubitId(1))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap()
            .reset(QubitId(0))
            .unwrap()
            .measure(QubitId(0), BitId(0))
            .unwrap()
            .measure(QubitId(0), BitId(1))
            .unwrap();
        let schedule = builder
            .to_circuit()
            .export(&ScheduleExporter)
            .unwrap();

        assert_eq!(
            schedule.operations,
            vec![
                ScheduleOp::Rxy {
                    theta: 90.0,
                    phi: 0.0,
                    qubit: 0
                },
                ScheduleOp::Rz {
                    theta: -45.0,
                    qubit: 1
                },
                ScheduleOp::Cnot {
                    control: 0,
                    target: 1
                },
                ScheduleOp::Reset { qubit: 0 },
                ScheduleOp::Measure {
                    qubit: 0,
                    acq_index: 0
                },
                ScheduleOp::Measure {
                    qubit: 0,
                    acq_index: 1
                },
            ]
        );
        assert_eq!(schedule.measurement_to_bit[&0], vec![0, 1]);
    }

    #[test]
    fn test_y_rotation_has_90_degree_azimuth() {
        let mut builder = CircuitBuilder::new(1, 0);
        builder.ry(PI, QubitId(0)).unwrap();
        let schedule = builder.to_circuit().export(&ScheduleExporter).unwrap();
        assert_eq!(
            schedule.operations,
            vec![ScheduleOp::Rxy {
                theta: 180.0,
                phi: 90.0,
                qubit: 0
            }]
        );
    }

    #[test]
    fn test_cz_lowering() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder.cz(QubitId(1), QubitId(0)).unwrap();
        let schedule = builder.to_circuit().export(&ScheduleExporter).unwrap();
        assert_eq!(
            schedule.operations,
            vec![ScheduleOp::Cz {
                control: 1,
                target: 0
            }]
        );
    }

    #[test]
    fn test_hadamard_rejected() {
        let mut builder = CircuitBuilder::new(1, 0);
        builder.h(QubitId(0)).unwrap();
        assert!(matches!(
            builder.to_circuit().export(&ScheduleExporter),
            Err(CompileError::UnsupportedGate { .. })
        ));
    }

    #[test]
    fn test_swap_rejected() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder.swap(QubitId(0), QubitId(1)).unwrap();
        assert!(builder.to_circuit().export(&ScheduleExporter).is_err());
    }

    #[test]
    fn test_cr_rejected() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder.cr(0.7, QubitId(0), QubitId(1)).unwrap();
        assert!(builder.to_circuit().export(&ScheduleExporter).is_err());
    }
}
