//! The named-gate catalog.
//!
//! Every constructor returns a [`Gate`] tagged with its catalog name;
//! the recognizer maps anonymous rotations back onto the parameterless
//! entries. Rotation gates `Rx/Ry/Rz(θ)` carry phase `θ/2`, so a chain
//! of fractional rotations composes to the named π-rotation including
//! its phase (`X`, `Y`, `Z` carry phase `π/2`).

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;

use crate::axis::Axis;
use crate::bsr::BlochSphereRotation;
use crate::error::CompileResult;
use crate::gate::{ControlledGate, Gate, GateKind, MatrixGate, Param};
use crate::matrix::SquareMatrix;
use crate::qubit::QubitId;

fn rotation(
    name: &str,
    params: Vec<Param>,
    qubit: QubitId,
    axis: Axis,
    angle: f64,
    phase: f64,
) -> Gate {
    Gate::named(
        GateKind::Rotation(BlochSphereRotation::new(qubit, axis, angle, phase)),
        name,
        params,
    )
}

const H_AXIS: Axis = Axis::from_normalized([FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2]);

/// Identity.
pub fn i(qubit: QubitId) -> Gate {
    rotation("I", vec![], qubit, Axis::x(), 0.0, 0.0)
}

/// Hadamard.
pub fn h(qubit: QubitId) -> Gate {
    rotation("H", vec![], qubit, H_AXIS, PI, PI / 2.0)
}

/// Pauli-X.
pub fn x(qubit: QubitId) -> Gate {
    rotation("X", vec![], qubit, Axis::x(), PI, PI / 2.0)
}

/// +90° X rotation.
pub fn x90(qubit: QubitId) -> Gate {
    rotation("X90", vec![], qubit, Axis::x(), PI / 2.0, 0.0)
}

/// −90° X rotation.
pub fn mx90(qubit: QubitId) -> Gate {
    rotation("mX90", vec![], qubit, Axis::x(), -PI / 2.0, 0.0)
}

/// Pauli-Y.
pub fn y(qubit: QubitId) -> Gate {
    rotation("Y", vec![], qubit, Axis::y(), PI, PI / 2.0)
}

/// +90° Y rotation.
pub fn y90(qubit: QubitId) -> Gate {
    rotation("Y90", vec![], qubit, Axis::y(), PI / 2.0, 0.0)
}

/// −90° Y rotation.
pub fn my90(qubit: QubitId) -> Gate {
    rotation("mY90", vec![], qubit, Axis::y(), -PI / 2.0, 0.0)
}

/// Pauli-Z.
pub fn z(qubit: QubitId) -> Gate {
    rotation("Z", vec![], qubit, Axis::z(), PI, PI / 2.0)
}

/// S gate (√Z).
pub fn s(qubit: QubitId) -> Gate {
    rotation("S", vec![], qubit, Axis::z(), PI / 2.0, 0.0)
}

/// S† gate.
pub fn sdag(qubit: QubitId) -> Gate {
    rotation("Sdag", vec![], qubit, Axis::z(), -PI / 2.0, 0.0)
}

/// T gate (fourth root of Z).
pub fn t(qubit: QubitId) -> Gate {
    rotation("T", vec![], qubit, Axis::z(), PI / 4.0, 0.0)
}

/// T† gate.
pub fn tdag(qubit: QubitId) -> Gate {
    rotation("Tdag", vec![], qubit, Axis::z(), -PI / 4.0, 0.0)
}

/// X rotation by `theta`.
pub fn rx(qubit: QubitId, theta: f64) -> Gate {
    rotation(
        "Rx",
        vec![Param::Float(theta)],
        qubit,
        Axis::x(),
        theta,
        theta / 2.0,
    )
}

/// Y rotation by `theta`.
pub fn ry(qubit: QubitId, theta: f64) -> Gate {
    rotation(
        "Ry",
        vec![Param::Float(theta)],
        qubit,
        Axis::y(),
        theta,
        theta / 2.0,
    )
}

/// Z rotation by `theta`.
pub fn rz(qubit: QubitId, theta: f64) -> Gate {
    rotation(
        "Rz",
        vec![Param::Float(theta)],
        qubit,
        Axis::z(),
        theta,
        theta / 2.0,
    )
}

/// Rotation about an arbitrary axis, with explicit phase. This is the
/// named form the writer uses for otherwise-anonymous rotations.
pub fn rn(
    qubit: QubitId,
    nx: f64,
    ny: f64,
    nz: f64,
    theta: f64,
    phi: f64,
) -> CompileResult<Gate> {
    let axis = Axis::new(nx, ny, nz)?;
    Ok(rotation(
        "Rn",
        vec![
            Param::Float(nx),
            Param::Float(ny),
            Param::Float(nz),
            Param::Float(theta),
            Param::Float(phi),
        ],
        qubit,
        axis,
        theta,
        phi,
    ))
}

fn controlled(name: &str, params: Vec<Param>, control: QubitId, target: Gate) -> Gate {
    Gate::named(
        GateKind::Controlled(ControlledGate {
            control,
            target: Box::new(target),
        }),
        name,
        params,
    )
}

/// Controlled-X.
pub fn cnot(control: QubitId, target: QubitId) -> Gate {
    controlled("CNOT", vec![], control, x(target))
}

/// Controlled-Z.
pub fn cz(control: QubitId, target: QubitId) -> Gate {
    controlled("CZ", vec![], control, z(target))
}

/// Controlled phase rotation by `theta`.
pub fn cr(control: QubitId, target: QubitId, theta: f64) -> Gate {
    controlled(
        "CR",
        vec![Param::Float(theta)],
        control,
        Gate::anonymous(GateKind::Rotation(BlochSphereRotation::new(
            target,
            Axis::z(),
            theta,
            theta / 2.0,
        ))),
    )
}

/// Controlled phase rotation by `2π / 2^k`.
pub fn crk(control: QubitId, target: QubitId, k: i64) -> Gate {
    let theta = 2.0 * PI / f64::from(2u32).powi(k as i32);
    controlled(
        "CRk",
        vec![Param::Int(k)],
        control,
        Gate::anonymous(GateKind::Rotation(BlochSphereRotation::new(
            target,
            Axis::z(),
            theta,
            theta / 2.0,
        ))),
    )
}

/// SWAP of two qubits.
pub fn swap(q0: QubitId, q1: QubitId) -> Gate {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    #[rustfmt::skip]
    let matrix = SquareMatrix::from_vec(4, vec![
        one,  zero, zero, zero,
        zero, zero, one,  zero,
        zero, one,  zero, zero,
        zero, zero, zero, one,
    ]);
    Gate::named(
        GateKind::Matrix(MatrixGate {
            matrix,
            operands: vec![q0, q1],
        }),
        "SWAP",
        vec![],
    )
}

/// One catalog row: name, qubit arity, parameter count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Catalog name.
    pub name: &'static str,
    /// Number of qubit operands.
    pub num_qubits: usize,
    /// Number of non-qubit parameters.
    pub num_params: usize,
}

/// The ordered catalog of named gates.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry { name: "I", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "H", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "X", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "X90", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "mX90", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "Y", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "Y90", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "mY90", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "Z", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "S", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "Sdag", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "T", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "Tdag", num_qubits: 1, num_params: 0 },
    CatalogEntry { name: "Rx", num_qubits: 1, num_params: 1 },
    CatalogEntry { name: "Ry", num_qubits: 1, num_params: 1 },
    CatalogEntry { name: "Rz", num_qubits: 1, num_params: 1 },
    CatalogEntry { name: "Rn", num_qubits: 1, num_params: 5 },
    CatalogEntry { name: "CNOT", num_qubits: 2, num_params: 0 },
    CatalogEntry { name: "CZ", num_qubits: 2, num_params: 0 },
    CatalogEntry { name: "CR", num_qubits: 2, num_params: 1 },
    CatalogEntry { name: "CRk", num_qubits: 2, num_params: 1 },
    CatalogEntry { name: "SWAP", num_qubits: 2, num_params: 0 },
];

/// Whether `name` is a catalog gate.
pub fn is_catalog_name(name: &str) -> bool {
    CATALOG.iter().any(|entry| entry.name == name)
}

/// The parameterless rotation entries the recognizer matches against.
const ROTATIONS_WITHOUT_PARAMS: &[fn(QubitId) -> Gate] = &[
    i, h, x, x90, mx90, y, y90, my90, z, s, sdag, t, tdag,
];

/// Try to identify an anonymous rotation with a parameterless catalog
/// entry. `Rx/Ry/Rz` are not matched, since they take an angle
/// parameter.
pub fn try_name_rotation(rotation: &BlochSphereRotation) -> Option<Gate> {
    for factory in ROTATIONS_WITHOUT_PARAMS {
        let candidate = factory(rotation.qubit);
        if candidate
            .as_rotation()
            .is_some_and(|semantic| semantic == rotation)
        {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ATOL;

    #[test]
    fn test_catalog_arities() {
        assert!(is_catalog_name("CNOT"));
        assert!(!is_catalog_name("Hadamard"));
        let rn_entry = CATALOG.iter().find(|e| e.name == "Rn").unwrap();
        assert_eq!(rn_entry.num_params, 5);
    }

    #[test]
    fn test_rotation_phase_convention() {
        // Four quarter-X rotations compose to X, phase included.
        let quarter = rx(QubitId(0), PI / 4.0);
        let mut acc = BlochSphereRotation::identity(QubitId(0));
        for _ in 0..4 {
            acc = BlochSphereRotation::compose(&acc, quarter.as_rotation().unwrap());
        }
        let x_semantics = x(QubitId(0));
        assert_eq!(acc, *x_semantics.as_rotation().unwrap());
    }

    #[test]
    fn test_recognizer() {
        let anonymous = BlochSphereRotation::new(QubitId(2), Axis::z(), PI / 2.0, 0.0);
        let named = try_name_rotation(&anonymous).unwrap();
        assert_eq!(named.name(), Some("S"));

        let unknown = BlochSphereRotation::new(QubitId(2), Axis::z(), 0.1234, 0.0);
        assert!(try_name_rotation(&unknown).is_none());
    }

    #[test]
    fn test_crk_angle() {
        let gate = crk(QubitId(0), QubitId(1), 2);
        let target = gate.as_controlled().unwrap().target.as_rotation().unwrap();
        assert!((target.angle - PI / 2.0).abs() < ATOL);
        assert!((target.phase - PI / 4.0).abs() < ATOL);
    }

    #[test]
    fn test_swap_is_unitary() {
        let gate = swap(QubitId(0), QubitId(1));
        assert!(gate.validate().is_ok());
        assert!(!gate.is_identity());
    }

    #[test]
    fn test_controlled_gates_are_valid() {
        assert!(cnot(QubitId(0), QubitId(1)).validate().is_ok());
        assert!(cnot(QubitId(0), QubitId(0)).validate().is_err());
        assert!(cr(QubitId(0), QubitId(1), 0.5).validate().is_ok());
    }
}
