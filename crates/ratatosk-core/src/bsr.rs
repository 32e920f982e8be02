//! Bloch-sphere rotations and their algebra.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::axis::Axis;
use crate::error::{CompileError, CompileResult};
use crate::matrix::SquareMatrix;
use crate::qubit::QubitId;
use crate::ATOL;

/// Canonicalize an angle into the interval `(-π, π]`.
///
/// The boundary favors `+π`, so `π` stays `π` and `-π` maps to `π`.
pub fn normalize_angle(angle: f64) -> f64 {
    let t = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if t <= -PI + ATOL {
        t + 2.0 * PI
    } else {
        t
    }
}

/// A single-qubit unitary parameterized by rotation axis, rotation
/// angle, and global phase:
///
/// `U = exp(i·phase) · (cos(angle/2)·I − i·sin(angle/2)·(n·σ))`
///
/// The angle and phase are canonicalized into `(-π, π]` on
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlochSphereRotation {
    /// The qubit the rotation acts on.
    pub qubit: QubitId,
    /// Normalized rotation axis.
    pub axis: Axis,
    /// Rotation angle in `(-π, π]`.
    pub angle: f64,
    /// Global phase in `(-π, π]`.
    pub phase: f64,
}

impl BlochSphereRotation {
    /// Create a rotation with canonicalized angle and phase.
    pub fn new(qubit: QubitId, axis: Axis, angle: f64, phase: f64) -> Self {
        Self {
            qubit,
            axis,
            angle: normalize_angle(angle),
            phase: normalize_angle(phase),
        }
    }

    /// The identity rotation on `qubit` (angle 0; the axis carries no
    /// information).
    pub fn identity(qubit: QubitId) -> Self {
        Self {
            qubit,
            axis: Axis::x(),
            angle: 0.0,
            phase: 0.0,
        }
    }

    /// Whether this rotation acts as the identity, phase included.
    pub fn is_identity(&self) -> bool {
        self.angle.abs() < ATOL && self.phase.abs() < ATOL
    }

    /// Compose two rotations on the same qubit: `first` is applied
    /// first, then `second`. Quaternion multiplication of the
    /// `(cos(θ/2), sin(θ/2)·n̂)` pairs; phases add.
    ///
    /// # Panics
    ///
    /// Panics if the rotations act on different qubits.
    pub fn compose(first: &Self, second: &Self) -> Self {
        assert_eq!(
            first.qubit, second.qubit,
            "cannot compose rotations on different qubits"
        );
        let (a, b) = (first, second);
        let (sin_a, cos_a) = (a.angle / 2.0).sin_cos();
        let (sin_b, cos_b) = (b.angle / 2.0).sin_cos();

        let cos_combined = (cos_a * cos_b - sin_a * sin_b * a.axis.dot(&b.axis)).clamp(-1.0, 1.0);
        let combined_angle = 2.0 * cos_combined.acos();

        if (combined_angle / 2.0).sin().abs() < ATOL {
            return Self::identity(a.qubit);
        }

        let sin_combined = (combined_angle / 2.0).sin();
        // Vector part of q_second ⊗ q_first, renormalized to a unit axis.
        let cross = b.axis.cross(&a.axis);
        let na = a.axis.components();
        let nb = b.axis.components();
        let mut vector = [0.0; 3];
        for (i, slot) in vector.iter_mut().enumerate() {
            *slot =
                (sin_a * cos_b * na[i] + cos_a * sin_b * nb[i] + sin_a * sin_b * cross[i])
                    / sin_combined;
        }

        match Axis::new(vector[0], vector[1], vector[2]) {
            Ok(axis) => Self::new(a.qubit, axis, combined_angle, a.phase + b.phase),
            Err(_) => Self::identity(a.qubit),
        }
    }

    /// The 2×2 unitary matrix of this rotation.
    pub fn to_matrix(&self) -> SquareMatrix {
        let (sin, cos) = (self.angle / 2.0).sin_cos();
        let [nx, ny, nz] = self.axis.components();
        let phase = Complex64::from_polar(1.0, self.phase);
        SquareMatrix::from_vec(
            2,
            vec![
                phase * Complex64::new(cos, -sin * nz),
                phase * Complex64::new(-sin * ny, -sin * nx),
                phase * Complex64::new(sin * ny, -sin * nx),
                phase * Complex64::new(cos, sin * nz),
            ],
        )
    }

    /// Extract `(axis, angle, phase)` from a 2×2 unitary.
    ///
    /// The degenerate branch (`sin(θ/2) ≈ 0`) returns angle 0 with an
    /// arbitrary axis.
    pub fn from_matrix(qubit: QubitId, matrix: &SquareMatrix) -> CompileResult<Self> {
        if matrix.dim() != 2 {
            return Err(CompileError::invalid_gate(
                "a Bloch-sphere rotation requires a 2x2 matrix",
            ));
        }
        if !matrix.is_unitary(ATOL) {
            return Err(CompileError::invalid_gate("matrix is not unitary"));
        }

        let det = matrix.get(0, 0) * matrix.get(1, 1) - matrix.get(0, 1) * matrix.get(1, 0);
        let mut phase = det.arg() / 2.0;
        let unphase = Complex64::from_polar(1.0, -phase);
        let v00 = matrix.get(0, 0) * unphase;
        let v01 = matrix.get(0, 1) * unphase;
        let v10 = matrix.get(1, 0) * unphase;
        let v11 = matrix.get(1, 1) * unphase;

        let cos_half = (v00 + v11).re / 2.0;
        let sx = -(v01 + v10).im / 2.0;
        let sy = (v10 - v01).re / 2.0;
        let sz = -(v00 - v11).im / 2.0;
        let sin_norm = (sx * sx + sy * sy + sz * sz).sqrt();

        if sin_norm < ATOL {
            // V = ±I: fold the sign into the phase.
            if cos_half < 0.0 {
                phase += PI;
            }
            return Ok(Self {
                qubit,
                axis: Axis::x(),
                angle: 0.0,
                phase: normalize_angle(phase),
            });
        }

        let mut angle = 2.0 * sin_norm.atan2(cos_half);
        if angle > PI + ATOL {
            // Restore the (-π, π] branch; the half-angle functions flip
            // sign, compensated by a π phase shift.
            angle -= 2.0 * PI;
            phase += PI;
        }
        let axis = Axis::new(sx / sin_norm, sy / sin_norm, sz / sin_norm)?;
        Ok(Self::new(qubit, axis, angle, phase))
    }
}

impl PartialEq for BlochSphereRotation {
    /// Tolerance-aware equality: rotations about opposite axes with
    /// opposite angles are the same rotation.
    fn eq(&self, other: &Self) -> bool {
        if self.qubit != other.qubit {
            return false;
        }
        if (self.phase - other.phase).abs() > ATOL {
            return false;
        }
        if self.angle.abs() < ATOL && other.angle.abs() < ATOL {
            return true;
        }
        if self.axis.approx_eq(&other.axis, ATOL) {
            return (self.angle - other.angle).abs() < ATOL;
        }
        if self.axis.approx_eq(&other.axis.flipped(), ATOL) {
            return (self.angle + other.angle).abs() < ATOL;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rx(angle: f64) -> BlochSphereRotation {
        BlochSphereRotation::new(QubitId(0), Axis::x(), angle, 0.0)
    }

    #[test]
    fn test_normalize_angle_boundaries() {
        let cases = [
            (-3.0 * PI, PI),
            (-PI, PI),
            (0.0, 0.0),
            (PI, PI),
            (3.0 * PI, PI),
            (PI / 2.0, PI / 2.0),
        ];
        for (input, expected) in cases {
            assert!(
                (normalize_angle(input) - expected).abs() < 1e-9,
                "normalize_angle({input}) should be {expected}, got {}",
                normalize_angle(input)
            );
        }
        assert!((normalize_angle(2.0 * PI + 1e-10) - 1e-10).abs() < 1e-12);
    }

    #[test]
    fn test_identity() {
        let id = BlochSphereRotation::identity(QubitId(1));
        assert!(id.is_identity());
        assert!(!rx(0.1).is_identity());
    }

    #[test]
    fn test_compose_same_axis_adds_angles() {
        let combined = BlochSphereRotation::compose(&rx(PI / 4.0), &rx(PI / 4.0));
        assert!((combined.angle - PI / 2.0).abs() < 1e-9);
        assert_eq!(combined.axis, Axis::x());
    }

    #[test]
    fn test_compose_inverse_is_identity() {
        let combined = BlochSphereRotation::compose(&rx(1.23), &rx(-1.23));
        assert!(combined.is_identity());
    }

    #[test]
    fn test_compose_y90_then_x_is_hadamard_rotation() {
        let y90 = BlochSphereRotation::new(QubitId(0), Axis::y(), PI / 2.0, 0.0);
        let x = BlochSphereRotation::new(QubitId(0), Axis::x(), PI, PI / 2.0);
        let combined = BlochSphereRotation::compose(&y90, &x);
        let hadamard = BlochSphereRotation::new(
            QubitId(0),
            Axis::new(1.0, 0.0, 1.0).unwrap(),
            PI,
            PI / 2.0,
        );
        assert_eq!(combined, hadamard);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let samples = [
            BlochSphereRotation::new(QubitId(0), Axis::new(1.0, 2.0, -0.5).unwrap(), 1.1, 0.3),
            BlochSphereRotation::new(QubitId(0), Axis::z(), PI, PI / 2.0),
            BlochSphereRotation::new(QubitId(0), Axis::y(), -2.5, -1.0),
            BlochSphereRotation::identity(QubitId(0)),
        ];
        for rotation in samples {
            let matrix = rotation.to_matrix();
            assert!(matrix.is_unitary(ATOL), "{rotation:?} is not unitary");
            let recovered = BlochSphereRotation::from_matrix(QubitId(0), &matrix).unwrap();
            assert!(
                matrix.approx_eq(&recovered.to_matrix(), 1e-7),
                "roundtrip mismatch for {rotation:?}: got {recovered:?}"
            );
        }
    }

    #[test]
    fn test_from_matrix_rejects_non_unitary() {
        let bad = SquareMatrix::from_real(2, &[1.0, 0.0, 0.0, 2.0]).unwrap();
        assert!(BlochSphereRotation::from_matrix(QubitId(0), &bad).is_err());
    }

    #[test]
    fn test_equality_with_flipped_axis() {
        let a = BlochSphereRotation::new(QubitId(0), Axis::z(), 1.0, 0.0);
        let b = BlochSphereRotation::new(QubitId(0), Axis::z().flipped(), -1.0, 0.0);
        assert_eq!(a, b);
        let c = BlochSphereRotation::new(QubitId(0), Axis::z(), 1.0, 0.5);
        assert_ne!(a, c);
    }
}
