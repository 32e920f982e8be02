//! A-B-A Euler decompositions of single-qubit rotations.

use ratatosk_core::{library, Axis, CompileError, CompileResult, Decomposer, Gate, QubitId, ATOL};

use super::filter_out_identities;

/// One of the three Pauli rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    fn index(self) -> usize {
        match self {
            RotationAxis::X => 0,
            RotationAxis::Y => 1,
            RotationAxis::Z => 2,
        }
    }

    fn gate(self, qubit: QubitId, theta: f64) -> Gate {
        match self {
            RotationAxis::X => library::rx(qubit, theta),
            RotationAxis::Y => library::ry(qubit, theta),
            RotationAxis::Z => library::rz(qubit, theta),
        }
    }
}

/// Check if axis `a` immediately precedes axis `b` in the cyclic order
/// x → y → z → x.
fn are_axes_consecutive(a: usize, b: usize) -> bool {
    let diff = a as i64 - b as i64;
    diff == -1 || diff == 2
}

fn acos_clamped(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).acos()
}

/// Decomposes a single-qubit rotation into `Ra(θ₁)·Rb(θ₂)·Ra(θ₃)` for
/// a pair of orthogonal Pauli axes A and B. The six variants cover
/// every A-B-A combination; identity factors are omitted from the
/// output, and the input's global phase is not reproduced (the result
/// matches up to a global phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbaDecomposer {
    a: RotationAxis,
    b: RotationAxis,
}

impl AbaDecomposer {
    /// X-Y-X decomposition.
    pub fn xyx() -> Self {
        Self { a: RotationAxis::X, b: RotationAxis::Y }
    }

    /// X-Z-X decomposition.
    pub fn xzx() -> Self {
        Self { a: RotationAxis::X, b: RotationAxis::Z }
    }

    /// Y-X-Y decomposition.
    pub fn yxy() -> Self {
        Self { a: RotationAxis::Y, b: RotationAxis::X }
    }

    /// Y-Z-Y decomposition.
    pub fn yzy() -> Self {
        Self { a: RotationAxis::Y, b: RotationAxis::Z }
    }

    /// Z-X-Z decomposition.
    pub fn zxz() -> Self {
        Self { a: RotationAxis::Z, b: RotationAxis::X }
    }

    /// Z-Y-Z decomposition.
    pub fn zyz() -> Self {
        Self { a: RotationAxis::Z, b: RotationAxis::Y }
    }

    /// Solve for the three rotation angles `(θ₁, θ₂, θ₃)` such that
    /// the rotation `(axis, alpha)` equals `Ra(θ₃)·Rb(θ₂)·Ra(θ₁)` as a
    /// matrix product (θ₁ applied first).
    pub fn decomposition_angles(&self, axis: &Axis, alpha: f64) -> CompileResult<(f64, f64, f64)> {
        use std::f64::consts::PI;

        if !(-PI + ATOL < alpha && alpha <= PI + ATOL) {
            return Err(CompileError::domain(
                "rotation angle must be normalized into (-π, π]",
            ));
        }

        let index_a = self.a.index();
        let index_b = self.b.index();
        let index_c = 3 - index_a - index_b;
        let a_value = axis[index_a];
        let b_value = axis[index_b];
        let c_value = axis[index_c];

        let half = alpha / 2.0;
        let p = 2.0 * (a_value * half.sin()).atan2(half.cos());

        let mut theta_2 =
            2.0 * acos_clamped(half.cos() * (1.0 + (a_value * half.tan()).powi(2)).sqrt());
        theta_2 = theta_2.copysign(alpha);

        let mut m = if (theta_2 / 2.0).sin().abs() < ATOL {
            // The rotation lies in the A axis; m = p keeps θ₃ at zero,
            // which is better for gate count.
            p
        } else {
            let mut m = 2.0 * acos_clamped(b_value * half.sin() / (theta_2 / 2.0).sin());
            if PI - m.abs() > ATOL {
                let sign_reference = 2.0 * c_value.atan2(a_value);
                m = m.copysign(sign_reference);
            }
            m
        };

        if are_axes_consecutive(index_a, index_b) {
            m = -m;
        }

        let mut theta_1 = (p + m) / 2.0;
        let mut theta_3 = p - theta_1;

        if is_negative_octant(b_value, c_value) {
            std::mem::swap(&mut theta_1, &mut theta_3);
        }

        Ok((theta_1, theta_2, theta_3))
    }
}

/// Whether the B and C axis components fall in one of the two negative
/// octants (both negative or zero, but not both zero).
fn is_negative_octant(b_value: f64, c_value: f64) -> bool {
    (b_value < 0.0 || b_value.abs() < ATOL)
        && (c_value < 0.0 || c_value.abs() < ATOL)
        && !(b_value.abs() < ATOL && c_value.abs() < ATOL)
}

impl Decomposer for AbaDecomposer {
    fn name(&self) -> &str {
        match (self.a, self.b) {
            (RotationAxis::X, RotationAxis::Y) => "xyx_decomposer",
            (RotationAxis::X, RotationAxis::Z) => "xzx_decomposer",
            (RotationAxis::Y, RotationAxis::X) => "yxy_decomposer",
            (RotationAxis::Y, RotationAxis::Z) => "yzy_decomposer",
            (RotationAxis::Z, RotationAxis::X) => "zxz_decomposer",
            _ => "zyz_decomposer",
        }
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        let Some(rotation) = gate.as_rotation() else {
            return Ok(vec![gate.clone()]);
        };
        let (theta_1, theta_2, theta_3) =
            self.decomposition_angles(&rotation.axis, rotation.angle)?;
        Ok(filter_out_identities(vec![
            self.a.gate(rotation.qubit, theta_1),
            self.b.gate(rotation.qubit, theta_2),
            self.a.gate(rotation.qubit, theta_3),
        ]))
    }
}
