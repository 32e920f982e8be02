//! Dense complex matrices for gate semantics.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// A square complex matrix in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl SquareMatrix {
    /// Create a matrix from row-major data.
    pub fn new(dim: usize, data: Vec<Complex64>) -> CompileResult<Self> {
        if data.len() != dim * dim {
            return Err(CompileError::invalid_gate(format!(
                "matrix data length {} does not match dimension {dim}x{dim}",
                data.len(),
            )));
        }
        Ok(Self { dim, data })
    }

    /// Build a matrix from real entries.
    pub fn from_real(dim: usize, entries: &[f64]) -> CompileResult<Self> {
        Self::new(
            dim,
            entries.iter().map(|&v| Complex64::new(v, 0.0)).collect(),
        )
    }

    /// Internal constructor for matrices whose shape is known to be
    /// correct by construction.
    pub(crate) fn from_vec(dim: usize, data: Vec<Complex64>) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { dim, data }
    }

    /// The identity matrix of the given dimension.
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.set(i, i, Complex64::new(1.0, 0.0));
        }
        m
    }

    /// The zero matrix of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![Complex64::new(0.0, 0.0); dim * dim],
        }
    }

    /// The dimension of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Set the entry at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.dim + col] = value;
    }

    /// Matrix product `self * rhs`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn mul(&self, rhs: &SquareMatrix) -> SquareMatrix {
        assert_eq!(self.dim, rhs.dim, "matrix dimensions must match");
        let n = self.dim;
        let mut out = SquareMatrix::zeros(n);
        for row in 0..n {
            for col in 0..n {
                let mut acc = Complex64::new(0.0, 0.0);
                for k in 0..n {
                    acc += self.get(row, k) * rhs.get(k, col);
                }
                out.set(row, col, acc);
            }
        }
        out
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> SquareMatrix {
        let n = self.dim;
        let mut out = SquareMatrix::zeros(n);
        for row in 0..n {
            for col in 0..n {
                out.set(row, col, self.get(col, row).conj());
            }
        }
        out
    }

    /// Scale every entry by `factor`.
    pub fn scaled(&self, factor: Complex64) -> SquareMatrix {
        SquareMatrix {
            dim: self.dim,
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }

    /// Entry-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &SquareMatrix, tol: f64) -> bool {
        self.dim == other.dim
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Check unitarity: `self * self.dagger() == I` within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.mul(&self.dagger())
            .approx_eq(&SquareMatrix::identity(self.dim), tol)
    }

    /// Check whether `self == c * other` for some complex `c` with
    /// `|c| = 1`, within `tol`.
    ///
    /// The phase candidate is derived from the largest-magnitude entry
    /// of `self`.
    pub fn equal_up_to_global_phase(&self, other: &SquareMatrix, tol: f64) -> bool {
        if self.dim != other.dim {
            return false;
        }
        let Some((pos, pivot)) = self
            .data
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        else {
            return other.data.is_empty();
        };
        if pivot.norm() <= tol {
            // Zero matrix; only equal to another (near-)zero matrix.
            return other.data.iter().all(|v| v.norm() <= tol);
        }
        let reference = other.data[pos];
        if reference.norm() <= tol {
            return false;
        }
        let phase = pivot / reference;
        if (phase.norm() - 1.0).abs() > tol {
            return false;
        }
        self.approx_eq(&other.scaled(phase), tol)
    }
}

impl std::ops::Mul for &SquareMatrix {
    type Output = SquareMatrix;

    fn mul(self, rhs: &SquareMatrix) -> SquareMatrix {
        SquareMatrix::mul(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ATOL;

    fn x_matrix() -> SquareMatrix {
        SquareMatrix::from_real(2, &[0.0, 1.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_length_check() {
        assert!(SquareMatrix::new(2, vec![Complex64::new(1.0, 0.0); 3]).is_err());
    }

    #[test]
    fn test_mul_identity() {
        let x = x_matrix();
        let id = SquareMatrix::identity(2);
        assert!(x.mul(&id).approx_eq(&x, ATOL));
        assert!(x.mul(&x).approx_eq(&id, ATOL));
    }

    #[test]
    fn test_unitarity() {
        assert!(x_matrix().is_unitary(ATOL));
        let not_unitary = SquareMatrix::from_real(2, &[1.0, 0.0, 0.0, 2.0]).unwrap();
        assert!(!not_unitary.is_unitary(ATOL));
    }

    #[test]
    fn test_equal_up_to_global_phase() {
        let x = x_matrix();
        let ix = x.scaled(Complex64::new(0.0, 1.0));
        assert!(x.equal_up_to_global_phase(&ix, ATOL));
        assert!(!x.equal_up_to_global_phase(&SquareMatrix::identity(2), ATOL));

        // A scaling with |c| != 1 is not a global phase.
        let half = x.scaled(Complex64::new(0.5, 0.0));
        assert!(!x.equal_up_to_global_phase(&half, ATOL));
    }
}
