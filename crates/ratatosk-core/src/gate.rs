//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bsr::BlochSphereRotation;
use crate::error::{CompileError, CompileResult};
use crate::matrix::SquareMatrix;
use crate::qubit::QubitId;
use crate::writer::format_float;
use crate::ATOL;

/// A gate parameter, carried for serialization and catalog identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Param {
    /// Integer parameter (e.g. the `k` of `CRk`).
    Int(i64),
    /// Float parameter (e.g. a rotation angle in radians).
    Float(f64),
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Param::Int(a), Param::Int(b)) => a == b,
            (Param::Float(a), Param::Float(b)) => (a - b).abs() <= ATOL,
            _ => false,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Int(v) => write!(f, "{v}"),
            Param::Float(v) => write!(f, "{}", format_float(*v)),
        }
    }
}

/// Controlled version of a target gate: the target unitary is applied
/// when the control qubit is |1⟩.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledGate {
    /// The control qubit.
    pub control: QubitId,
    /// The gate applied when the control is set.
    pub target: Box<Gate>,
}

/// A gate defined by an explicit `2^k × 2^k` unitary.
///
/// Matrix convention: the first operand is the most significant bit of
/// the gate-local index (qubit 0 of the register is the least
/// significant bit of the global ket).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixGate {
    /// Row-major unitary matrix.
    pub matrix: SquareMatrix,
    /// Qubit operands, `k` of them.
    pub operands: Vec<QubitId>,
}

impl MatrixGate {
    /// Create a matrix gate, checking the shape and unitarity.
    ///
    /// Single-qubit matrices should be converted to rotations with
    /// [`BlochSphereRotation::from_matrix`] instead.
    pub fn new(matrix: SquareMatrix, operands: Vec<QubitId>) -> CompileResult<Self> {
        if operands.len() < 2 {
            return Err(CompileError::invalid_gate(
                "matrix gates take at least two operands; use a Bloch-sphere rotation for one",
            ));
        }
        let expected = 1usize << operands.len();
        if matrix.dim() != expected {
            return Err(CompileError::invalid_gate(format!(
                "matrix dimension {} does not match {} operands",
                matrix.dim(),
                operands.len(),
            )));
        }
        if !matrix.is_unitary(ATOL) {
            return Err(CompileError::invalid_gate("matrix is not unitary"));
        }
        Ok(Self { matrix, operands })
    }
}

impl PartialEq for MatrixGate {
    fn eq(&self, other: &Self) -> bool {
        self.operands == other.operands && self.matrix.approx_eq(&other.matrix, ATOL)
    }
}

/// The semantic body of a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A single-qubit Bloch-sphere rotation.
    Rotation(BlochSphereRotation),
    /// A controlled gate.
    Controlled(ControlledGate),
    /// An explicit-matrix gate.
    Matrix(MatrixGate),
}

/// A unitary gate: a semantic body plus an optional catalog identity.
///
/// A gate without a name is *anonymous*; the writer falls back to a
/// semantic form for it and the primitive-gate validator rejects it.
/// Equality compares the semantics only, so two gates with different
/// names (or one unnamed) still compare equal when they denote the same
/// unitary in the same parameterization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    /// The semantic body.
    pub kind: GateKind,
    /// Catalog name (`H`, `CNOT`, ...), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Catalog parameters, if any.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub params: Vec<Param>,
}

impl PartialEq for Gate {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Gate {
    /// Create an anonymous gate.
    pub fn anonymous(kind: GateKind) -> Self {
        Self {
            kind,
            name: None,
            params: vec![],
        }
    }

    /// Create a named catalog gate.
    pub fn named(kind: GateKind, name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            params,
        }
    }

    /// The catalog name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this gate carries no catalog identity.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// The qubit operands, in order (control first for controlled
    /// gates).
    pub fn qubit_operands(&self) -> Vec<QubitId> {
        match &self.kind {
            GateKind::Rotation(r) => vec![r.qubit],
            GateKind::Controlled(c) => {
                let mut operands = vec![c.control];
                operands.extend(c.target.qubit_operands());
                operands
            }
            GateKind::Matrix(m) => m.operands.clone(),
        }
    }

    /// Whether the gate acts as the identity.
    pub fn is_identity(&self) -> bool {
        match &self.kind {
            GateKind::Rotation(r) => r.is_identity(),
            GateKind::Controlled(c) => c.target.is_identity(),
            GateKind::Matrix(m) => m
                .matrix
                .approx_eq(&SquareMatrix::identity(m.matrix.dim()), ATOL),
        }
    }

    /// The rotation body, if this is a single-qubit rotation.
    pub fn as_rotation(&self) -> Option<&BlochSphereRotation> {
        match &self.kind {
            GateKind::Rotation(r) => Some(r),
            _ => None,
        }
    }

    /// The controlled body, if this is a controlled gate.
    pub fn as_controlled(&self) -> Option<&ControlledGate> {
        match &self.kind {
            GateKind::Controlled(c) => Some(c),
            _ => None,
        }
    }

    /// The matrix body, if this is an explicit-matrix gate.
    pub fn as_matrix(&self) -> Option<&MatrixGate> {
        match &self.kind {
            GateKind::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Structural validation: distinct operands, finite rotation
    /// parameters, control disjoint from the target's operands, and a
    /// well-shaped unitary matrix.
    pub fn validate(&self) -> CompileResult<()> {
        let operands = self.qubit_operands();
        for (i, a) in operands.iter().enumerate() {
            if operands[i + 1..].contains(a) {
                return Err(CompileError::invalid_gate(format!(
                    "repeated operand {a} in multi-qubit gate"
                )));
            }
        }
        match &self.kind {
            GateKind::Rotation(r) => {
                if !r.angle.is_finite() || !r.phase.is_finite() {
                    return Err(CompileError::domain(
                        "rotation angle and phase must be finite",
                    ));
                }
                Ok(())
            }
            GateKind::Controlled(c) => {
                if c.target.qubit_operands().contains(&c.control) {
                    return Err(CompileError::invalid_gate(format!(
                        "control {} overlaps the target gate operands",
                        c.control
                    )));
                }
                c.target.validate()
            }
            GateKind::Matrix(m) => {
                let expected = 1usize << m.operands.len();
                if m.operands.len() < 2 || m.matrix.dim() != expected {
                    return Err(CompileError::invalid_gate(
                        "matrix dimension does not match the operand count",
                    ));
                }
                if !m.matrix.is_unitary(ATOL) {
                    return Err(CompileError::invalid_gate("matrix is not unitary"));
                }
                Ok(())
            }
        }
    }

    /// A copy of this gate with every qubit operand rewritten through
    /// `f`. Name and parameters are preserved.
    pub fn remapped(&self, f: &impl Fn(QubitId) -> QubitId) -> Gate {
        let kind = match &self.kind {
            GateKind::Rotation(r) => GateKind::Rotation(BlochSphereRotation {
                qubit: f(r.qubit),
                ..r.clone()
            }),
            GateKind::Controlled(c) => GateKind::Controlled(ControlledGate {
                control: f(c.control),
                target: Box::new(c.target.remapped(f)),
            }),
            GateKind::Matrix(m) => GateKind::Matrix(MatrixGate {
                matrix: m.matrix.clone(),
                operands: m.operands.iter().map(|&q| f(q)).collect(),
            }),
        };
        Gate {
            kind,
            name: self.name.clone(),
            params: self.params.clone(),
        }
    }
}
