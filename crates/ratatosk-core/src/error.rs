//! Error taxonomy of the compiler core.

use thiserror::Error;

/// Errors produced by the IR, the semantic algebra, and the passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A gate is malformed: non-unitary matrix, degenerate axis,
    /// operand out of range, or repeated operand.
    #[error("invalid gate: {detail}")]
    InvalidGate {
        /// Human-readable description of the violation.
        detail: String,
    },

    /// A replacement supplied to a decomposition or `replace` pass
    /// changes the unitary beyond a global phase.
    #[error("replacement for gate '{gate}' does not preserve the circuit semantics: {detail}")]
    ReplacementMismatch {
        /// Name of the gate being replaced (or `<anonymous>`).
        gate: String,
        /// Human-readable description of the mismatch.
        detail: String,
    },

    /// A router cannot connect two physical qubits.
    #[error("no routing path available between qubit {from} and qubit {to}")]
    NoRoutingPath {
        /// Physical source qubit.
        from: usize,
        /// Physical destination qubit.
        to: usize,
    },

    /// The interaction validator found two-qubit interactions that are
    /// not edges of the connectivity graph.
    #[error("the following qubit interactions prevent a 1-to-1 mapping: {pairs:?}")]
    UnroutableInteractions {
        /// Offending operand pairs, in order of first appearance.
        pairs: Vec<(usize, usize)>,
    },

    /// The primitive-gate validator found gates outside the primitive
    /// gate set (anonymous gates always fail this check).
    #[error("the following gates are not in the primitive gate set: {}", names.join(", "))]
    NonPrimitiveGates {
        /// Offending gate names, in order of first appearance.
        names: Vec<String>,
    },

    /// An exporter cannot represent a specific gate.
    #[error("unsupported gate: {detail}")]
    UnsupportedGate {
        /// Human-readable description of the gate.
        detail: String,
    },

    /// A parameter is outside its expected domain (non-finite angle,
    /// invalid mapping, register too large, ...).
    #[error("parameter out of domain: {detail}")]
    Domain {
        /// Human-readable description of the violation.
        detail: String,
    },
}

impl CompileError {
    /// Shorthand for an [`CompileError::InvalidGate`].
    pub fn invalid_gate(detail: impl Into<String>) -> Self {
        CompileError::InvalidGate {
            detail: detail.into(),
        }
    }

    /// Shorthand for a [`CompileError::Domain`].
    pub fn domain(detail: impl Into<String>) -> Self {
        CompileError::Domain {
            detail: detail.into(),
        }
    }

    /// Shorthand for an [`CompileError::UnsupportedGate`].
    pub fn unsupported(detail: impl Into<String>) -> Self {
        CompileError::UnsupportedGate {
            detail: detail.into(),
        }
    }
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
