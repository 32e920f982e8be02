//! Ratatosk Circuit Intermediate Representation
//!
//! This crate provides the core data structures of the Ratatosk compiler:
//! the circuit IR, the Bloch-sphere gate-semantic algebra that powers
//! equivalence checking, the named-gate catalog, and the seams
//! (pass traits) that the transformation passes plug into.
//!
//! # Overview
//!
//! A [`Circuit`] owns a qubit register, a bit register, and an ordered
//! statement list ([`Ir`]). Passes rewrite the statement list in place
//! while preserving the overall unitary up to a global phase. The
//! high-level [`CircuitBuilder`] API provides a convenient builder
//! pattern for constructing circuits; `Circuit`'s `Display` impl is the
//! cQASM 3 serialization.
//!
//! # Core Components
//!
//! - **Qubits and Bits**: [`QubitId`], [`BitId`] for addressing the
//!   virtual registers
//! - **Gate semantics**: [`BlochSphereRotation`], [`ControlledGate`],
//!   [`MatrixGate`] under the [`Gate`] union, with an optional catalog
//!   name tag
//! - **Statements**: [`Statement`] combining gates, non-unitary
//!   instructions, control instructions, and asm declarations
//! - **Catalog**: [`library`] with the named-gate constructors and the
//!   anonymous-rotation recognizer
//! - **Passes**: the [`pass`] traits implemented by `ratatosk-passes`
//!
//! # Example: Building a Bell pair
//!
//! ```rust
//! use ratatosk_core::{BitId, CircuitBuilder, QubitId};
//!
//! let mut builder = CircuitBuilder::new(2, 2);
//! builder
//!     .h(QubitId(0)).unwrap()
//!     .cnot(QubitId(0), QubitId(1)).unwrap()
//!     .measure(QubitId(0), BitId(0)).unwrap()
//!     .measure(QubitId(1), BitId(1)).unwrap();
//! let circuit = builder.to_circuit();
//!
//! assert_eq!(circuit.qubit_register_size(), 2);
//! assert!(circuit.to_string().contains("CNOT q[0], q[1]"));
//! ```

pub mod axis;
pub mod bsr;
pub mod builder;
pub mod circuit;
pub mod error;
pub mod expander;
pub mod gate;
pub mod ir;
pub mod library;
pub mod matrix;
pub mod pass;
pub mod qubit;
pub mod statement;
pub mod writer;

/// Absolute tolerance for all floating-point comparisons in the
/// compiler. Values closer than this are treated as equal; axis
/// directions and angles within this tolerance of zero are treated as
/// structurally zero.
pub const ATOL: f64 = 1e-8;

pub use axis::Axis;
pub use bsr::{normalize_angle, BlochSphereRotation};
pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use error::{CompileError, CompileResult};
pub use gate::{ControlledGate, Gate, GateKind, MatrixGate, Param};
pub use ir::Ir;
pub use matrix::SquareMatrix;
pub use pass::{Decomposer, Exporter, Mapper, Mapping, Merger, Router, Validator};
pub use qubit::{BitId, QubitId};
pub use statement::{AsmDeclaration, ControlInstruction, NonUnitary, Statement};
