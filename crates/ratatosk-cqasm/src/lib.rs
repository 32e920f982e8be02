//! cQASM 3 front end for the Ratatosk compiler.
//!
//! The pipeline is lexer → parser → reader: [`lexer`] produces tokens,
//! [`parser`] builds the [`ast::Program`], and [`reader`] lowers the
//! AST into a [`ratatosk_core::Circuit`]. Lowering concatenates
//! registers in declaration order, expands SGMQ operand notation,
//! folds constant expressions, normalizes angles, and applies the
//! `inv`/`pow` gate modifiers.
//!
//! The [`Cqasm1Exporter`] lowers a circuit to the legacy cQASM 1
//! dialect.
//!
//! # Example
//!
//! ```rust
//! let circuit = ratatosk_cqasm::parse(
//!     "version 3.0\n\nqubit[2] q\nbit[2] b\n\nH q[0]\nCNOT q[0], q[1]\nb = measure q\n",
//! )
//! .unwrap();
//! assert_eq!(circuit.qubit_register_size(), 2);
//! assert_eq!(circuit.ir().len(), 4);
//! ```

pub mod ast;
pub mod cqasm1;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod reader;

pub use cqasm1::Cqasm1Exporter;
pub use error::{ParseError, ParseResult};
pub use reader::parse;
