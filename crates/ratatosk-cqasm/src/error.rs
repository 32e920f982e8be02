//! Front-end error types.

use ratatosk_core::CompileError;
use thiserror::Error;

/// Errors raised while lexing, parsing, or lowering cQASM 3.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The lexer hit an invalid token.
    #[error("invalid token at byte {position}: {message}")]
    Lexer {
        /// Byte offset of the offending input.
        position: usize,
        /// Description of the offending input.
        message: String,
    },

    /// Input ended where more was expected.
    #[error("unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// The parser found a token it did not expect.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// What it found instead.
        found: String,
    },

    /// The version header names an unsupported language version.
    #[error("unsupported language version '{0}'")]
    UnsupportedVersion(String),

    /// An instruction name is not in the gate catalog.
    #[error("unknown instruction '{0}'")]
    UnknownInstruction(String),

    /// An instruction was called with the wrong parameters or operands.
    #[error("malformed instruction '{name}': {detail}")]
    MalformedInstruction {
        /// Instruction name.
        name: String,
        /// Description of the problem.
        detail: String,
    },

    /// A register is referenced before (or without) declaration.
    #[error("register '{0}' is not declared")]
    UndeclaredRegister(String),

    /// A register is declared twice.
    #[error("register '{0}' is declared twice")]
    DuplicateRegister(String),

    /// An index does not fit its register.
    #[error("index {index} is out of range for register '{register}'")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Offending index.
        index: usize,
    },

    /// A constant expression could not be evaluated.
    #[error("cannot evaluate expression: {0}")]
    Expression(String),

    /// A gate modifier cannot be applied.
    #[error("invalid gate modifier: {0}")]
    InvalidModifier(String),

    /// A semantic error surfaced while building the circuit.
    #[error(transparent)]
    Semantics(#[from] CompileError),
}

/// Result type for front-end operations.
pub type ParseResult<T> = Result<T, ParseError>;
