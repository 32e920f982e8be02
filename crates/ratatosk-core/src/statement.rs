//! Circuit statements.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::gate::Gate;
use crate::qubit::{BitId, QubitId};

/// Non-unitary instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NonUnitary {
    /// Initialize a qubit to |0⟩.
    Init(QubitId),
    /// Reset a qubit to |0⟩.
    Reset(QubitId),
    /// Measure a qubit into a bit.
    Measure {
        /// Measured qubit.
        qubit: QubitId,
        /// Bit receiving the outcome.
        bit: BitId,
    },
}

impl NonUnitary {
    /// The qubit this instruction touches.
    pub fn qubit(&self) -> QubitId {
        match self {
            NonUnitary::Init(q) | NonUnitary::Reset(q) => *q,
            NonUnitary::Measure { qubit, .. } => *qubit,
        }
    }
}

/// Timing and synchronization instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlInstruction {
    /// Synchronization fence on a qubit.
    Barrier(QubitId),
    /// Idle a qubit for a number of cycles.
    Wait {
        /// Idled qubit.
        qubit: QubitId,
        /// Cycle count.
        cycles: i64,
    },
}

impl ControlInstruction {
    /// The qubit this instruction touches.
    pub fn qubit(&self) -> QubitId {
        match self {
            ControlInstruction::Barrier(q) | ControlInstruction::Wait { qubit: q, .. } => *q,
        }
    }
}

/// An opaque backend-specific assembly block, passed through untouched
/// and filtered by backend name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsmDeclaration {
    /// Name of the backend the payload targets.
    pub backend_name: String,
    /// Raw payload.
    pub payload: String,
}

/// A single statement of the IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A unitary gate application.
    Gate(Gate),
    /// A non-unitary instruction.
    NonUnitary(NonUnitary),
    /// A control instruction.
    Control(ControlInstruction),
    /// An opaque assembly declaration.
    Asm(AsmDeclaration),
}

impl Statement {
    /// Wrap a gate.
    pub fn gate(gate: Gate) -> Self {
        Statement::Gate(gate)
    }

    /// `init` on a qubit.
    pub fn init(qubit: QubitId) -> Self {
        Statement::NonUnitary(NonUnitary::Init(qubit))
    }

    /// `reset` on a qubit.
    pub fn reset(qubit: QubitId) -> Self {
        Statement::NonUnitary(NonUnitary::Reset(qubit))
    }

    /// Measure a qubit into a bit.
    pub fn measure(qubit: QubitId, bit: BitId) -> Self {
        Statement::NonUnitary(NonUnitary::Measure { qubit, bit })
    }

    /// Barrier on a qubit.
    pub fn barrier(qubit: QubitId) -> Self {
        Statement::Control(ControlInstruction::Barrier(qubit))
    }

    /// Wait on a qubit.
    pub fn wait(qubit: QubitId, cycles: i64) -> Self {
        Statement::Control(ControlInstruction::Wait { qubit, cycles })
    }

    /// Asm declaration.
    pub fn asm(backend_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Statement::Asm(AsmDeclaration {
            backend_name: backend_name.into(),
            payload: payload.into(),
        })
    }

    /// Whether this is a gate statement.
    pub fn is_gate(&self) -> bool {
        matches!(self, Statement::Gate(_))
    }

    /// Whether this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self, Statement::Control(ControlInstruction::Barrier(_)))
    }

    /// Whether this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(
            self,
            Statement::NonUnitary(NonUnitary::Measure { .. })
        )
    }

    /// The gate, if this is a gate statement.
    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Statement::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// The qubits this statement touches (empty for asm declarations).
    pub fn qubit_operands(&self) -> Vec<QubitId> {
        match self {
            Statement::Gate(g) => g.qubit_operands(),
            Statement::NonUnitary(n) => vec![n.qubit()],
            Statement::Control(c) => vec![c.qubit()],
            Statement::Asm(_) => vec![],
        }
    }

    /// A display name for diagnostics; anonymous gates report
    /// `<anonymous>`.
    pub fn name(&self) -> &str {
        match self {
            Statement::Gate(g) => g.name().unwrap_or("<anonymous>"),
            Statement::NonUnitary(NonUnitary::Init(_)) => "init",
            Statement::NonUnitary(NonUnitary::Reset(_)) => "reset",
            Statement::NonUnitary(NonUnitary::Measure { .. }) => "measure",
            Statement::Control(ControlInstruction::Barrier(_)) => "barrier",
            Statement::Control(ControlInstruction::Wait { .. }) => "wait",
            Statement::Asm(_) => "asm",
        }
    }

    /// Validate operand ranges against the register sizes, plus the
    /// gate-level structural invariants.
    pub fn validate(&self, qubit_register_size: usize, bit_register_size: usize) -> CompileResult<()> {
        for qubit in self.qubit_operands() {
            if qubit.index() >= qubit_register_size {
                return Err(CompileError::invalid_gate(format!(
                    "qubit {qubit} is out of range for a register of size {qubit_register_size}"
                )));
            }
        }
        if let Statement::NonUnitary(NonUnitary::Measure { bit, .. }) = self {
            if bit.index() >= bit_register_size {
                return Err(CompileError::invalid_gate(format!(
                    "bit {bit} is out of range for a register of size {bit_register_size}"
                )));
            }
        }
        if let Statement::Gate(gate) = self {
            gate.validate()?;
        }
        Ok(())
    }

    /// A copy with every qubit operand rewritten through `f`.
    pub fn remapped(&self, f: &impl Fn(QubitId) -> QubitId) -> Statement {
        match self {
            Statement::Gate(g) => Statement::Gate(g.remapped(f)),
            Statement::NonUnitary(NonUnitary::Init(q)) => Statement::init(f(*q)),
            Statement::NonUnitary(NonUnitary::Reset(q)) => Statement::reset(f(*q)),
            Statement::NonUnitary(NonUnitary::Measure { qubit, bit }) => {
                Statement::measure(f(*qubit), *bit)
            }
            Statement::Control(ControlInstruction::Barrier(q)) => Statement::barrier(f(*q)),
            Statement::Control(ControlInstruction::Wait { qubit, cycles }) => {
                Statement::wait(f(*qubit), *cycles)
            }
            Statement::Asm(asm) => Statement::Asm(asm.clone()),
        }
    }
}
