//! Fluent circuit builder.

use crate::circuit::Circuit;
use crate::error::CompileResult;
use crate::ir::Ir;
use crate::library;
use crate::qubit::{BitId, QubitId};
use crate::statement::Statement;

/// Builder-pattern construction of circuits, with one method per
/// catalog gate and non-unitary instruction. Operand ranges are
/// checked on every call.
///
/// ```rust
/// use ratatosk_core::{CircuitBuilder, QubitId};
///
/// let mut builder = CircuitBuilder::new(3, 0);
/// builder
///     .h(QubitId(0)).unwrap()
///     .cnot(QubitId(0), QubitId(1)).unwrap()
///     .cnot(QubitId(0), QubitId(2)).unwrap();
/// let circuit = builder.to_circuit();
/// assert_eq!(circuit.ir().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    qubit_register_size: usize,
    bit_register_size: usize,
    ir: Ir,
}

impl CircuitBuilder {
    /// A builder over the given register sizes.
    pub fn new(qubit_register_size: usize, bit_register_size: usize) -> Self {
        Self {
            qubit_register_size,
            bit_register_size,
            ir: Ir::new(),
        }
    }

    /// Validate and append a statement.
    pub fn push_statement(&mut self, statement: Statement) -> CompileResult<&mut Self> {
        statement.validate(self.qubit_register_size, self.bit_register_size)?;
        self.ir.add_statement(statement);
        Ok(self)
    }

    /// Apply the identity gate.
    pub fn i(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::i(qubit)))
    }

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::h(qubit)))
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::x(qubit)))
    }

    /// Apply a +90° X rotation.
    pub fn x90(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::x90(qubit)))
    }

    /// Apply a −90° X rotation.
    pub fn mx90(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::mx90(qubit)))
    }

    /// Apply a Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::y(qubit)))
    }

    /// Apply a +90° Y rotation.
    pub fn y90(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::y90(qubit)))
    }

    /// Apply a −90° Y rotation.
    pub fn my90(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::my90(qubit)))
    }

    /// Apply a Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::z(qubit)))
    }

    /// Apply an S gate.
    pub fn s(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::s(qubit)))
    }

    /// Apply an S† gate.
    pub fn sdag(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::sdag(qubit)))
    }

    /// Apply a T gate.
    pub fn t(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::t(qubit)))
    }

    /// Apply a T† gate.
    pub fn tdag(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::tdag(qubit)))
    }

    /// Apply an X rotation by `theta`.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::rx(qubit, theta)))
    }

    /// Apply a Y rotation by `theta`.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::ry(qubit, theta)))
    }

    /// Apply a Z rotation by `theta`.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::rz(qubit, theta)))
    }

    /// Apply a rotation about an arbitrary axis.
    #[allow(clippy::many_single_char_names)]
    pub fn rn(
        &mut self,
        nx: f64,
        ny: f64,
        nz: f64,
        theta: f64,
        phi: f64,
        qubit: QubitId,
    ) -> CompileResult<&mut Self> {
        let gate = library::rn(qubit, nx, ny, nz, theta, phi)?;
        self.push_statement(Statement::gate(gate))
    }

    /// Apply a CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::cnot(control, target)))
    }

    /// Apply a CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::cz(control, target)))
    }

    /// Apply a controlled phase rotation.
    pub fn cr(
        &mut self,
        theta: f64,
        control: QubitId,
        target: QubitId,
    ) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::cr(control, target, theta)))
    }

    /// Apply a controlled phase rotation by `2π / 2^k`.
    pub fn crk(&mut self, k: i64, control: QubitId, target: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::crk(control, target, k)))
    }

    /// Apply a SWAP gate.
    pub fn swap(&mut self, q0: QubitId, q1: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::gate(library::swap(q0, q1)))
    }

    /// Initialize a qubit to |0⟩.
    pub fn init(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::init(qubit))
    }

    /// Initialize every qubit to |0⟩.
    pub fn init_all(&mut self) -> CompileResult<&mut Self> {
        for index in 0..self.qubit_register_size {
            self.push_statement(Statement::init(QubitId::from(index)))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::reset(qubit))
    }

    /// Measure a qubit into a bit.
    pub fn measure(&mut self, qubit: QubitId, bit: BitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::measure(qubit, bit))
    }

    /// Barrier on one qubit.
    pub fn barrier(&mut self, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::barrier(qubit))
    }

    /// Barrier on every qubit.
    pub fn barrier_all(&mut self) -> CompileResult<&mut Self> {
        for index in 0..self.qubit_register_size {
            self.push_statement(Statement::barrier(QubitId::from(index)))?;
        }
        Ok(self)
    }

    /// Idle a qubit for `cycles` cycles.
    pub fn wait(&mut self, cycles: i64, qubit: QubitId) -> CompileResult<&mut Self> {
        self.push_statement(Statement::wait(qubit, cycles))
    }

    /// Append an opaque asm declaration.
    pub fn asm(
        &mut self,
        backend_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> CompileResult<&mut Self> {
        self.push_statement(Statement::asm(backend_name, payload))
    }

    /// Finalize the circuit. Statements were validated on insertion.
    pub fn to_circuit(self) -> Circuit {
        Circuit::from_validated_parts(self.qubit_register_size, self.bit_register_size, self.ir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use std::f64::consts::PI;

    #[test]
    fn test_fluent_chaining() {
        let mut builder = CircuitBuilder::new(2, 2);
        builder
            .h(QubitId(0))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), BitId(0))
            .unwrap()
            .measure(QubitId(1), BitId(1))
            .unwrap();
        let circuit = builder.to_circuit();
        assert_eq!(circuit.ir().len(), 4);
        assert_eq!(circuit.qubit_register_size(), 2);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut builder = CircuitBuilder::new(1, 0);
        assert!(matches!(
            builder.x(QubitId(1)),
            Err(CompileError::InvalidGate { .. })
        ));
        assert!(builder.measure(QubitId(0), BitId(0)).is_err());
    }

    #[test]
    fn test_rotation_parameters() {
        let mut builder = CircuitBuilder::new(1, 0);
        builder.rx(PI / 3.0, QubitId(0)).unwrap();
        let circuit = builder.to_circuit();
        let gate = circuit.ir().gates().next().unwrap();
        assert_eq!(gate.name(), Some("Rx"));
    }

    #[test]
    fn test_barrier_all() {
        let mut builder = CircuitBuilder::new(3, 0);
        builder.barrier_all().unwrap();
        assert_eq!(builder.to_circuit().ir().len(), 3);
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let mut builder = CircuitBuilder::new(1, 0);
        assert!(matches!(
            builder.rx(f64::NAN, QubitId(0)),
            Err(CompileError::Domain { .. })
        ));
    }
}
