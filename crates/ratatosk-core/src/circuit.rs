//! The circuit façade.

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::expander::reindexed_circuit_matrix;
use crate::gate::Gate;
use crate::ir::Ir;
use crate::pass::{Decomposer, Exporter, Mapper, Mapping, Merger, Router, Validator};
use crate::statement::{NonUnitary, Statement};
use crate::writer;

/// A quantum circuit: virtual qubit and bit registers plus the ordered
/// statement list, with an optional virtual→physical mapping side
/// table installed by the mapping and routing passes.
///
/// Every pass method either completes fully or returns an error with
/// the circuit untouched, and returns `&mut Self` for chaining.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    qubit_register_size: usize,
    bit_register_size: usize,
    ir: Ir,
    mapping: Option<Mapping>,
}

impl Circuit {
    /// An empty circuit over the given registers.
    pub fn new(qubit_register_size: usize, bit_register_size: usize) -> Self {
        Self {
            qubit_register_size,
            bit_register_size,
            ir: Ir::new(),
            mapping: None,
        }
    }

    /// Build a circuit from registers and an IR, validating every
    /// statement.
    pub fn from_parts(
        qubit_register_size: usize,
        bit_register_size: usize,
        ir: Ir,
    ) -> CompileResult<Self> {
        for statement in ir.iter() {
            statement.validate(qubit_register_size, bit_register_size)?;
        }
        Ok(Self {
            qubit_register_size,
            bit_register_size,
            ir,
            mapping: None,
        })
    }

    /// Construct a circuit from statements that were already validated
    /// against the register sizes.
    pub(crate) fn from_validated_parts(
        qubit_register_size: usize,
        bit_register_size: usize,
        ir: Ir,
    ) -> Self {
        Self {
            qubit_register_size,
            bit_register_size,
            ir,
            mapping: None,
        }
    }

    /// Size of the virtual qubit register.
    pub fn qubit_register_size(&self) -> usize {
        self.qubit_register_size
    }

    /// Size of the virtual bit register.
    pub fn bit_register_size(&self) -> usize {
        self.bit_register_size
    }

    /// The statement list.
    pub fn ir(&self) -> &Ir {
        &self.ir
    }

    /// Mutable access to the statement list.
    pub fn ir_mut(&mut self) -> &mut Ir {
        &mut self.ir
    }

    /// The installed virtual→physical mapping, if any.
    pub fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    /// Count statements by name. Asm declarations are excluded;
    /// anonymous gates count under `<anonymous>`.
    pub fn instruction_count(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for statement in self.ir.iter() {
            if matches!(statement, Statement::Asm(_)) {
                continue;
            }
            *counts.entry(statement.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// For each measured qubit, the ordered list of bit indices that
    /// received its successive measurement outcomes.
    pub fn measurement_to_bit_map(&self) -> FxHashMap<usize, Vec<usize>> {
        let mut map: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for statement in self.ir.iter() {
            if let Statement::NonUnitary(NonUnitary::Measure { qubit, bit }) = statement {
                map.entry(qubit.index()).or_default().push(bit.index());
            }
        }
        map
    }

    /// Drop every asm declaration whose backend name does not contain
    /// `backend_name`.
    pub fn asm_filter(&mut self, backend_name: &str) {
        self.ir.statements.retain(|statement| match statement {
            Statement::Asm(asm) => asm.backend_name.contains(backend_name),
            _ => true,
        });
    }

    /// Run a merger pass.
    pub fn merge(&mut self, merger: &impl Merger) -> CompileResult<&mut Self> {
        debug!(pass = merger.name(), "running merger");
        merger.merge(&mut self.ir, self.qubit_register_size)?;
        Ok(self)
    }

    /// Run a decomposer over every gate statement. Each replacement is
    /// checked for up-to-global-phase equivalence with the original
    /// gate; the statement list is only swapped when the whole pass
    /// succeeds.
    pub fn decompose(&mut self, decomposer: &impl Decomposer) -> CompileResult<&mut Self> {
        debug!(pass = decomposer.name(), "running decomposer");
        self.ir = run_decomposer(&self.ir, decomposer)?;
        Ok(self)
    }

    /// Replace every gate whose catalog name is `gate_name` with the
    /// gates produced by `builder_fn`, checking equivalence.
    pub fn replace<F>(&mut self, gate_name: &str, builder_fn: F) -> CompileResult<&mut Self>
    where
        F: Fn(&Gate) -> Vec<Gate>,
    {
        let replacer = NamedReplacer {
            target: gate_name,
            builder_fn,
        };
        self.ir = run_decomposer(&self.ir, &replacer)?;
        Ok(self)
    }

    /// Install an initial virtual→physical mapping.
    pub fn map(&mut self, mapper: &impl Mapper) -> CompileResult<&mut Self> {
        debug!(pass = mapper.name(), "running mapper");
        let mapping = mapper.map(self.qubit_register_size)?;
        if mapping.len() != self.qubit_register_size {
            return Err(CompileError::domain(format!(
                "mapper produced {} entries for a register of {} qubits",
                mapping.len(),
                self.qubit_register_size,
            )));
        }
        self.mapping = Some(mapping);
        Ok(self)
    }

    /// Route the circuit: insert SWAPs so every two-qubit gate acts on
    /// connected physical qubits, rewriting all statements into
    /// physical indices. The installed mapping (identity when absent)
    /// is the initial state; the live mapping after routing is stored
    /// back on the circuit.
    pub fn route(&mut self, router: &impl Router) -> CompileResult<&mut Self> {
        debug!(pass = router.name(), "running router");
        let mut mapping = self
            .mapping
            .clone()
            .unwrap_or_else(|| Mapping::identity(self.qubit_register_size));
        let mut ir = self.ir.clone();
        router.route(&mut ir, &mut mapping)?;

        let referenced = ir
            .iter()
            .flat_map(Statement::qubit_operands)
            .map(|q| q.index() + 1)
            .max()
            .unwrap_or(0);
        self.qubit_register_size = self.qubit_register_size.max(referenced);
        self.ir = ir;
        self.mapping = Some(mapping);
        Ok(self)
    }

    /// Run a validator pass.
    pub fn validate(&self, validator: &impl Validator) -> CompileResult<()> {
        debug!(pass = validator.name(), "running validator");
        validator.validate(&self.ir)
    }

    /// Run an exporter.
    pub fn export<E: Exporter>(&self, exporter: &E) -> CompileResult<E::Output> {
        debug!(pass = exporter.name(), "running exporter");
        exporter.export(self)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&writer::circuit_to_string(self))
    }
}

fn run_decomposer(ir: &Ir, decomposer: &impl Decomposer) -> CompileResult<Ir> {
    let mut out = Ir::new();
    for statement in ir.iter() {
        match statement {
            Statement::Gate(gate) => {
                let replacement = decomposer.decompose(gate)?;
                check_gate_replacement(gate, &replacement)?;
                for gate in replacement {
                    gate.validate()?;
                    out.add_gate(gate);
                }
            }
            other => out.add_statement(other.clone()),
        }
    }
    Ok(out)
}

/// Verify that `replacement` equals `gate` up to a global phase over
/// the gate's operands. Replacements may drop identity factors, so
/// their operand set must be a subset of the original's.
fn check_gate_replacement(gate: &Gate, replacement: &[Gate]) -> CompileResult<()> {
    let display_name = gate.name().unwrap_or("<anonymous>").to_string();
    let operands = gate.qubit_operands();
    for replacement_gate in replacement {
        for qubit in replacement_gate.qubit_operands() {
            if !operands.contains(&qubit) {
                return Err(CompileError::ReplacementMismatch {
                    gate: display_name.clone(),
                    detail: format!(
                        "replacement touches qubit {qubit} outside the original operands"
                    ),
                });
            }
        }
    }

    let original = reindexed_circuit_matrix(std::slice::from_ref(gate), &operands)?;
    let replaced = reindexed_circuit_matrix(replacement, &operands)?;
    if !original.equal_up_to_global_phase(&replaced, 1e-6) {
        return Err(CompileError::ReplacementMismatch {
            gate: display_name,
            detail: "the replacement unitary differs beyond a global phase".to_string(),
        });
    }
    Ok(())
}

struct NamedReplacer<'a, F> {
    target: &'a str,
    builder_fn: F,
}

impl<F> Decomposer for NamedReplacer<'_, F>
where
    F: Fn(&Gate) -> Vec<Gate>,
{
    fn name(&self) -> &str {
        "replace"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        if gate.name() == Some(self.target) {
            Ok((self.builder_fn)(gate))
        } else {
            Ok(vec![gate.clone()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CircuitBuilder;
    use crate::library;
    use crate::qubit::{BitId, QubitId};
    use std::f64::consts::PI;

    #[test]
    fn test_replace_cnot_with_equivalent() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder.cnot(QubitId(0), QubitId(1)).unwrap();
        let mut circuit = builder.to_circuit();

        circuit
            .replace("CNOT", |gate| {
                let ops = gate.qubit_operands();
                vec![
                    library::ry(ops[1], -PI / 2.0),
                    library::cz(ops[0], ops[1]),
                    library::ry(ops[1], PI / 2.0),
                ]
            })
            .unwrap();

        assert_eq!(circuit.ir().len(), 3);
        assert_eq!(circuit.ir().statements[1].name(), "CZ");
    }

    #[test]
    fn test_replace_rejects_wrong_unitary() {
        let mut builder = CircuitBuilder::new(2, 0);
        builder.cnot(QubitId(0), QubitId(1)).unwrap();
        let mut circuit = builder.to_circuit();
        let before = circuit.ir().clone();

        let result = circuit.replace("CNOT", |gate| {
            let ops = gate.qubit_operands();
            vec![library::x(ops[1])]
        });
        assert!(matches!(
            result,
            Err(CompileError::ReplacementMismatch { .. })
        ));
        // The failed pass left the circuit untouched.
        assert_eq!(circuit.ir(), &before);
    }

    #[test]
    fn test_measurement_to_bit_map() {
        let mut builder = CircuitBuilder::new(3, 2);
        builder
            .measure(QubitId(0), BitId(0))
            .unwrap()
            .measure(QubitId(2), BitId(1))
            .unwrap()
            .measure(QubitId(0), BitId(1))
            .unwrap();
        let circuit = builder.to_circuit();
        let map = circuit.measurement_to_bit_map();
        assert_eq!(map[&0], vec![0, 1]);
        assert_eq!(map[&2], vec![1]);
    }

    #[test]
    fn test_asm_filter() {
        let mut builder = CircuitBuilder::new(1, 0);
        builder
            .asm("TestBackend", "mov a, b")
            .unwrap()
            .asm("OtherBackend", "nop")
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        let mut circuit = builder.to_circuit();
        circuit.asm_filter("Test");
        assert_eq!(circuit.ir().len(), 2);
        assert_eq!(circuit.instruction_count().get("asm"), None);
        assert_eq!(circuit.instruction_count()["H"], 1);
    }

    #[test]
    fn test_from_parts_validates() {
        let mut ir = Ir::new();
        ir.add_gate(library::h(QubitId(5)));
        assert!(Circuit::from_parts(2, 0, ir).is_err());
    }
}
