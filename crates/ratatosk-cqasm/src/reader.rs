//! Lowering of the cQASM 3 AST into the circuit IR.
//!
//! Declared registers are concatenated in declaration order into one
//! virtual qubit register and one virtual bit register; SGMQ operand
//! notation expands into one statement per operand tuple; constant
//! expressions are folded; `inv`/`pow` modifiers are applied to the
//! gate semantics before angle normalization.

use rustc_hash::FxHashMap;
use tracing::debug;

use ratatosk_core::{
    library, normalize_angle, BlochSphereRotation, Circuit, Gate, GateKind, Ir, MatrixGate,
    QubitId, Statement,
};

use crate::ast::{AstStatement, ExprNode, GateNode, IndexEntry, ModifierNode, Program, RefNode};
use crate::error::{ParseError, ParseResult};
use crate::parser::parse_ast;

/// Parse a cQASM 3 source string into a circuit.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parse_ast(source)?;
    lower(&program)
}

#[derive(Debug, Default)]
struct RegisterFile {
    /// name → (offset, size), in declaration order.
    registers: FxHashMap<String, (usize, usize)>,
    total: usize,
}

impl RegisterFile {
    fn declare(&mut self, name: &str, size: usize) -> ParseResult<()> {
        if self.registers.contains_key(name) {
            return Err(ParseError::DuplicateRegister(name.to_string()));
        }
        self.registers
            .insert(name.to_string(), (self.total, size));
        self.total += size;
        Ok(())
    }

    /// Resolve a reference to absolute indices in the virtual register.
    fn resolve(&self, reference: &RefNode) -> ParseResult<Vec<usize>> {
        let name = reference.register();
        let &(offset, size) = self
            .registers
            .get(name)
            .ok_or_else(|| ParseError::UndeclaredRegister(name.to_string()))?;
        let check = |index: usize| -> ParseResult<usize> {
            if index >= size {
                return Err(ParseError::IndexOutOfRange {
                    register: name.to_string(),
                    index,
                });
            }
            Ok(offset + index)
        };
        match reference {
            RefNode::Register(_) => Ok((offset..offset + size).collect()),
            RefNode::Indexed { indices, .. } => {
                let mut resolved = Vec::new();
                for entry in indices {
                    match entry {
                        IndexEntry::Single(index) => resolved.push(check(*index)?),
                        IndexEntry::Range(lo, hi) => {
                            if lo > hi {
                                return Err(ParseError::Expression(format!(
                                    "descending range {lo}:{hi}"
                                )));
                            }
                            for index in *lo..=*hi {
                                resolved.push(check(index)?);
                            }
                        }
                    }
                }
                Ok(resolved)
            }
        }
    }
}

fn lower(program: &Program) -> ParseResult<Circuit> {
    if program.version != "3.0" {
        return Err(ParseError::UnsupportedVersion(program.version.clone()));
    }

    let mut qubits = RegisterFile::default();
    let mut bits = RegisterFile::default();
    let mut ir = Ir::new();

    for statement in &program.statements {
        match statement {
            AstStatement::QubitDecl { name, size } => qubits.declare(name, *size)?,
            AstStatement::BitDecl { name, size } => bits.declare(name, *size)?,
            AstStatement::Gate(gate) => lower_gate(gate, &qubits, &mut ir)?,
            AstStatement::Measure {
                bits: bit_ref,
                qubits: qubit_ref,
            } => {
                let qubit_indices = qubits.resolve(qubit_ref)?;
                let bit_indices = bits.resolve(bit_ref)?;
                if qubit_indices.len() != bit_indices.len() {
                    return Err(ParseError::MalformedInstruction {
                        name: "measure".into(),
                        detail: format!(
                            "{} qubits measured into {} bits",
                            qubit_indices.len(),
                            bit_indices.len(),
                        ),
                    });
                }
                for (qubit, bit) in qubit_indices.into_iter().zip(bit_indices) {
                    ir.add_statement(Statement::measure(qubit.into(), bit.into()));
                }
            }
            AstStatement::Init(reference) => {
                for qubit in qubits.resolve(reference)? {
                    ir.add_statement(Statement::init(qubit.into()));
                }
            }
            AstStatement::Reset(reference) => {
                for qubit in qubits.resolve(reference)? {
                    ir.add_statement(Statement::reset(qubit.into()));
                }
            }
            AstStatement::Barrier(reference) => {
                for qubit in qubits.resolve(reference)? {
                    ir.add_statement(Statement::barrier(qubit.into()));
                }
            }
            AstStatement::Wait { operand, cycles } => {
                let cycles = cycles.evaluate_int()?;
                for qubit in qubits.resolve(operand)? {
                    ir.add_statement(Statement::wait(qubit.into(), cycles));
                }
            }
            AstStatement::Asm { backend, payload } => {
                ir.add_statement(Statement::asm(backend.clone(), payload.clone()));
            }
        }
    }

    debug!(
        qubits = qubits.total,
        bits = bits.total,
        statements = ir.len(),
        "lowered cQASM program"
    );
    Circuit::from_parts(qubits.total, bits.total, ir).map_err(ParseError::from)
}

fn lower_gate(node: &GateNode, qubits: &RegisterFile, ir: &mut Ir) -> ParseResult<()> {
    let arity = gate_arity(&node.name)?;
    if node.operands.len() != arity {
        return Err(ParseError::MalformedInstruction {
            name: node.name.clone(),
            detail: format!(
                "expected {arity} operand(s), got {}",
                node.operands.len()
            ),
        });
    }

    // Resolve SGMQ operands; all groups must agree in length.
    let groups: Vec<Vec<usize>> = node
        .operands
        .iter()
        .map(|reference| qubits.resolve(reference))
        .collect::<ParseResult<_>>()?;
    let count = groups[0].len();
    if groups.iter().any(|group| group.len() != count) {
        return Err(ParseError::MalformedInstruction {
            name: node.name.clone(),
            detail: "SGMQ operand lists have different lengths".into(),
        });
    }

    for tuple_index in 0..count {
        let operands: Vec<QubitId> = groups
            .iter()
            .map(|group| QubitId::from(group[tuple_index]))
            .collect();
        let mut gate = build_gate(node, &operands)?;
        // Modifiers apply innermost-last: inv.pow(2).X is inv(pow(2, X)).
        for modifier in node.modifiers.iter().rev() {
            gate = apply_modifier(gate, modifier)?;
        }
        ir.add_gate(gate);
    }
    Ok(())
}

fn gate_arity(name: &str) -> ParseResult<usize> {
    library::CATALOG
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.num_qubits)
        .ok_or_else(|| ParseError::UnknownInstruction(name.to_string()))
}

fn float_params(node: &GateNode, expected: usize) -> ParseResult<Vec<f64>> {
    if node.params.len() != expected {
        return Err(ParseError::MalformedInstruction {
            name: node.name.clone(),
            detail: format!("expected {expected} parameter(s), got {}", node.params.len()),
        });
    }
    node.params.iter().map(ExprNode::evaluate).collect()
}

fn build_gate(node: &GateNode, operands: &[QubitId]) -> ParseResult<Gate> {
    let q0 = operands[0];
    let gate = match node.name.as_str() {
        "I" => library::i(q0),
        "H" => library::h(q0),
        "X" => library::x(q0),
        "X90" => library::x90(q0),
        "mX90" => library::mx90(q0),
        "Y" => library::y(q0),
        "Y90" => library::y90(q0),
        "mY90" => library::my90(q0),
        "Z" => library::z(q0),
        "S" => library::s(q0),
        "Sdag" => library::sdag(q0),
        "T" => library::t(q0),
        "Tdag" => library::tdag(q0),
        "Rx" => library::rx(q0, normalize_angle(float_params(node, 1)?[0])),
        "Ry" => library::ry(q0, normalize_angle(float_params(node, 1)?[0])),
        "Rz" => library::rz(q0, normalize_angle(float_params(node, 1)?[0])),
        "Rn" => {
            let params = float_params(node, 5)?;
            library::rn(
                q0,
                params[0],
                params[1],
                params[2],
                normalize_angle(params[3]),
                normalize_angle(params[4]),
            )?
        }
        "CNOT" => library::cnot(q0, operands[1]),
        "CZ" => library::cz(q0, operands[1]),
        "CR" => library::cr(q0, operands[1], normalize_angle(float_params(node, 1)?[0])),
        "CRk" => {
            if node.params.len() != 1 {
                return Err(ParseError::MalformedInstruction {
                    name: node.name.clone(),
                    detail: "CRk takes exactly one integer parameter".into(),
                });
            }
            library::crk(q0, operands[1], node.params[0].evaluate_int()?)
        }
        "SWAP" => library::swap(q0, operands[1]),
        other => return Err(ParseError::UnknownInstruction(other.to_string())),
    };
    if !matches!(node.name.as_str(), "Rx" | "Ry" | "Rz" | "Rn" | "CR" | "CRk")
        && !node.params.is_empty()
    {
        return Err(ParseError::MalformedInstruction {
            name: node.name.clone(),
            detail: "gate takes no parameters".into(),
        });
    }
    Ok(gate)
}

fn apply_modifier(gate: Gate, modifier: &ModifierNode) -> ParseResult<Gate> {
    match modifier {
        ModifierNode::Inv => invert_gate(gate),
        ModifierNode::Pow(exponent) => power_gate(gate, exponent.evaluate()?),
    }
}

/// Re-match a transformed rotation against the catalog, so e.g.
/// `inv.S` reads back as `Sdag`.
fn renamed_rotation(rotation: BlochSphereRotation) -> Gate {
    library::try_name_rotation(&rotation)
        .unwrap_or_else(|| Gate::anonymous(GateKind::Rotation(rotation)))
}

fn invert_gate(gate: Gate) -> ParseResult<Gate> {
    match gate.kind {
        GateKind::Rotation(rotation) => Ok(renamed_rotation(BlochSphereRotation::new(
            rotation.qubit,
            rotation.axis,
            -rotation.angle,
            -rotation.phase,
        ))),
        GateKind::Controlled(controlled) => {
            let target = invert_gate(*controlled.target)?;
            Ok(Gate::anonymous(GateKind::Controlled(
                ratatosk_core::ControlledGate {
                    control: controlled.control,
                    target: Box::new(target),
                },
            )))
        }
        GateKind::Matrix(matrix_gate) => Ok(Gate::anonymous(GateKind::Matrix(MatrixGate {
            matrix: matrix_gate.matrix.dagger(),
            operands: matrix_gate.operands,
        }))),
    }
}

fn power_gate(gate: Gate, exponent: f64) -> ParseResult<Gate> {
    match gate.kind {
        GateKind::Rotation(rotation) => Ok(renamed_rotation(BlochSphereRotation::new(
            rotation.qubit,
            rotation.axis,
            rotation.angle * exponent,
            rotation.phase * exponent,
        ))),
        GateKind::Controlled(controlled) => {
            let target = power_gate(*controlled.target, exponent)?;
            Ok(Gate::anonymous(GateKind::Controlled(
                ratatosk_core::ControlledGate {
                    control: controlled.control,
                    target: Box::new(target),
                },
            )))
        }
        GateKind::Matrix(matrix_gate) => {
            if exponent.fract() != 0.0 || exponent < 0.0 {
                return Err(ParseError::InvalidModifier(
                    "matrix gates support non-negative integer powers only".into(),
                ));
            }
            let mut matrix =
                ratatosk_core::SquareMatrix::identity(matrix_gate.matrix.dim());
            for _ in 0..exponent as u64 {
                matrix = matrix_gate.matrix.mul(&matrix);
            }
            Ok(Gate::anonymous(GateKind::Matrix(MatrixGate {
                matrix,
                operands: matrix_gate.operands,
            })))
        }
    }
}
