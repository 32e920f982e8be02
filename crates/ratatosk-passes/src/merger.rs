//! Single-qubit gate fusion.

use tracing::debug;

use ratatosk_core::{
    library, BlochSphereRotation, CompileResult, ControlInstruction, Gate, GateKind, Ir, Merger,
    Param, QubitId, Statement,
};

/// Fuses runs of consecutive single-qubit rotations on the same qubit
/// into one rotation via quaternion composition.
///
/// A barrier on *any* qubit is a universal fence: every pending
/// accumulator is flushed before it. Multi-qubit gates, non-unitary
/// instructions, and waits fence the qubits they touch; an asm
/// declaration is opaque and fences everything. A flushed rotation is
/// re-named to a catalog gate when its axis, angle, and phase match an
/// entry; otherwise it stays anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleQubitGatesMerger;

impl Merger for SingleQubitGatesMerger {
    fn name(&self) -> &str {
        "single_qubit_gates_merger"
    }

    fn merge(&self, ir: &mut Ir, qubit_register_size: usize) -> CompileResult<()> {
        let before = ir.len();
        let mut accumulators: Vec<Option<Gate>> = vec![None; qubit_register_size];
        let mut out: Vec<Statement> = Vec::with_capacity(ir.len());

        for statement in ir.statements.drain(..) {
            match statement {
                Statement::Gate(gate) if gate.as_rotation().is_some() => {
                    let index = rotation_qubit(&gate).index();
                    if index >= accumulators.len() {
                        out.push(Statement::Gate(gate));
                        continue;
                    }
                    let fused = match accumulators[index].take() {
                        Some(pending) => fuse(&pending, &gate),
                        None => gate,
                    };
                    accumulators[index] = Some(fused);
                }
                Statement::Control(ControlInstruction::Barrier(qubit)) => {
                    flush_all(&mut accumulators, &mut out);
                    out.push(Statement::barrier(qubit));
                }
                Statement::Asm(asm) => {
                    flush_all(&mut accumulators, &mut out);
                    out.push(Statement::Asm(asm));
                }
                other => {
                    for qubit in other.qubit_operands() {
                        if qubit.index() < accumulators.len() {
                            flush_qubit(&mut accumulators, qubit, &mut out);
                        }
                    }
                    out.push(other);
                }
            }
        }
        flush_all(&mut accumulators, &mut out);

        ir.statements = out;
        debug!(before, after = ir.len(), "merged single-qubit gates");
        Ok(())
    }
}

fn rotation_qubit(gate: &Gate) -> QubitId {
    match &gate.kind {
        GateKind::Rotation(rotation) => rotation.qubit,
        _ => QubitId(0),
    }
}

/// Compose two rotation gates, `pending` applied first. The result
/// keeps the catalog identity of the non-identity side, if any.
fn fuse(pending: &Gate, incoming: &Gate) -> Gate {
    let (GateKind::Rotation(first), GateKind::Rotation(second)) = (&pending.kind, &incoming.kind)
    else {
        return incoming.clone();
    };
    let composed = BlochSphereRotation::compose(first, second);
    let (name, params): (Option<String>, Vec<Param>) = if first.is_identity() {
        (incoming.name.clone(), incoming.params.clone())
    } else if second.is_identity() {
        (pending.name.clone(), pending.params.clone())
    } else {
        (None, vec![])
    };
    Gate {
        kind: GateKind::Rotation(composed),
        name,
        params,
    }
}

fn flush_qubit(accumulators: &mut [Option<Gate>], qubit: QubitId, out: &mut Vec<Statement>) {
    if let Some(statement) = accumulators[qubit.index()].take().and_then(flushed_statement) {
        out.push(statement);
    }
}

fn flush_all(accumulators: &mut [Option<Gate>], out: &mut Vec<Statement>) {
    for index in 0..accumulators.len() {
        flush_qubit(accumulators, QubitId::from(index), out);
    }
}

fn flushed_statement(gate: Gate) -> Option<Statement> {
    let rotation = gate.as_rotation()?;
    if rotation.is_identity() {
        return None;
    }
    if gate.is_anonymous() {
        if let Some(named) = library::try_name_rotation(rotation) {
            return Some(Statement::Gate(named));
        }
    }
    Some(Statement::Gate(gate))
}
