//! Pass traits and the virtual→physical mapping table.
//!
//! Passes are the unit of compilation: each family gets its own seam
//! trait, implemented in `ratatosk-passes` and consumed through the
//! [`Circuit`](crate::circuit::Circuit) façade.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{CompileError, CompileResult};
use crate::gate::Gate;
use crate::ir::Ir;
use crate::qubit::QubitId;

/// Fuses statements in place.
pub trait Merger {
    /// Name of the pass, for diagnostics.
    fn name(&self) -> &str;

    /// Merge statements of `ir`; must either complete fully or leave
    /// `ir` untouched.
    fn merge(&self, ir: &mut Ir, qubit_register_size: usize) -> CompileResult<()>;
}

/// Rewrites a single gate into an equivalent gate list.
///
/// The decomposition driver verifies every replacement for
/// up-to-global-phase equivalence; a decomposer that declines to touch
/// a gate returns the gate itself as the single element.
pub trait Decomposer {
    /// Name of the pass, for diagnostics.
    fn name(&self) -> &str;

    /// Decompose one gate.
    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>>;
}

/// Produces an initial virtual→physical mapping.
pub trait Mapper {
    /// Name of the pass, for diagnostics.
    fn name(&self) -> &str;

    /// Map a virtual register of the given size onto physical qubits.
    fn map(&self, qubit_register_size: usize) -> CompileResult<Mapping>;
}

/// Inserts SWAPs so every two-qubit gate acts on connected qubits,
/// keeping `mapping` live while rewriting the IR into physical indices.
pub trait Router {
    /// Name of the pass, for diagnostics.
    fn name(&self) -> &str;

    /// Route `ir`, updating `mapping` for every inserted SWAP.
    fn route(&self, ir: &mut Ir, mapping: &mut Mapping) -> CompileResult<()>;
}

/// A pure check over the IR.
pub trait Validator {
    /// Name of the pass, for diagnostics.
    fn name(&self) -> &str;

    /// Validate `ir`, returning a structured error on violation.
    fn validate(&self, ir: &Ir) -> CompileResult<()>;
}

/// Lowers a circuit to a backend artifact.
pub trait Exporter {
    /// The artifact type.
    type Output;

    /// Name of the pass, for diagnostics.
    fn name(&self) -> &str;

    /// Produce the artifact.
    fn export(&self, circuit: &Circuit) -> CompileResult<Self::Output>;
}

/// A bijection from virtual qubits onto physical qubits.
///
/// Kept bidirectional so routing can swap the physical assignment of
/// two qubits in O(1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    virtual_to_physical: FxHashMap<QubitId, usize>,
    physical_to_virtual: FxHashMap<usize, QubitId>,
}

impl Mapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity mapping on `n` qubits.
    pub fn identity(n: usize) -> Self {
        let mut mapping = Self::new();
        for i in 0..n {
            mapping.add(QubitId::from(i), i);
        }
        mapping
    }

    /// Build a mapping from a physical-qubit list: virtual qubit `i`
    /// maps to `physical_register[i]`. Fails if the targets repeat.
    pub fn from_physical_register(physical_register: Vec<usize>) -> CompileResult<Self> {
        let mut mapping = Self::new();
        for (virtual_index, &physical) in physical_register.iter().enumerate() {
            if mapping.physical_to_virtual.contains_key(&physical) {
                return Err(CompileError::domain(format!(
                    "physical qubit {physical} is assigned twice"
                )));
            }
            mapping.add(QubitId::from(virtual_index), physical);
        }
        Ok(mapping)
    }

    /// Insert a virtual→physical pair. Conflicting stale pairs are
    /// removed first so both directions stay consistent.
    pub fn add(&mut self, virtual_qubit: QubitId, physical: usize) {
        if let Some(&old_virtual) = self.physical_to_virtual.get(&physical) {
            if old_virtual != virtual_qubit {
                self.virtual_to_physical.remove(&old_virtual);
            }
        }
        if let Some(&old_physical) = self.virtual_to_physical.get(&virtual_qubit) {
            if old_physical != physical {
                self.physical_to_virtual.remove(&old_physical);
            }
        }
        self.virtual_to_physical.insert(virtual_qubit, physical);
        self.physical_to_virtual.insert(physical, virtual_qubit);
    }

    /// The physical qubit a virtual qubit lives on.
    pub fn physical(&self, virtual_qubit: QubitId) -> Option<usize> {
        self.virtual_to_physical.get(&virtual_qubit).copied()
    }

    /// The virtual qubit living on a physical qubit.
    pub fn virtual_qubit(&self, physical: usize) -> Option<QubitId> {
        self.physical_to_virtual.get(&physical).copied()
    }

    /// Exchange the virtual occupants of two physical qubits.
    pub fn swap_physical(&mut self, p1: usize, p2: usize) {
        let v1 = self.physical_to_virtual.get(&p1).copied();
        let v2 = self.physical_to_virtual.get(&p2).copied();

        if let Some(v1) = v1 {
            self.virtual_to_physical.insert(v1, p2);
            self.physical_to_virtual.insert(p2, v1);
        } else {
            self.physical_to_virtual.remove(&p2);
        }

        if let Some(v2) = v2 {
            self.virtual_to_physical.insert(v2, p1);
            self.physical_to_virtual.insert(p1, v2);
        } else {
            self.physical_to_virtual.remove(&p1);
        }
    }

    /// Number of mapped qubits.
    pub fn len(&self) -> usize {
        self.virtual_to_physical.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.virtual_to_physical.is_empty()
    }

    /// Iterate over `(virtual, physical)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, usize)> + '_ {
        self.virtual_to_physical.iter().map(|(&v, &p)| (v, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let mapping = Mapping::identity(3);
        assert_eq!(mapping.physical(QubitId(0)), Some(0));
        assert_eq!(mapping.physical(QubitId(2)), Some(2));
        assert_eq!(mapping.virtual_qubit(1), Some(QubitId(1)));
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_swap_physical() {
        let mut mapping = Mapping::identity(3);
        mapping.swap_physical(0, 2);
        assert_eq!(mapping.physical(QubitId(0)), Some(2));
        assert_eq!(mapping.physical(QubitId(2)), Some(0));
        assert_eq!(mapping.virtual_qubit(0), Some(QubitId(2)));
        assert_eq!(mapping.virtual_qubit(2), Some(QubitId(0)));
        assert_eq!(mapping.physical(QubitId(1)), Some(1));
    }

    #[test]
    fn test_from_physical_register_rejects_duplicates() {
        assert!(Mapping::from_physical_register(vec![0, 2, 1]).is_ok());
        assert!(Mapping::from_physical_register(vec![0, 0, 1]).is_err());
    }

    #[test]
    fn test_swap_with_unoccupied_physical() {
        let mut mapping = Mapping::identity(1);
        mapping.swap_physical(0, 5);
        assert_eq!(mapping.physical(QubitId(0)), Some(5));
        assert_eq!(mapping.virtual_qubit(0), None);
    }
}
