//! Initial virtual→physical mapping passes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use ratatosk_core::{CompileError, CompileResult, Mapper, Mapping};

fn check_fits(qubit_register_size: usize, num_physical_qubits: usize) -> CompileResult<()> {
    if qubit_register_size > num_physical_qubits {
        return Err(CompileError::domain(format!(
            "circuit needs {qubit_register_size} qubits but the hardware has {num_physical_qubits}"
        )));
    }
    Ok(())
}

/// Maps virtual qubit `i` to physical qubit `i`.
#[derive(Debug, Clone, Copy)]
pub struct IdentityMapper {
    num_physical_qubits: usize,
}

impl IdentityMapper {
    /// An identity mapper for a device of the given size.
    pub fn new(num_physical_qubits: usize) -> Self {
        Self { num_physical_qubits }
    }
}

impl Mapper for IdentityMapper {
    fn name(&self) -> &str {
        "identity_mapper"
    }

    fn map(&self, qubit_register_size: usize) -> CompileResult<Mapping> {
        check_fits(qubit_register_size, self.num_physical_qubits)?;
        Ok(Mapping::identity(qubit_register_size))
    }
}

/// Maps each virtual qubit to a caller-provided physical qubit.
#[derive(Debug, Clone)]
pub struct HardcodedMapper {
    mapping: Mapping,
}

impl HardcodedMapper {
    /// A mapper that always installs `mapping`.
    pub fn new(mapping: Mapping) -> Self {
        Self { mapping }
    }
}

impl Mapper for HardcodedMapper {
    fn name(&self) -> &str {
        "hardcoded_mapper"
    }

    fn map(&self, qubit_register_size: usize) -> CompileResult<Mapping> {
        if self.mapping.len() != qubit_register_size {
            return Err(CompileError::domain(format!(
                "hardcoded mapping covers {} qubits, the register has {qubit_register_size}",
                self.mapping.len(),
            )));
        }
        Ok(self.mapping.clone())
    }
}

/// Maps virtual qubits to a uniformly random subset of the physical
/// qubits. A fixed seed makes the permutation reproducible.
#[derive(Debug, Clone, Copy)]
pub struct RandomMapper {
    num_physical_qubits: usize,
    seed: Option<u64>,
}

impl RandomMapper {
    /// A random mapper for a device of the given size.
    pub fn new(num_physical_qubits: usize) -> Self {
        Self {
            num_physical_qubits,
            seed: None,
        }
    }

    /// A seeded random mapper.
    pub fn with_seed(num_physical_qubits: usize, seed: u64) -> Self {
        Self {
            num_physical_qubits,
            seed: Some(seed),
        }
    }
}

impl Mapper for RandomMapper {
    fn name(&self) -> &str {
        "random_mapper"
    }

    fn map(&self, qubit_register_size: usize) -> CompileResult<Mapping> {
        check_fits(qubit_register_size, self.num_physical_qubits)?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut physical_register: Vec<usize> = (0..self.num_physical_qubits).collect();
        physical_register.shuffle(&mut rng);
        physical_register.truncate(qubit_register_size);
        Mapping::from_physical_register(physical_register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatosk_core::QubitId;

    #[test]
    fn test_identity_mapper() {
        let mapping = IdentityMapper::new(5).map(3).unwrap();
        assert_eq!(mapping.physical(QubitId(0)), Some(0));
        assert_eq!(mapping.physical(QubitId(2)), Some(2));
        assert!(IdentityMapper::new(2).map(3).is_err());
    }

    #[test]
    fn test_hardcoded_mapper() {
        let mapping = Mapping::from_physical_register(vec![2, 0, 1]).unwrap();
        let mapper = HardcodedMapper::new(mapping);
        let installed = mapper.map(3).unwrap();
        assert_eq!(installed.physical(QubitId(0)), Some(2));
        assert!(mapper.map(2).is_err());
    }

    #[test]
    fn test_random_mapper_is_bijective() {
        let mapping = RandomMapper::with_seed(8, 17).map(5).unwrap();
        assert_eq!(mapping.len(), 5);
        let mut targets: Vec<usize> = (0..5usize)
            .map(|i| mapping.physical(QubitId::from(i)).unwrap())
            .collect();
        targets.sort_unstable();
        targets.dedup();
        assert_eq!(targets.len(), 5);
        assert!(targets.iter().all(|&p| p < 8));
    }

    #[test]
    fn test_random_mapper_seed_is_reproducible() {
        let first = RandomMapper::with_seed(6, 42).map(6).unwrap();
        let second = RandomMapper::with_seed(6, 42).map(6).unwrap();
        assert_eq!(first, second);
    }
}
