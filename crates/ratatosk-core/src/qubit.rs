//! Qubit and bit register indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit in the virtual qubit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for register addressing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Index of a bit in the virtual bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BitId(pub u32);

impl BitId {
    /// The index as a `usize`, for register addressing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl From<u32> for BitId {
    fn from(id: u32) -> Self {
        BitId(id)
    }
}

impl From<usize> for BitId {
    fn from(id: usize) -> Self {
        BitId(u32::try_from(id).expect("BitId overflow: exceeds u32::MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", QubitId(3)), "q3");
        assert_eq!(format!("{}", BitId(0)), "b0");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(QubitId::from(2usize), QubitId(2));
        assert_eq!(BitId::from(7u32), BitId(7));
        assert_eq!(QubitId(5).index(), 5);
    }
}
