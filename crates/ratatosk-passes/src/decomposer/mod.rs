//! Gate decomposition passes.
//!
//! Every decomposer implements [`ratatosk_core::Decomposer`] and is
//! driven through [`ratatosk_core::Circuit::decompose`], which checks
//! each replacement for up-to-global-phase equivalence.

mod aba;
mod cnot;
mod mckay;
mod rewrites;

pub use aba::AbaDecomposer;
pub use cnot::{CnotDecomposer, CzDecomposer};
pub use mckay::McKayDecomposer;
pub use rewrites::{Cnot2CzDecomposer, Swap2CnotDecomposer, Swap2CzDecomposer};

use ratatosk_core::Gate;

/// Drop the gates that act as the identity.
pub(crate) fn filter_out_identities(gates: Vec<Gate>) -> Vec<Gate> {
    gates.into_iter().filter(|g| !g.is_identity()).collect()
}
