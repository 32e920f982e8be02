//! Ratatosk Compilation Passes
//!
//! The transformation passes of the Ratatosk compiler. Each pass
//! implements one of the seam traits of `ratatosk-core` and is applied
//! through the [`Circuit`](ratatosk_core::Circuit) façade:
//!
//! 1. **Merge**: fuse consecutive single-qubit rotations
//!    ([`SingleQubitGatesMerger`])
//! 2. **Decompose**: rewrite gates into a target-friendly form
//!    ([`AbaDecomposer`], [`McKayDecomposer`], [`CnotDecomposer`],
//!    [`CzDecomposer`], and the predefined rewrites)
//! 3. **Map**: pick an initial virtual→physical assignment
//!    ([`IdentityMapper`], [`HardcodedMapper`], [`RandomMapper`])
//! 4. **Route**: insert SWAPs to satisfy connectivity
//!    ([`ShortestPathRouter`], [`AStarRouter`])
//! 5. **Validate**: check hardware constraints
//!    ([`InteractionValidator`], [`PrimitiveGateValidator`])
//!
//! The [`ScheduleExporter`] lowers a fully decomposed circuit to a
//! sequence of schedule operations.
//!
//! # Example: routing against a linear chain
//!
//! ```rust
//! use ratatosk_core::{CircuitBuilder, QubitId};
//! use ratatosk_passes::{Connectivity, ShortestPathRouter};
//!
//! let mut builder = CircuitBuilder::new(3, 0);
//! builder.cnot(QubitId(0), QubitId(2)).unwrap();
//! let mut circuit = builder.to_circuit();
//!
//! let router = ShortestPathRouter::new(Connectivity::linear(3));
//! circuit.route(&router).unwrap();
//!
//! // One SWAP was inserted ahead of the CNOT.
//! assert_eq!(circuit.ir().len(), 2);
//! ```

pub mod decomposer;
pub mod exporter;
pub mod mapper;
pub mod merger;
pub mod router;
pub mod validator;

pub use decomposer::{
    AbaDecomposer, Cnot2CzDecomposer, CnotDecomposer, CzDecomposer, McKayDecomposer,
    Swap2CnotDecomposer, Swap2CzDecomposer,
};
pub use exporter::{Schedule, ScheduleExporter, ScheduleOp};
pub use mapper::{HardcodedMapper, IdentityMapper, RandomMapper};
pub use merger::SingleQubitGatesMerger;
pub use router::{AStarRouter, Connectivity, DistanceMetric, ShortestPathRouter};
pub use validator::{InteractionValidator, PrimitiveGateValidator};
