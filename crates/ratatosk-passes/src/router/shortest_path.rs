//! BFS shortest-path routing.

use ratatosk_core::{CompileResult, Ir, Mapping, Router};

use super::{route_with_path_search, Connectivity};

/// Routes by inserting SWAPs along the shortest path between the
/// mapped operands of every disconnected two-qubit gate.
#[derive(Debug, Clone)]
pub struct ShortestPathRouter {
    connectivity: Connectivity,
}

impl ShortestPathRouter {
    /// A shortest-path router over the given connectivity.
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl Router for ShortestPathRouter {
    fn name(&self) -> &str {
        "shortest_path_router"
    }

    fn route(&self, ir: &mut Ir, mapping: &mut Mapping) -> CompileResult<()> {
        route_with_path_search(ir, mapping, &self.connectivity, |from, to| {
            self.connectivity.shortest_path(from, to)
        })
    }
}
