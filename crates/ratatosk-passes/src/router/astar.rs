//! A* routing over the implicit grid embedding.

use ratatosk_core::{CompileResult, Ir, Mapping, Router};

use super::heuristics::{grid_distance, DistanceMetric};
use super::{route_with_path_search, Connectivity};

/// Routes like [`super::ShortestPathRouter`], but searches paths with
/// A* under a grid distance heuristic. The grid column count is
/// `ceil(sqrt(P))` for a device of `P` qubits.
#[derive(Debug, Clone)]
pub struct AStarRouter {
    connectivity: Connectivity,
    metric: DistanceMetric,
}

impl AStarRouter {
    /// An A* router over the given connectivity and metric.
    pub fn new(connectivity: Connectivity, metric: DistanceMetric) -> Self {
        Self {
            connectivity,
            metric,
        }
    }
}

impl Router for AStarRouter {
    fn name(&self) -> &str {
        "astar_router"
    }

    fn route(&self, ir: &mut Ir, mapping: &mut Mapping) -> CompileResult<()> {
        let num_columns = (self.connectivity.num_qubits() as f64).sqrt().ceil() as usize;
        route_with_path_search(ir, mapping, &self.connectivity, |from, to| {
            self.connectivity.astar_path(from, to, |node| {
                grid_distance(node, to, num_columns, self.metric)
            })
        })
    }
}
