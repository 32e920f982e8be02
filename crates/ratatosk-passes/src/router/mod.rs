//! SWAP-insertion routing against a connectivity graph.

mod astar;
mod heuristics;
mod shortest_path;

pub use astar::AStarRouter;
pub use heuristics::DistanceMetric;
pub use shortest_path::ShortestPathRouter;

use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;

use ratatosk_core::{
    library, CompileError, CompileResult, Ir, Mapping, QubitId, Statement,
};

/// Undirected connectivity over the physical qubits.
///
/// Built from a `stringified index → neighbor list` adjacency map; only
/// pairs present in both endpoints' lists become edges.
#[derive(Debug, Clone)]
pub struct Connectivity {
    num_qubits: usize,
    edges: Vec<(usize, usize)>,
    adjacency: FxHashMap<usize, Vec<usize>>,
    graph: UnGraph<u32, ()>,
}

impl Connectivity {
    /// Build a connectivity graph from a stringified adjacency map.
    pub fn from_adjacency(adjacency: &FxHashMap<String, Vec<usize>>) -> CompileResult<Self> {
        let mut parsed: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (key, neighbors) in adjacency {
            let index: usize = key.parse().map_err(|_| {
                CompileError::domain(format!("connectivity key '{key}' is not a qubit index"))
            })?;
            parsed.insert(index, neighbors.clone());
        }
        Ok(Self::from_parsed(&parsed))
    }

    /// Build a connectivity graph from `(index, neighbors)` pairs.
    pub fn from_pairs(pairs: &[(usize, &[usize])]) -> Self {
        let parsed: FxHashMap<usize, Vec<usize>> = pairs
            .iter()
            .map(|(index, neighbors)| (*index, neighbors.to_vec()))
            .collect();
        Self::from_parsed(&parsed)
    }

    fn from_parsed(parsed: &FxHashMap<usize, Vec<usize>>) -> Self {
        let num_qubits = parsed
            .iter()
            .flat_map(|(&k, v)| std::iter::once(k).chain(v.iter().copied()))
            .max()
            .map_or(0, |max| max + 1);

        // Keep only edges listed from both endpoints.
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for (&from, neighbors) in parsed {
            for &to in neighbors {
                let reciprocal = parsed.get(&to).is_some_and(|back| back.contains(&from));
                if reciprocal && from < to && !edges.contains(&(from, to)) {
                    edges.push((from, to));
                }
            }
        }
        edges.sort_unstable();

        let mut graph = UnGraph::new_undirected();
        for index in 0..num_qubits {
            graph.add_node(index as u32);
        }
        let mut adjacency: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for &(from, to) in &edges {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            adjacency.entry(from).or_default().push(to);
            adjacency.entry(to).or_default().push(from);
        }

        Self {
            num_qubits,
            edges,
            adjacency,
            graph,
        }
    }

    /// Linear chain 0-1-2-...-(n-1).
    pub fn linear(n: usize) -> Self {
        let parsed: FxHashMap<usize, Vec<usize>> = (0..n)
            .map(|i| {
                let mut neighbors = Vec::new();
                if i > 0 {
                    neighbors.push(i - 1);
                }
                if i + 1 < n {
                    neighbors.push(i + 1);
                }
                (i, neighbors)
            })
            .collect();
        Self::from_parsed(&parsed)
    }

    /// Fully connected graph on `n` qubits.
    pub fn full(n: usize) -> Self {
        let parsed: FxHashMap<usize, Vec<usize>> = (0..n)
            .map(|i| (i, (0..n).filter(|&j| j != i).collect()))
            .collect();
        Self::from_parsed(&parsed)
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The undirected edges.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Whether two qubits share an edge.
    pub fn is_connected(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Neighbors of a qubit.
    pub fn neighbors(&self, qubit: usize) -> &[usize] {
        self.adjacency
            .get(&qubit)
            .map_or(&[], Vec::as_slice)
    }

    /// A shortest path between two qubits (unit edge weights), if one
    /// exists.
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        self.search_path(from, to, |_| 0.0)
    }

    /// A path found by A* under the given heuristic.
    pub fn astar_path(
        &self,
        from: usize,
        to: usize,
        heuristic: impl Fn(usize) -> f64,
    ) -> Option<Vec<usize>> {
        self.search_path(from, to, heuristic)
    }

    fn search_path(
        &self,
        from: usize,
        to: usize,
        heuristic: impl Fn(usize) -> f64,
    ) -> Option<Vec<usize>> {
        if from >= self.num_qubits || to >= self.num_qubits {
            return None;
        }
        let goal = NodeIndex::new(to);
        let (_, path) = petgraph::algo::astar(
            &self.graph,
            NodeIndex::new(from),
            |node| node == goal,
            |_| 1.0,
            |node| heuristic(node.index()),
        )?;
        Some(path.into_iter().map(NodeIndex::index).collect())
    }
}

/// Shared routing walk: for every two-qubit gate whose mapped operands
/// are not adjacent, insert SWAPs along `find_path`'s route (stopping
/// one edge short of the destination), updating the live mapping per
/// SWAP; every statement is rewritten through the live mapping.
pub(crate) fn route_with_path_search(
    ir: &mut Ir,
    mapping: &mut Mapping,
    connectivity: &Connectivity,
    find_path: impl Fn(usize, usize) -> Option<Vec<usize>>,
) -> CompileResult<()> {
    let mut out: Vec<Statement> = Vec::with_capacity(ir.len());
    let mut swaps_inserted = 0usize;

    for statement in ir.statements.drain(..) {
        if let Statement::Gate(gate) = &statement {
            let operands = gate.qubit_operands();
            if operands.len() == 2 {
                let p0 = mapped_physical(mapping, operands[0])?;
                let p1 = mapped_physical(mapping, operands[1])?;
                if p0 != p1 && !connectivity.is_connected(p0, p1) {
                    let path = find_path(p0, p1)
                        .ok_or(CompileError::NoRoutingPath { from: p0, to: p1 })?;
                    if path.len() < 2 {
                        return Err(CompileError::NoRoutingPath { from: p0, to: p1 });
                    }
                    for window in path.windows(2).take(path.len() - 2) {
                        out.push(Statement::gate(library::swap(
                            QubitId::from(window[0]),
                            QubitId::from(window[1]),
                        )));
                        mapping.swap_physical(window[0], window[1]);
                        swaps_inserted += 1;
                    }
                }
            }
        }
        out.push(remap_statement(&statement, mapping)?);
    }

    ir.statements = out;
    tracing::debug!(swaps_inserted, "routing completed");
    Ok(())
}

fn mapped_physical(mapping: &Mapping, qubit: QubitId) -> CompileResult<usize> {
    mapping.physical(qubit).ok_or_else(|| {
        CompileError::domain(format!("qubit {qubit} is not covered by the mapping"))
    })
}

fn remap_statement(statement: &Statement, mapping: &Mapping) -> CompileResult<Statement> {
    for qubit in statement.qubit_operands() {
        mapped_physical(mapping, qubit)?;
    }
    Ok(statement.remapped(&|qubit| {
        QubitId::from(mapping.physical(qubit).unwrap_or(qubit.index()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_filter() {
        // 0→1 is listed on both sides; 1→2 only on one.
        let connectivity = Connectivity::from_pairs(&[(0, &[1]), (1, &[0, 2]), (2, &[])]);
        assert!(connectivity.is_connected(0, 1));
        assert!(connectivity.is_connected(1, 0));
        assert!(!connectivity.is_connected(1, 2));
        assert_eq!(connectivity.num_qubits(), 3);
        assert_eq!(connectivity.edges(), &[(0, 1)]);
    }

    #[test]
    fn test_from_adjacency_rejects_bad_keys() {
        let mut map: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        map.insert("zero".to_string(), vec![1]);
        assert!(Connectivity::from_adjacency(&map).is_err());
    }

    #[test]
    fn test_shortest_path_on_chain() {
        let connectivity = Connectivity::linear(5);
        assert_eq!(
            connectivity.shortest_path(0, 4),
            Some(vec![0, 1, 2, 3, 4])
        );
        assert_eq!(connectivity.shortest_path(2, 2), Some(vec![2]));
    }

    #[test]
    fn test_no_path_between_components() {
        let connectivity = Connectivity::from_pairs(&[(0, &[1]), (1, &[0]), (2, &[3]), (3, &[2])]);
        assert_eq!(connectivity.shortest_path(0, 3), None);
    }
}
