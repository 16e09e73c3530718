//! Path costs, similarity and aggregate statistics.

use serde::Serialize;

use crate::collections::FxHashSet;
use crate::graph::{Graph, NodeId};


/// Ordered sequence of nodes from start to goal
pub type Path = Vec<NodeId>;


/// Total weighted cost of a path
/// Missing edges and edges without a `length` count as unit cost
pub fn path_cost<G>(path: &[NodeId], graph: &G) -> f64
where
    G: Graph + ?Sized,
{
    path.windows(2)
        .map(|pair| graph.edge_cost(pair[0], pair[1]))
        .sum()
}

/// Number of hops (edges) in a path
pub fn path_steps(path: &[NodeId]) -> usize {
    path.len().saturating_sub(1)
}

/// Jaccard overlap of the node sets of two paths, in [0, 1]
pub fn path_similarity(a: &[NodeId], b: &[NodeId]) -> f64 {
    let set_a: FxHashSet<NodeId> = a.iter().copied().collect();
    let set_b: FxHashSet<NodeId> = b.iter().copied().collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// True when the overlap of two paths is strictly above `threshold`
pub fn paths_too_similar(a: &[NodeId], b: &[NodeId], threshold: f64) -> bool {
    path_similarity(a, b) > threshold
}


/// Aggregate figures over a set of paths
/// Steps are hop counts, i.e. nodes - 1
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PathStatistics {
    pub count: usize,
    pub avg_cost: f64,
    pub min_cost: f64,
    pub max_cost: f64,
    pub avg_steps: f64,
    pub min_steps: usize,
    pub max_steps: usize,
}

impl PathStatistics {

    /// Statistics for `paths`, all zero when there are none
    pub fn from_paths<G>(paths: &[Path], graph: &G) -> Self
    where
        G: Graph + ?Sized,
    {
        if paths.is_empty() {
            return Self::default();
        }

        let costs: Vec<f64> = paths.iter().map(|path| path_cost(path, graph)).collect();
        let steps: Vec<usize> = paths.iter().map(|path| path_steps(path)).collect();
        let count = paths.len();

        Self {
            count,
            avg_cost: costs.iter().sum::<f64>() / count as f64,
            min_cost: costs.iter().copied().fold(f64::INFINITY, f64::min),
            max_cost: costs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            avg_steps: steps.iter().sum::<usize>() as f64 / count as f64,
            min_steps: steps.iter().copied().min().unwrap_or_default(),
            max_steps: steps.iter().copied().max().unwrap_or_default(),
        }
    }
}
