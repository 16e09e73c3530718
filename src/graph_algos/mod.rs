//! Route search strategies.
//!
//! Every strategy implements [`PathFinder`]: given start, goal, graph,
//! constraints and an optional path cap it returns all paths matching its
//! discovery criterion, plus the nodes it explored on the way. The same paths
//! can also be pulled one at a time as a [`PathStream`].
//! [`Algorithm`] closes the set of strategies for callers that pick one at
//! runtime.

pub mod a_star;
pub mod bfs;
pub mod dfs;
pub mod dfs_classic;
mod diversify;
mod parent_tree;

pub use a_star::AStar;
pub use bfs::BreadthFirst;
pub use dfs::DepthFirst;
pub use dfs_classic::ClassicDfs;

use std::{fmt, str::FromStr};

use tracing::{info, warn};

use crate::calculator::Path;
use crate::collections::{FxIndexMap, FxIndexSet};
use crate::constraints::Constraint;
use crate::errors::PathPlannerError;
use crate::graph::{Graph, NodeId};


/// Node arena used by the traversals
/// N: Node - space on a graph
/// C: per-node data, e.g. cost or depth
/// The tuple contains (parent_index, data) where parent_index is the index of
/// the parent node in the map, `usize::MAX` for the root
pub type ParentMap<N, C> = FxIndexMap<N, (usize, C)>;

/// Paths produced on demand, in the order `find_path` would return them
pub type PathStream<'a> = Box<dyn Iterator<Item = Path> + 'a>;


/// Paths found by one search together with what it explored
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    /// First path is the canonical one, the rest are alternatives
    pub paths: Vec<Path>,
    /// Nodes touched by the search, for visualization only
    pub explored: FxIndexSet<NodeId>,
    /// How many leading paths carry an optimality guarantee
    pub proven_optimal: usize,
}

impl SearchOutcome {

    /// The single-node path returned when start == goal
    pub fn trivial(node: NodeId) -> Self {
        Self {
            paths: vec![vec![node]],
            explored: FxIndexSet::from_iter([node]),
            proven_optimal: 1,
        }
    }

    /// Search finished without a valid path
    pub fn exhausted(explored: FxIndexSet<NodeId>) -> Self {
        Self { paths: Vec::new(), explored, proven_optimal: 0 }
    }

    pub fn primary(&self) -> Option<&Path> {
        self.paths.first()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub(crate) fn into_stream<'a>(self) -> PathStream<'a> {
        Box::new(self.paths.into_iter())
    }
}


/// Common contract of the search strategies
pub trait PathFinder {

    /// Short display name
    fn name(&self) -> &'static str;

    /// Find paths from `start` to `goal`
    ///
    /// Unknown endpoints are reported as `Err`. An empty outcome means no
    /// valid path exists. Every returned path passes every constraint, except
    /// the single-node path returned when start == goal.
    fn find_path<G>(
        &self,
        start: NodeId,
        goal: NodeId,
        graph: &G,
        constraints: &[Box<dyn Constraint>],
        max_paths: Option<usize>,
    ) -> Result<SearchOutcome, PathPlannerError>
    where
        G: Graph;

    /// Stream paths from `start` to `goal` lazily
    ///
    /// Unknown endpoints are reported as `Err`. The stream has no cap, callers
    /// bound it with `Iterator::take`. Each path is produced when pulled, so
    /// taking the first one leaves the remaining candidates unexplored.
    fn paths<'a, G>(
        &'a self,
        start: NodeId,
        goal: NodeId,
        graph: &'a G,
        constraints: &'a [Box<dyn Constraint>],
    ) -> Result<PathStream<'a>, PathPlannerError>
    where
        G: Graph + 'a;
}


/// Endpoint checks shared by every strategy
/// Returns the trivial outcome when start == goal
pub(crate) fn preflight<G>(start: NodeId, goal: NodeId, graph: &G) -> Result<Option<SearchOutcome>, PathPlannerError>
where
    G: Graph,
{
    if !graph.node_exists(start) {
        warn!(start, "start node not found");
        return Err(PathPlannerError::StartNotFound(start));
    }
    if !graph.node_exists(goal) {
        warn!(goal, "goal node not found");
        return Err(PathPlannerError::GoalNotFound(goal));
    }
    if start == goal {
        info!(node = start, "start and goal are the same");
        return Ok(Some(SearchOutcome::trivial(start)));
    }
    Ok(None)
}

/// Requested path cap, at least one
pub(crate) fn path_cap(max_paths: Option<usize>, default: usize) -> usize {
    max_paths.unwrap_or(default).max(1)
}


/// Closed set of strategies, dispatched by variant
#[derive(Clone, Debug)]
pub enum Algorithm {
    BreadthFirst(BreadthFirst),
    DepthFirst(DepthFirst),
    ClassicDfs(ClassicDfs),
    AStar(AStar),
}

impl Algorithm {

    /// Every strategy with its default settings
    pub fn all() -> Vec<Algorithm> {
        vec![
            Algorithm::BreadthFirst(BreadthFirst),
            Algorithm::DepthFirst(DepthFirst),
            Algorithm::ClassicDfs(ClassicDfs::default()),
            Algorithm::AStar(AStar::default()),
        ]
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::BreadthFirst(BreadthFirst)
    }
}

impl PathFinder for Algorithm {

    fn name(&self) -> &'static str {
        match self {
            Algorithm::BreadthFirst(algo) => algo.name(),
            Algorithm::DepthFirst(algo) => algo.name(),
            Algorithm::ClassicDfs(algo) => algo.name(),
            Algorithm::AStar(algo) => algo.name(),
        }
    }

    fn find_path<G>(
        &self,
        start: NodeId,
        goal: NodeId,
        graph: &G,
        constraints: &[Box<dyn Constraint>],
        max_paths: Option<usize>,
    ) -> Result<SearchOutcome, PathPlannerError>
    where
        G: Graph,
    {
        match self {
            Algorithm::BreadthFirst(algo) => algo.find_path(start, goal, graph, constraints, max_paths),
            Algorithm::DepthFirst(algo) => algo.find_path(start, goal, graph, constraints, max_paths),
            Algorithm::ClassicDfs(algo) => algo.find_path(start, goal, graph, constraints, max_paths),
            Algorithm::AStar(algo) => algo.find_path(start, goal, graph, constraints, max_paths),
        }
    }

    fn paths<'a, G>(
        &'a self,
        start: NodeId,
        goal: NodeId,
        graph: &'a G,
        constraints: &'a [Box<dyn Constraint>],
    ) -> Result<PathStream<'a>, PathPlannerError>
    where
        G: Graph + 'a,
    {
        match self {
            Algorithm::BreadthFirst(algo) => algo.paths(start, goal, graph, constraints),
            Algorithm::DepthFirst(algo) => algo.paths(start, goal, graph, constraints),
            Algorithm::ClassicDfs(algo) => algo.paths(start, goal, graph, constraints),
            Algorithm::AStar(algo) => algo.paths(start, goal, graph, constraints),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PathPlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Algorithm::BreadthFirst(BreadthFirst)),
            "dfs" | "depth-first" => Ok(Algorithm::DepthFirst(DepthFirst)),
            "classic-dfs" | "dfs-classic" => Ok(Algorithm::ClassicDfs(ClassicDfs::default())),
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar(AStar::default())),
            _ => Err(PathPlannerError::UnknownAlgorithm(s.to_string())),
        }
    }
}
