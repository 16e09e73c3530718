use tracing::info;

use super::{path_cap, preflight, PathFinder, PathStream, SearchOutcome};
use crate::calculator::Path;
use crate::collections::{FxHashSet, FxIndexSet};
use crate::constraints::{self, Constraint};
use crate::errors::PathPlannerError;
use crate::graph::{Graph, NodeId};


/// Exhaustive depth-first search over simple paths
/// https://en.wikipedia.org/wiki/Depth-first_search
///
/// Enumerates loop-free paths from start in neighbor order and keeps the first
/// `max_paths` that reach the goal and pass the constraints. There is no
/// optimality guarantee.
///
/// The number of simple paths grows exponentially with graph size. Monotone
/// constraints such as `NodeLimitConstraint` or `DistanceConstraint` prune
/// partial paths and are the only bound on the running time, an unconstrained
/// search on a large unreachable component will run to exhaustion.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthFirst;

impl PathFinder for DepthFirst {

    fn name(&self) -> &'static str {
        "DFS"
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
        if let Some(trivial) = preflight(start, goal, graph)? {
            return Ok(trivial);
        }

        let mut simple = SimplePaths::new(start, goal, graph, constraints);
        let paths: Vec<Path> = simple.by_ref().take(path_cap(max_paths, 1)).collect();

        if paths.is_empty() {
            info!(start, goal, "no path found between nodes");
        } else {
            info!(count = paths.len(), "found paths using DFS");
        }

        Ok(SearchOutcome { paths, explored: simple.explored, proven_optimal: 0 })
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
        if let Some(trivial) = preflight(start, goal, graph)? {
            return Ok(trivial.into_stream());
        }
        Ok(Box::new(SimplePaths::new(start, goal, graph, constraints)))
    }
}


/// Backtracking walk over simple paths, resumable between pulls
struct SimplePaths<'a, G> {
    graph: &'a G,
    goal: NodeId,
    constraints: &'a [Box<dyn Constraint>],
    // current path and its members, shared by every frame
    path: Vec<NodeId>,
    on_path: FxHashSet<NodeId>,
    // one frame per node on the path: (its neighbors, next neighbor to try)
    stack: Vec<(Vec<NodeId>, usize)>,
    explored: FxIndexSet<NodeId>,
}

impl<'a, G> SimplePaths<'a, G>
where
    G: Graph,
{
    fn new(start: NodeId, goal: NodeId, graph: &'a G, constraints: &'a [Box<dyn Constraint>]) -> Self {
        Self {
            graph,
            goal,
            constraints,
            path: vec![start],
            on_path: FxHashSet::from_iter([start]),
            stack: vec![(graph.neighbors(start), 0)],
            explored: FxIndexSet::from_iter([start]),
        }
    }
}

impl<G> Iterator for SimplePaths<'_, G>
where
    G: Graph,
{
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            let (neighbors, next) = self.stack.last_mut()?;

            let Some(&neighbor) = neighbors.get(*next) else {
                // all branches tried, backtrack and free the node for siblings
                self.stack.pop();
                if let Some(node) = self.path.pop() {
                    self.on_path.remove(&node);
                }
                continue;
            };
            *next += 1;

            if self.on_path.contains(&neighbor) {
                continue;
            }

            self.path.push(neighbor);
            self.explored.insert(neighbor);

            if !constraints::admits_prefix(self.constraints, &self.path, self.graph) {
                self.path.pop();
                continue;
            }

            if neighbor == self.goal {
                let found = constraints::is_valid(self.constraints, &self.path, self.graph)
                    .then(|| self.path.clone());
                self.path.pop();
                match found {
                    Some(path) => return Some(path),
                    None => continue,
                }
            }

            self.on_path.insert(neighbor);
            self.stack.push((self.graph.neighbors(neighbor), 0));
        }
    }
}
