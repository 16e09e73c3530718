use std::collections::VecDeque;

use indexmap::map::Entry::{Occupied, Vacant};
use tracing::{debug, info};

use super::{path_cap, preflight, PathFinder, PathStream, SearchOutcome};
use crate::calculator::Path;
use crate::collections::{FxIndexMap, FxIndexSet};
use crate::constraints::{self, Constraint};
use crate::errors::PathPlannerError;
use crate::graph::{Graph, NodeId};


/// Layered parent tree
/// Each node maps to (hop distance from start, indices of every predecessor
/// reaching it at that distance)
type LayerTree = FxIndexMap<NodeId, (usize, Vec<usize>)>;


/// Breadth-first search returning every path tied for the fewest hops
/// https://en.wikipedia.org/wiki/Breadth-first_search
///
/// Edge weights are ignored. With no cap a single optimal path is returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthFirst;

impl PathFinder for BreadthFirst {

    fn name(&self) -> &'static str {
        "BFS"
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

        let (tree, goal_index) = self.build_tree(start, goal, graph);
        let explored: FxIndexSet<NodeId> = tree.keys().copied().collect();

        let Some(goal_index) = goal_index else {
            info!(start, goal, "no path found between nodes");
            return Ok(SearchOutcome::exhausted(explored));
        };

        let paths: Vec<Path> = TiedPaths::new(tree, goal_index, graph, constraints)
            .take(path_cap(max_paths, 1))
            .collect();

        if paths.is_empty() {
            info!(start, goal, "every optimal path was rejected by constraints");
        } else if paths.len() > 1 {
            info!(count = paths.len(), "found optimal paths");
        }

        Ok(SearchOutcome {
            proven_optimal: paths.len(),
            paths,
            explored,
        })
    }

    /// The frontier pass runs up front, tied paths are then rebuilt one per pull
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

        match self.build_tree(start, goal, graph) {
            (tree, Some(goal_index)) => Ok(Box::new(TiedPaths::new(tree, goal_index, graph, constraints))),
            (_, None) => {
                info!(start, goal, "no path found between nodes");
                Ok(Box::new(std::iter::empty()))
            }
        }
    }
}

impl BreadthFirst {

    /// Expand layer by layer from start until the goal is dequeued
    /// FIFO order means every node one hop closer than the goal has been
    /// expanded by then, so the goal's predecessor set is complete
    fn build_tree<G>(&self, start: NodeId, goal: NodeId, graph: &G) -> (LayerTree, Option<usize>)
    where
        G: Graph,
    {
        let mut tree = LayerTree::default();
        let start_index = tree.insert_full(start, (0, Vec::new())).0;
        let mut queue = VecDeque::from([start_index]);

        while let Some(index) = queue.pop_front() {
            let Some((&node, &(distance, _))) = tree.get_index(index) else {
                continue;
            };

            if node == goal {
                return (tree, Some(index));
            }

            for neighbor in graph.neighbors(node) {
                match tree.entry(neighbor) {
                    Vacant(e) => {
                        // first time seen, one layer further out
                        queue.push_back(e.index());
                        e.insert((distance + 1, vec![index]));
                    }
                    Occupied(mut e) => {
                        // reached again at the same minimal distance: a tied route
                        let (neighbor_distance, parents) = e.get_mut();
                        if *neighbor_distance == distance + 1 && !parents.contains(&index) {
                            parents.push(index);
                        }
                    }
                }
            }
        }

        (tree, None)
    }
}


/// Tied-optimal paths, rebuilt lazily from the layered tree
/// Walks the predecessor sets back from the goal depth-first, with an
/// explicit stack of (tree index, trail length) frames over one shared trail.
/// Predecessors are visited in discovery order and only paths passing the
/// constraints are yielded.
struct TiedPaths<'a, G> {
    tree: LayerTree,
    graph: &'a G,
    constraints: &'a [Box<dyn Constraint>],
    trail: Vec<usize>,
    stack: Vec<(usize, usize)>,
}

impl<'a, G> TiedPaths<'a, G>
where
    G: Graph,
{
    fn new(tree: LayerTree, goal_index: usize, graph: &'a G, constraints: &'a [Box<dyn Constraint>]) -> Self {
        Self {
            tree,
            graph,
            constraints,
            trail: Vec::new(),
            stack: vec![(goal_index, 0)],
        }
    }
}

impl<G> Iterator for TiedPaths<'_, G>
where
    G: Graph,
{
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            let (index, depth) = self.stack.pop()?;

            self.trail.truncate(depth);
            self.trail.push(index);

            let Some((_, (_, parents))) = self.tree.get_index(index) else {
                continue;
            };

            // only the start has no predecessor
            if parents.is_empty() {
                let path: Path = self.trail.iter().rev()
                    .filter_map(|&i| self.tree.get_index(i).map(|(node, _)| *node))
                    .collect();
                if constraints::is_valid(self.constraints, &path, self.graph) {
                    return Some(path);
                }
                debug!(?path, "optimal path rejected by constraints");
                continue;
            }

            for &parent in parents.iter().rev() {
                self.stack.push((parent, depth + 1));
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::NodeLimitConstraint;
    use crate::graph::RoadGraph;

    // A - B - C - D - A, ids 1..=4
    fn square() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_road(1, 2, 1.0);
        graph.add_road(2, 3, 1.0);
        graph.add_road(3, 4, 1.0);
        graph.add_road(4, 1, 1.0);
        graph
    }

    #[test]
    fn test_bfs_finds_tied_paths_on_cycle() {
        let graph = square();
        let outcome = BreadthFirst.find_path(1, 3, &graph, &[], Some(5)).unwrap();

        assert_eq!(outcome.paths, vec![vec![1, 2, 3], vec![1, 4, 3]]);
        assert_eq!(outcome.proven_optimal, 2);
    }

    #[test]
    fn test_bfs_defaults_to_one_path() {
        let graph = square();
        let outcome = BreadthFirst.find_path(1, 3, &graph, &[], None).unwrap();
        assert_eq!(outcome.paths, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_bfs_ignores_weights() {
        let mut graph = RoadGraph::new();
        graph.add_road(1, 2, 1.0);
        graph.add_road(2, 3, 1.0);
        graph.add_road(1, 3, 500.0);

        let outcome = BreadthFirst.find_path(1, 3, &graph, &[], Some(3)).unwrap();
        assert_eq!(outcome.paths, vec![vec![1, 3]]);
    }

    #[test]
    fn test_bfs_chain_rejected_by_node_limit() {
        let mut graph = RoadGraph::new();
        for node in 1..5 {
            graph.add_road(node, node + 1, 1.0);
        }
        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(NodeLimitConstraint::new(3))];

        let outcome = BreadthFirst.find_path(1, 5, &graph, &constraints, None).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.explored.len(), 5);
    }

    #[test]
    fn test_bfs_unreachable_goal() {
        let mut graph = square();
        graph.add_road(8, 9, 1.0);

        let outcome = BreadthFirst.find_path(1, 9, &graph, &[], None).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.explored.len(), 4);
    }

    #[test]
    fn test_bfs_many_ties_respects_cap() {
        // 3x3 grid, corner to corner has 6 shortest routes
        let mut graph = RoadGraph::new();
        let id = |r: i64, c: i64| r * 3 + c;
        for r in 0..3 {
            for c in 0..3 {
                if c < 2 { graph.add_road(id(r, c), id(r, c + 1), 1.0); }
                if r < 2 { graph.add_road(id(r, c), id(r + 1, c), 1.0); }
            }
        }

        let all = BreadthFirst.find_path(id(0, 0), id(2, 2), &graph, &[], Some(100)).unwrap();
        assert_eq!(all.paths.len(), 6);
        assert!(all.paths.iter().all(|path| path.len() == 5));

        let capped = BreadthFirst.find_path(id(0, 0), id(2, 2), &graph, &[], Some(4)).unwrap();
        assert_eq!(capped.paths.len(), 4);
        assert_eq!(capped.paths[..], all.paths[..4]);

        let streamed: Vec<Path> = BreadthFirst.paths(id(0, 0), id(2, 2), &graph, &[]).unwrap().collect();
        assert_eq!(streamed, all.paths);
    }

    #[test]
    fn test_tied_paths_are_rebuilt_on_demand() {
        let graph = square();
        let (tree, goal_index) = BreadthFirst.build_tree(1, 3, &graph);
        let mut tied = TiedPaths::new(tree, goal_index.unwrap(), &graph, &[]);

        assert_eq!(tied.next(), Some(vec![1, 2, 3]));
        // the second predecessor of the goal is still waiting on the stack
        assert_eq!(tied.stack.len(), 1);
        assert_eq!(tied.next(), Some(vec![1, 4, 3]));
        assert_eq!(tied.next(), None);
    }
}
