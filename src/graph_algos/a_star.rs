use super::diversify::Diversified;
use super::parent_tree::{trace_path, NO_PARENT};
use super::{path_cap, preflight, ParentMap, PathFinder, PathStream, SearchOutcome};
use crate::calculator::Path;
use crate::collections::{FxHashSet, FxIndexSet};
use crate::constraints::Constraint;
use crate::errors::PathPlannerError;
use crate::geometry::Point;
use crate::graph::{Graph, NodeId};

use std::{
    collections::BinaryHeap,
    cmp::Ordering
};
use num_traits::Float;
use indexmap::map::Entry::{Occupied, Vacant};
use tracing::info;


/// Heuristic used when a node or the goal has no coordinates
pub const DEFAULT_HEURISTIC: f64 = 1.0;


/// Node on A* graph
#[derive(Debug)]
struct Node<T> {
    index: usize, // index in the closed_list - maps to the Id of the node
    cost: T, // Cost to reach this node
    f_cost: T, // Total cost = cost + h(n) aka estimated cost
}

impl<T: Float> Ord for Node<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest f_cost first, then earliest discovered
        other.f_cost.partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}
impl<T: Float> PartialOrd for Node<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: Float> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<T: Float> Eq for Node<T> {}


/// A* Algorithm with a straight-line heuristic over node coordinates
/// https://en.wikipedia.org/wiki/A*_search_algorithm
///
/// The primary path is minimum-cost as long as the heuristic is admissible,
/// which holds for road lengths that are never shorter than the straight line
/// between their endpoints, measured with the graph's distance scale.
///
/// Alternatives rerun the search with the heuristic scaled by each of
/// `heuristic_weights`. Weights above 1 overestimate, so those routes carry no
/// optimality guarantee; only the primary path is reported as optimal.
#[derive(Clone, Debug)]
pub struct AStar {
    pub heuristic_weights: Vec<f64>,
    pub similarity_threshold: f64,
    pub default_max_paths: usize, // used when the caller sets no cap
}

impl Default for AStar {
    fn default() -> Self {
        Self {
            heuristic_weights: vec![0.5, 1.5, 2.0, 0.8],
            similarity_threshold: 0.4,
            default_max_paths: 5,
        }
    }
}

impl PathFinder for AStar {

    fn name(&self) -> &'static str {
        "A*"
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

        let mut routes = self.routes(start, goal, graph, constraints);
        let paths: Vec<Path> = routes.by_ref().take(path_cap(max_paths, self.default_max_paths)).collect();
        let explored = routes.into_explored();

        if paths.is_empty() {
            return Ok(SearchOutcome::exhausted(explored));
        }
        info!(count = paths.len(), "found paths using A*");

        Ok(SearchOutcome { paths, explored, proven_optimal: 1 })
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
        Ok(Box::new(self.routes(start, goal, graph, constraints)))
    }
}

impl AStar {

    /// Optimal route at weight 1, then one alternative per heuristic weight
    fn routes<'a, G>(
        &'a self,
        start: NodeId,
        goal: NodeId,
        graph: &'a G,
        constraints: &'a [Box<dyn Constraint>],
    ) -> Diversified<'a, G, f64, impl FnMut(&f64, &[Path], &mut FxIndexSet<NodeId>) -> Option<Path> + 'a>
    where
        G: Graph,
    {
        let weights = std::iter::once(1.0).chain(self.heuristic_weights.iter().copied()).collect();
        let search = move |weight: &f64, _: &[Path], explored: &mut FxIndexSet<NodeId>| {
            self.search(graph, start, goal, *weight, explored)
        };
        Diversified::new(graph, constraints, weights, self.similarity_threshold, search)
    }

    /// Traverses the graph using A* with the heuristic scaled by `weight`
    /// Returns the path to the goal, recording every node pushed or popped
    fn search<G>(
        &self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
        weight: f64,
        explored: &mut FxIndexSet<NodeId>,
    ) -> Option<Path>
    where
        G: Graph,
    {
        let goal_point = graph.coordinates(goal);
        let heuristic_fn = |node: NodeId| weight * heuristic(graph, node, goal_point);

        // Open List
        // Nodes that need to be evaluated, implemented as priority queue
        // Sorting is done by f_cost (cost + heuristic)
        let mut open_list: BinaryHeap<Node<f64>> = BinaryHeap::new();

        // Best known (parent_index, cost) per node, used to rebuild the path
        // for the start node, parent_index is NO_PARENT
        let mut closed_list: ParentMap<NodeId, f64> = ParentMap::default();

        // Finalized nodes, never expanded twice
        let mut finalized: FxHashSet<usize> = FxHashSet::default();

        let start_index = closed_list.insert_full(start, (NO_PARENT, 0.0)).0;
        open_list.push(Node {
            index: start_index,
            cost: 0.0,
            f_cost: heuristic_fn(start),
        });
        explored.insert(start);

        while let Some(Node { index, cost, .. }) = open_list.pop() {

            let Some((&node, &(_, best))) = closed_list.get_index(index) else {
                continue;
            };
            explored.insert(node);

            // A cheaper entry for this node was pushed later, or it is already closed
            if cost > best || !finalized.insert(index) {
                continue;
            }

            if node == goal {
                return trace_path(&closed_list, index).ok();
            }

            for neighbor in graph.neighbors(node) {

                // confirmed cost, not heuristic
                let new_cost = best + graph.edge_cost(node, neighbor);

                let neighbor_index = match closed_list.entry(neighbor) {
                    Vacant(e) => {
                        let neighbor_index = e.index();
                        e.insert((index, new_cost));
                        neighbor_index
                    }
                    Occupied(mut e) => {
                        if finalized.contains(&e.index()) || e.get().1 <= new_cost {
                            continue;
                        }
                        // We've found a better path to this neighbor
                        e.insert((index, new_cost));
                        e.index()
                    }
                };

                explored.insert(neighbor);
                open_list.push(Node {
                    index: neighbor_index,
                    cost: new_cost,
                    f_cost: new_cost + heuristic_fn(neighbor),
                });
            }
        }

        None
    }
}


/// Straight-line distance between a node and the goal position, in edge-cost
/// units through the graph's distance scale
/// Falls back to DEFAULT_HEURISTIC when either has no coordinates
pub fn heuristic<G>(graph: &G, node: NodeId, goal_point: Option<Point>) -> f64
where
    G: Graph + ?Sized,
{
    match (graph.coordinates(node), goal_point) {
        (Some(point), Some(goal)) => point.distance(&goal) * graph.distance_scale(),
        _ => DEFAULT_HEURISTIC,
    }
}
