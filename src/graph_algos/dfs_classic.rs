use indexmap::map::Entry::Vacant;
use tracing::info;

use super::diversify::Diversified;
use super::parent_tree::{trace_path, NO_PARENT};
use super::{path_cap, preflight, ParentMap, PathFinder, PathStream, SearchOutcome};
use crate::calculator::Path;
use crate::collections::{FxHashSet, FxIndexSet};
use crate::constraints::Constraint;
use crate::errors::PathPlannerError;
use crate::graph::{Graph, NodeId};


/// Order in which a node's neighbors are pushed on the stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NeighborOrder {
    AsGiven,
    Reversed,
    Sorted,
}

impl NeighborOrder {
    const ALL: [NeighborOrder; 3] = [NeighborOrder::AsGiven, NeighborOrder::Reversed, NeighborOrder::Sorted];

    fn apply(self, neighbors: &mut [NodeId]) {
        match self {
            NeighborOrder::AsGiven => {}
            NeighborOrder::Reversed => neighbors.reverse(),
            NeighborOrder::Sorted => neighbors.sort_unstable(),
        }
    }
}


/// Stack-based depth-first search with route diversification
///
/// The primary path comes from a single DFS that keeps the first parent each
/// node was discovered from, so it is rarely the shortest. Alternatives rerun
/// the DFS around a few nodes of the primary path, once per neighbor order,
/// and are kept only when their node-set overlap with every accepted path is
/// at most `similarity_threshold`.
#[derive(Clone, Debug)]
pub struct ClassicDfs {
    pub similarity_threshold: f64,
}

impl Default for ClassicDfs {
    fn default() -> Self {
        Self { similarity_threshold: 0.5 }
    }
}

impl PathFinder for ClassicDfs {

    fn name(&self) -> &'static str {
        "Classic DFS"
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
        let paths: Vec<Path> = routes.by_ref().take(path_cap(max_paths, 1)).collect();
        let explored = routes.into_explored();

        if !paths.is_empty() {
            info!(count = paths.len(), "found paths using Classic DFS");
        }

        Ok(SearchOutcome { paths, explored, proven_optimal: 0 })
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

impl ClassicDfs {

    /// Primary DFS, then one attempt per neighbor order around the primary path
    fn routes<'a, G>(
        &'a self,
        start: NodeId,
        goal: NodeId,
        graph: &'a G,
        constraints: &'a [Box<dyn Constraint>],
    ) -> Diversified<'a, G, NeighborOrder, impl FnMut(&NeighborOrder, &[Path], &mut FxIndexSet<NodeId>) -> Option<Path> + 'a>
    where
        G: Graph,
    {
        let orders = std::iter::once(NeighborOrder::AsGiven).chain(NeighborOrder::ALL).collect();
        let search = move |order: &NeighborOrder, accepted: &[Path], explored: &mut FxIndexSet<NodeId>| {
            let avoided = accepted.first().map(|primary| avoided_nodes(primary)).unwrap_or_default();
            self.search(graph, start, goal, &avoided, *order, explored)
        };
        Diversified::new(graph, constraints, orders, self.similarity_threshold, search)
    }

    /// Single DFS from start, returning as soon as the goal is popped
    /// Every node pushed or popped is recorded in `explored`
    fn search<G>(
        &self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
        avoided: &FxHashSet<NodeId>,
        order: NeighborOrder,
        explored: &mut FxIndexSet<NodeId>,
    ) -> Option<Path>
    where
        G: Graph,
    {
        // node -> (parent index, depth), first discovery wins
        let mut came_from: ParentMap<NodeId, usize> = ParentMap::default();
        let start_index = came_from.insert_full(start, (NO_PARENT, 0)).0;
        let mut stack = vec![start_index];
        explored.insert(start);

        while let Some(index) = stack.pop() {
            let Some((&node, &(_, depth))) = came_from.get_index(index) else {
                continue;
            };
            explored.insert(node);

            if node == goal {
                return trace_path(&came_from, index).ok();
            }

            let mut neighbors = graph.neighbors(node);
            order.apply(&mut neighbors);

            for neighbor in neighbors {
                if avoided.contains(&neighbor) {
                    continue;
                }
                if let Vacant(e) = came_from.entry(neighbor) {
                    stack.push(e.index());
                    e.insert((index, depth + 1));
                    explored.insert(neighbor);
                }
            }
        }

        None
    }
}


/// Intermediate nodes of the primary path to route around
/// Long paths lose every 10th node from index 5, shorter ones roughly every
/// quarter of their length
fn avoided_nodes(primary: &[NodeId]) -> FxHashSet<NodeId> {
    let last = primary.len().saturating_sub(1);
    let (first, step) = if primary.len() > 20 {
        (5, 10)
    } else {
        (1, (primary.len() / 4).max(1))
    };

    (first..last).step_by(step).map(|i| primary[i]).collect()
}
