use std::fmt::Debug;

use tracing::{debug, info};

use crate::calculator::{paths_too_similar, Path};
use crate::collections::FxIndexSet;
use crate::constraints::{self, Constraint};
use crate::graph::{Graph, NodeId};


/// Lazy primary-then-alternatives route generation
///
/// Each attempt runs `search` once. The first attempt yields the primary
/// path; if it finds nothing or its path fails the constraints, the iterator
/// ends without trying alternatives. Later attempts yield a path only when it
/// passes the constraints and its overlap with every path already yielded is
/// at most `similarity_threshold`.
pub(crate) struct Diversified<'a, G, A, S> {
    graph: &'a G,
    constraints: &'a [Box<dyn Constraint>],
    attempts: std::vec::IntoIter<A>,
    search: S, // (attempt, accepted paths, explored) -> path
    similarity_threshold: f64,
    accepted: Vec<Path>,
    explored: FxIndexSet<NodeId>,
}

impl<'a, G, A, S> Diversified<'a, G, A, S>
where
    G: Graph,
    A: Debug,
    S: FnMut(&A, &[Path], &mut FxIndexSet<NodeId>) -> Option<Path>,
{

    pub(crate) fn new(
        graph: &'a G,
        constraints: &'a [Box<dyn Constraint>],
        attempts: Vec<A>,
        similarity_threshold: f64,
        search: S,
    ) -> Self {
        Self {
            graph,
            constraints,
            attempts: attempts.into_iter(),
            search,
            similarity_threshold,
            accepted: Vec::new(),
            explored: FxIndexSet::default(),
        }
    }

    /// Nodes touched by every attempt run so far
    pub(crate) fn into_explored(self) -> FxIndexSet<NodeId> {
        self.explored
    }

    fn stop(&mut self) -> Option<Path> {
        self.attempts = Vec::new().into_iter();
        None
    }
}

impl<G, A, S> Iterator for Diversified<'_, G, A, S>
where
    G: Graph,
    A: Debug,
    S: FnMut(&A, &[Path], &mut FxIndexSet<NodeId>) -> Option<Path>,
{
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            let attempt = self.attempts.next()?;
            let primary = self.accepted.is_empty();

            let Some(candidate) = (self.search)(&attempt, &self.accepted, &mut self.explored) else {
                if primary {
                    info!("no path found between nodes");
                    return self.stop();
                }
                debug!(?attempt, "no alternative reachable");
                continue;
            };

            if !constraints::is_valid(self.constraints, &candidate, self.graph) {
                if primary {
                    info!(path = ?candidate, "primary path rejected by constraints");
                    return self.stop();
                }
                debug!(?attempt, "alternative rejected by constraints");
                continue;
            }

            if self.accepted.iter().any(|existing| paths_too_similar(&candidate, existing, self.similarity_threshold)) {
                debug!(?attempt, "alternative too similar to an accepted path");
                continue;
            }

            self.accepted.push(candidate.clone());
            return Some(candidate);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::NodeLimitConstraint;
    use crate::graph::RoadGraph;

    fn graph() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_road(1, 2, 1.0);
        graph
    }

    /// Search that returns a canned path per attempt and counts its calls
    fn canned(paths: Vec<Option<Path>>) -> (Vec<usize>, impl FnMut(&usize, &[Path], &mut FxIndexSet<NodeId>) -> Option<Path>) {
        let attempts = (0..paths.len()).collect();
        let search = move |attempt: &usize, _: &[Path], explored: &mut FxIndexSet<NodeId>| {
            explored.insert(*attempt as NodeId);
            paths[*attempt].clone()
        };
        (attempts, search)
    }

    #[test]
    fn test_yields_primary_then_distinct_alternatives() {
        let graph = graph();
        let (attempts, search) = canned(vec![
            Some(vec![1, 2, 3, 4]),
            Some(vec![1, 2, 3, 4]), // duplicate
            None,
            Some(vec![1, 5, 6, 4]),
        ]);

        let mut routes = Diversified::new(&graph, &[], attempts, 0.5, search);
        assert_eq!(routes.next(), Some(vec![1, 2, 3, 4]));
        assert_eq!(routes.next(), Some(vec![1, 5, 6, 4]));
        assert_eq!(routes.next(), None);
        assert_eq!(routes.into_explored().len(), 4);
    }

    #[test]
    fn test_attempts_run_only_when_pulled() {
        let graph = graph();
        let (attempts, search) = canned(vec![Some(vec![1, 2]), Some(vec![3, 4]), Some(vec![5, 6])]);

        let mut routes = Diversified::new(&graph, &[], attempts, 0.5, search);
        assert_eq!(routes.next(), Some(vec![1, 2]));
        // only the primary attempt has run
        assert_eq!(routes.into_explored().len(), 1);
    }

    #[test]
    fn test_rejected_primary_ends_the_stream() {
        let graph = graph();
        let (attempts, search) = canned(vec![Some(vec![1, 2, 3, 4]), Some(vec![1, 4])]);
        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(NodeLimitConstraint::new(3))];

        let mut routes = Diversified::new(&graph, &constraints, attempts, 0.5, search);
        assert_eq!(routes.next(), None);
        assert_eq!(routes.next(), None);
    }
}
