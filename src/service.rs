//! Orchestration of a single route query.
//!
//! The service owns the long-lived graph, checks the endpoints, runs the
//! configured strategy and packages the outcome for presentation layers.
//! Ordinary failures (unknown nodes, no route) come back as a tagged
//! [`SearchResult`], never as an `Err`. Paths can also be streamed one at a
//! time as [`PathReport`]s.

use serde::Serialize;
use tracing::{info, warn};

use crate::calculator::{path_cost, path_steps, Path, PathStatistics};
use crate::collections::FxIndexSet;
use crate::constraints::{self, Constraint};
use crate::errors::{ConstraintViolation, PathPlannerError};
use crate::graph::{Graph, NodeId};
use crate::graph_algos::{Algorithm, PathFinder, SearchOutcome};


/// Outcome category of a query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Found,
    /// Valid input, but no path passed the search and its constraints
    NoPathFound,
    /// Unknown endpoint or rejected degenerate query
    InvalidInput,
}


/// Everything a presentation layer needs about one query
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult {
    pub success: bool,
    pub status: SearchStatus,
    pub algorithm: &'static str,
    /// First path is the primary one
    pub paths: Vec<Path>,
    pub primary_path: Option<Path>,
    pub visited_nodes: FxIndexSet<NodeId>,
    pub statistics: PathStatistics,
    /// Leading paths with an optimality guarantee, the rest are alternatives
    pub proven_optimal: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResult {

    fn failure(algorithm: &'static str, status: SearchStatus, message: String, visited_nodes: FxIndexSet<NodeId>) -> Self {
        Self {
            success: false,
            status,
            algorithm,
            paths: Vec::new(),
            primary_path: None,
            visited_nodes,
            statistics: PathStatistics::default(),
            proven_optimal: 0,
            message: Some(message),
        }
    }

    /// Short human-readable report
    pub fn summary(&self) -> String {
        let Some(primary) = &self.primary_path else {
            return format!(
                "No path found: {}",
                self.message.as_deref().unwrap_or("unknown reason")
            );
        };

        let stats = &self.statistics;
        let mut lines = vec![
            format!("Path found using {}!", self.algorithm),
            format!("  Steps: {}", path_steps(primary)),
            format!("  Average cost: {:.2}", stats.avg_cost),
            format!("  Total paths: {}", stats.count),
        ];
        if stats.count > 1 {
            lines.push(format!("  Min cost: {:.2}", stats.min_cost));
            lines.push(format!("  Max cost: {:.2}", stats.max_cost));
        }
        lines.join("\n")
    }

    /// One line per path with its cost and hop count
    pub fn path_details<G>(&self, graph: &G) -> Vec<String>
    where
        G: Graph,
    {
        self.paths.iter().enumerate()
            .map(|(i, path)| {
                let label = match (i, i < self.proven_optimal) {
                    (0, true) => "primary, optimal",
                    (0, false) => "primary",
                    (_, true) => "optimal",
                    (_, false) => "alternative, not guaranteed optimal",
                };
                format!(
                    "Path {} ({label}): {} steps, cost {:.2}",
                    i + 1,
                    path_steps(path),
                    path_cost(path, graph),
                )
            })
            .collect()
    }
}


/// A single streamed path with its figures
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathReport {
    pub path: Path,
    pub cost: f64,
    pub steps: usize,
    pub algorithm: &'static str,
}


/// Runs route queries against a fixed graph
#[derive(Clone, Debug)]
pub struct PathfindingService<G> {
    graph: G,
    algorithm: Algorithm,
}

impl<G> PathfindingService<G>
where
    G: Graph,
{

    pub fn new(graph: G, algorithm: Algorithm) -> Self {
        Self { graph, algorithm }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Find paths with the configured algorithm
    ///
    /// When start == goal the single-node path is a success unless one of
    /// `constraints` rejects it, e.g. `SameLocationConstraint`.
    pub fn find_paths(
        &self,
        start: NodeId,
        goal: NodeId,
        constraints: &[Box<dyn Constraint>],
        max_paths: Option<usize>,
    ) -> SearchResult {
        self.run(&self.algorithm, start, goal, constraints, max_paths)
    }

    /// Run every algorithm on the same query
    pub fn compare_algorithms(
        &self,
        start: NodeId,
        goal: NodeId,
        constraints: &[Box<dyn Constraint>],
        max_paths: Option<usize>,
    ) -> Vec<SearchResult> {
        Algorithm::all().iter()
            .map(|algorithm| self.run(algorithm, start, goal, constraints, max_paths))
            .collect()
    }

    /// Stream paths from the configured algorithm as they are found
    ///
    /// Unknown endpoints are an `Err`. With `max_paths` unset the stream runs
    /// until the algorithm has no more paths. A start == goal query rejected by
    /// `constraints` yields nothing.
    pub fn stream_paths<'a>(
        &'a self,
        start: NodeId,
        goal: NodeId,
        constraints: &'a [Box<dyn Constraint>],
        max_paths: Option<usize>,
    ) -> Result<impl Iterator<Item = PathReport> + 'a, PathPlannerError>
    where
        G: 'a,
    {
        let algorithm = self.algorithm.name();
        let mut paths = self.algorithm.paths(start, goal, &self.graph, constraints)?;

        if start == goal {
            if let Err(violation) = self.validate_path(&[start], constraints) {
                info!(algorithm, %violation, "degenerate query rejected");
                paths = Box::new(std::iter::empty());
            }
        }

        Ok(paths.take(max_paths.unwrap_or(usize::MAX)).map(move |path| PathReport {
            cost: path_cost(&path, &self.graph),
            steps: path_steps(&path),
            path,
            algorithm,
        }))
    }

    /// Check a path against constraints, reporting the first violation
    pub fn validate_path(&self, path: &[NodeId], constraints: &[Box<dyn Constraint>]) -> Result<(), ConstraintViolation> {
        constraints::validate_all(constraints, path, &self.graph)
    }

    fn run(
        &self,
        algorithm: &Algorithm,
        start: NodeId,
        goal: NodeId,
        constraints: &[Box<dyn Constraint>],
        max_paths: Option<usize>,
    ) -> SearchResult {
        let name = algorithm.name();

        // checked here too so the caller gets a message naming the endpoint
        let missing = if !self.graph.node_exists(start) {
            Some(PathPlannerError::StartNotFound(start))
        } else if !self.graph.node_exists(goal) {
            Some(PathPlannerError::GoalNotFound(goal))
        } else {
            None
        };
        if let Some(error) = missing {
            warn!(algorithm = name, %error, "invalid query");
            return SearchResult::failure(name, SearchStatus::InvalidInput, error.to_string(), FxIndexSet::default());
        }

        let outcome = match algorithm.find_path(start, goal, &self.graph, constraints, max_paths) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(algorithm = name, %error, "search failed");
                let status = if error.is_input_error() { SearchStatus::InvalidInput } else { SearchStatus::NoPathFound };
                return SearchResult::failure(name, status, error.to_string(), FxIndexSet::default());
            }
        };

        if start == goal {
            // the algorithms short-circuit before constraints, opt-in rules apply here
            if let Err(violation) = self.validate_path(&[start], constraints) {
                info!(algorithm = name, %violation, "degenerate query rejected");
                return SearchResult::failure(name, SearchStatus::InvalidInput, violation.to_string(), outcome.explored);
            }
        }

        self.package(name, outcome)
    }

    fn package(&self, algorithm: &'static str, outcome: SearchOutcome) -> SearchResult {
        let SearchOutcome { paths, explored, proven_optimal } = outcome;

        if paths.is_empty() {
            info!(algorithm, "no paths found");
            return SearchResult::failure(
                algorithm,
                SearchStatus::NoPathFound,
                PathPlannerError::NoPathFound.to_string(),
                explored,
            );
        }

        let statistics = PathStatistics::from_paths(&paths, &self.graph);
        info!(algorithm, count = paths.len(), avg_cost = statistics.avg_cost, "paths found");

        SearchResult {
            success: true,
            status: SearchStatus::Found,
            algorithm,
            primary_path: paths.first().cloned(),
            paths,
            visited_nodes: explored,
            statistics,
            proven_optimal,
            message: None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{NodeLimitConstraint, SameLocationConstraint};
    use crate::graph::RoadGraph;
    use crate::graph_algos::{AStar, BreadthFirst};
    use approx::assert_relative_eq;

    fn square() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_road(1, 2, 100.0);
        graph.add_road(2, 3, 100.0);
        graph.add_road(3, 4, 150.0);
        graph.add_road(4, 1, 150.0);
        graph
    }

    fn service() -> PathfindingService<RoadGraph> {
        PathfindingService::new(square(), Algorithm::BreadthFirst(BreadthFirst))
    }

    #[test]
    fn test_find_paths_success() {
        let result = service().find_paths(1, 3, &[], Some(5));

        assert!(result.success);
        assert_eq!(result.status, SearchStatus::Found);
        assert_eq!(result.primary_path, Some(vec![1, 2, 3]));
        assert_eq!(result.paths.len(), 2);
        assert_eq!(result.statistics.count, 2);
        assert_relative_eq!(result.statistics.min_cost, 200.0);
        assert_relative_eq!(result.statistics.max_cost, 300.0);
        assert_eq!(result.visited_nodes.len(), 4);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_unknown_nodes_are_input_errors() {
        let service = service();

        let result = service.find_paths(42, 3, &[], None);
        assert!(!result.success);
        assert_eq!(result.status, SearchStatus::InvalidInput);
        assert_eq!(result.message.as_deref(), Some("Start node 42 not found"));
        assert!(result.paths.is_empty());

        let result = service.find_paths(1, 43, &[], None);
        assert_eq!(result.message.as_deref(), Some("Goal node 43 not found"));
    }

    #[test]
    fn test_no_path_is_distinct_from_bad_input() {
        let mut graph = square();
        graph.add_road(8, 9, 1.0);
        let service = PathfindingService::new(graph, Algorithm::default());

        let result = service.find_paths(1, 9, &[], None);
        assert!(!result.success);
        assert_eq!(result.status, SearchStatus::NoPathFound);
        assert!(result.message.is_some());
        assert_eq!(result.visited_nodes.len(), 4);
    }

    #[test]
    fn test_constraint_rejection_collapses_into_no_path() {
        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(NodeLimitConstraint::new(2))];
        let result = service().find_paths(1, 3, &constraints, None);
        assert_eq!(result.status, SearchStatus::NoPathFound);
    }

    #[test]
    fn test_same_location() {
        let service = service();

        let result = service.find_paths(2, 2, &[], None);
        assert!(result.success);
        assert_eq!(result.paths, vec![vec![2]]);
        assert_relative_eq!(result.statistics.avg_cost, 0.0);

        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(SameLocationConstraint)];
        let result = service.find_paths(2, 2, &constraints, None);
        assert!(!result.success);
        assert_eq!(result.status, SearchStatus::InvalidInput);
        assert_eq!(result.message.as_deref(), Some("Start and goal are the same location"));

        // the rule never gets in the way of real routes
        assert!(service.find_paths(1, 3, &constraints, None).success);
    }

    #[test]
    fn test_compare_algorithms() {
        let results = service().compare_algorithms(1, 3, &[], Some(2));
        let names: Vec<_> = results.iter().map(|r| r.algorithm).collect();

        assert_eq!(names, vec!["BFS", "DFS", "Classic DFS", "A*"]);
        assert!(results.iter().all(|r| r.success));
        // A* is weight aware
        assert_eq!(results[3].primary_path, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_summary_and_details() {
        let mut service = service();
        service.set_algorithm(Algorithm::AStar(AStar::default()));
        let result = service.find_paths(1, 3, &[], Some(1));

        let summary = result.summary();
        assert!(summary.starts_with("Path found using A*!"));
        assert!(summary.contains("Steps: 2"));
        assert_eq!(result.path_details(service.graph()), vec!["Path 1 (primary, optimal): 2 steps, cost 200.00"]);

        let failed = service.find_paths(1, 99, &[], None);
        assert_eq!(failed.summary(), "No path found: Goal node 99 not found");
    }

    #[test]
    fn test_validate_path() {
        let service = service();
        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(NodeLimitConstraint::new(2))];

        assert!(service.validate_path(&[1, 2], &constraints).is_ok());
        let violation = service.validate_path(&[1, 2, 3], &constraints).unwrap_err();
        assert_eq!(violation.to_string(), "Path exceeds maximum node limit (2)");
    }

    #[test]
    fn test_stream_paths() {
        let service = service();
        let reports: Vec<PathReport> = service.stream_paths(1, 3, &[], None).unwrap().collect();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, vec![1, 2, 3]);
        assert_eq!(reports[0].steps, 2);
        assert_relative_eq!(reports[0].cost, 200.0);
        assert_relative_eq!(reports[1].cost, 300.0);
        assert_eq!(reports[1].algorithm, "BFS");

        assert_eq!(service.stream_paths(1, 3, &[], Some(1)).unwrap().count(), 1);
        assert!(matches!(service.stream_paths(1, 42, &[], None), Err(PathPlannerError::GoalNotFound(42))));
    }

    #[test]
    fn test_stream_paths_same_location() {
        let service = service();
        assert_eq!(service.stream_paths(2, 2, &[], None).unwrap().count(), 1);

        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(SameLocationConstraint)];
        assert_eq!(service.stream_paths(2, 2, &constraints, None).unwrap().count(), 0);
    }

    #[test]
    fn test_result_serializes() {
        let result = service().find_paths(1, 3, &[], None);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "found");
        assert_eq!(json["paths"][0], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
    }
}
