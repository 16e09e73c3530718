//! Route finding over city road networks.
//!
//! Compares breadth-first, depth-first and A* strategies on a weighted,
//! undirected road graph. Each strategy can return every path tied for
//! optimal cost, honours pluggable constraints and reports the nodes it
//! explored so routes can be visualized. Paths can also be streamed lazily,
//! one per pull.
//!
//! ```
//! use routefinder::{Algorithm, PathfindingService, RoadGraph};
//!
//! let mut graph = RoadGraph::new();
//! graph.add_road(1, 2, 120.0);
//! graph.add_road(2, 3, 80.0);
//!
//! let service = PathfindingService::new(graph, Algorithm::default());
//! let result = service.find_paths(1, 3, &[], None);
//! assert_eq!(result.primary_path, Some(vec![1, 2, 3]));
//! ```

pub mod calculator;
pub mod collections;
pub mod constraints;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod graph_algos;
pub mod locations;
pub mod service;

pub use calculator::{Path, PathStatistics};
pub use constraints::{Constraint, DistanceConstraint, NodeLimitConstraint, SameLocationConstraint};
pub use errors::{ConstraintViolation, PathPlannerError};
pub use geometry::Point;
pub use graph::{Graph, NodeId, RoadGraph};
pub use graph_algos::{AStar, Algorithm, BreadthFirst, ClassicDfs, DepthFirst, PathFinder, PathStream, SearchOutcome};
pub use locations::LocationIndex;
pub use service::{PathReport, PathfindingService, SearchResult, SearchStatus};
