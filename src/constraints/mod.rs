//! Rules a candidate path must satisfy.
//!
//! Constraints compose by conjunction: a path is valid only if every
//! constraint passes. Algorithms drop invalid candidates silently.

mod distance;
mod node_limit;
mod same_location;

pub use distance::DistanceConstraint;
pub use node_limit::NodeLimitConstraint;
pub use same_location::SameLocationConstraint;

use crate::errors::ConstraintViolation;
use crate::graph::{Graph, NodeId};


/// Predicate over (path, graph)
pub trait Constraint {

    /// Check a complete path, explaining the rejection on failure
    fn validate(&self, path: &[NodeId], graph: &dyn Graph) -> Result<(), ConstraintViolation>;

    /// Whether a partial path could still be extended into a valid one
    /// Only monotone rules can answer `false`, the default never prunes
    fn admits_prefix(&self, _partial: &[NodeId], _graph: &dyn Graph) -> bool {
        true
    }
}


/// Validate a path against every constraint, returning the first violation
pub fn validate_all(
    constraints: &[Box<dyn Constraint>],
    path: &[NodeId],
    graph: &dyn Graph,
) -> Result<(), ConstraintViolation> {
    constraints.iter().try_for_each(|constraint| constraint.validate(path, graph))
}

/// True when `path` passes every constraint
pub fn is_valid(constraints: &[Box<dyn Constraint>], path: &[NodeId], graph: &dyn Graph) -> bool {
    validate_all(constraints, path, graph).is_ok()
}

/// True when no constraint rules out extending `partial`
pub fn admits_prefix(constraints: &[Box<dyn Constraint>], partial: &[NodeId], graph: &dyn Graph) -> bool {
    constraints.iter().all(|constraint| constraint.admits_prefix(partial, graph))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    fn chain() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_road(1, 2, 10.0);
        graph.add_road(2, 3, 10.0);
        graph.add_road(3, 4, 10.0);
        graph
    }

    #[test]
    fn test_validate_all_is_conjunction() {
        let graph = chain();
        let constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(NodeLimitConstraint::new(4)),
            Box::new(DistanceConstraint::new(25.0)),
        ];

        assert!(is_valid(&constraints, &[1, 2, 3], &graph));
        let violation = validate_all(&constraints, &[1, 2, 3, 4], &graph).unwrap_err();
        assert!(violation.to_string().contains("distance"));
    }

    #[test]
    fn test_no_constraints_accepts_everything() {
        let graph = chain();
        assert!(is_valid(&[], &[1, 2, 3, 4], &graph));
        assert!(admits_prefix(&[], &[1, 2, 3, 4], &graph));
    }

    #[test]
    fn test_first_violation_is_reported() {
        let graph = chain();
        let constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(SameLocationConstraint),
            Box::new(NodeLimitConstraint::new(0)),
        ];

        let violation = validate_all(&constraints, &[2], &graph).unwrap_err();
        assert_eq!(violation.to_string(), "Start and goal are the same location");
    }
}
