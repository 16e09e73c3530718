use super::Constraint;
use crate::calculator::path_cost;
use crate::errors::ConstraintViolation;
use crate::graph::{Graph, NodeId};


/// Rejects paths whose total cost is above `max_distance`
#[derive(Clone, Copy, Debug)]
pub struct DistanceConstraint {
    pub max_distance: f64,
}

impl DistanceConstraint {
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }
}

impl Constraint for DistanceConstraint {

    fn validate(&self, path: &[NodeId], graph: &dyn Graph) -> Result<(), ConstraintViolation> {
        let distance = path_cost(path, graph);
        if distance > self.max_distance {
            return Err(ConstraintViolation(format!(
                "Path distance ({distance:.0}) exceeds maximum ({:.0})", self.max_distance
            )));
        }
        Ok(())
    }

    // edge costs are never negative, so cost only grows along a prefix
    fn admits_prefix(&self, partial: &[NodeId], graph: &dyn Graph) -> bool {
        path_cost(partial, graph) <= self.max_distance
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    #[test]
    fn test_distance_limit() {
        let mut graph = RoadGraph::new();
        graph.add_road(1, 2, 400.0);
        graph.add_road(2, 3, 700.0);
        let limit = DistanceConstraint::new(1000.0);

        assert!(limit.validate(&[1, 2], &graph).is_ok());
        let violation = limit.validate(&[1, 2, 3], &graph).unwrap_err();
        assert_eq!(violation.to_string(), "Path distance (1100) exceeds maximum (1000)");
        assert!(!limit.admits_prefix(&[1, 2, 3], &graph));
    }

    #[test]
    fn test_single_node_path_has_zero_distance() {
        let graph = RoadGraph::new();
        assert!(DistanceConstraint::new(0.0).validate(&[7], &graph).is_ok());
    }
}
