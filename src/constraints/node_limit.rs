use super::Constraint;
use crate::errors::ConstraintViolation;
use crate::graph::{Graph, NodeId};


/// Rejects paths with more than `max_nodes` nodes
#[derive(Clone, Copy, Debug)]
pub struct NodeLimitConstraint {
    pub max_nodes: usize,
}

impl NodeLimitConstraint {
    pub fn new(max_nodes: usize) -> Self {
        Self { max_nodes }
    }
}

impl Constraint for NodeLimitConstraint {

    fn validate(&self, path: &[NodeId], _graph: &dyn Graph) -> Result<(), ConstraintViolation> {
        if path.len() > self.max_nodes {
            return Err(ConstraintViolation(format!(
                "Path exceeds maximum node limit ({})", self.max_nodes
            )));
        }
        Ok(())
    }

    // a prefix only grows
    fn admits_prefix(&self, partial: &[NodeId], _graph: &dyn Graph) -> bool {
        partial.len() <= self.max_nodes
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    #[test]
    fn test_node_limit() {
        let graph = RoadGraph::new();
        let limit = NodeLimitConstraint::new(3);

        assert!(limit.validate(&[1, 2, 3], &graph).is_ok());
        let violation = limit.validate(&[1, 2, 3, 4], &graph).unwrap_err();
        assert_eq!(violation.to_string(), "Path exceeds maximum node limit (3)");
        assert!(limit.admits_prefix(&[1, 2, 3], &graph));
        assert!(!limit.admits_prefix(&[1, 2, 3, 4], &graph));
    }
}
