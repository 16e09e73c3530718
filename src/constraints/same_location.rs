use super::Constraint;
use crate::errors::ConstraintViolation;
use crate::graph::{Graph, NodeId};


/// Rejects the degenerate single-node path
/// Opt-in: callers add it when start == goal must count as a failure
#[derive(Clone, Copy, Debug, Default)]
pub struct SameLocationConstraint;

impl Constraint for SameLocationConstraint {
    fn validate(&self, path: &[NodeId], _graph: &dyn Graph) -> Result<(), ConstraintViolation> {
        if path.len() == 1 {
            return Err(ConstraintViolation("Start and goal are the same location".to_string()));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    #[test]
    fn test_same_location() {
        let graph = RoadGraph::new();
        assert!(SameLocationConstraint.validate(&[5], &graph).is_err());
        assert!(SameLocationConstraint.validate(&[5, 6], &graph).is_ok());
    }
}
