use thiserror::Error;

use crate::graph::NodeId;


/// Errors raised by the path planners and the location index
#[derive(Debug, Error)]
pub enum PathPlannerError {
    #[error("Start node {0} not found")]
    StartNotFound(NodeId),
    #[error("Goal node {0} not found")]
    GoalNotFound(NodeId),
    #[error("No path found between the specified nodes")]
    NoPathFound, // search space exhausted without reaching the goal
    #[error("Unknown location: {0}")]
    UnknownLocation(String),
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("kd-tree error: {0}")]
    KdTreeError(String),
}

impl PathPlannerError {
    /// True for errors caused by caller input rather than the search itself
    pub fn is_input_error(&self) -> bool {
        !matches!(self, PathPlannerError::NoPathFound)
    }
}


/// A path rejected by a constraint, with the reason
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ConstraintViolation(pub String);


impl From<kdtree::ErrorKind> for PathPlannerError {
    fn from(error: kdtree::ErrorKind) -> Self {
        PathPlannerError::KdTreeError(error.to_string())
    }
}
