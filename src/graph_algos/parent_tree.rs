use crate::errors::PathPlannerError;
use super::ParentMap;


/// Marks the root of a parent tree
pub(crate) const NO_PARENT: usize = usize::MAX;


/// Follow parent indices from `goal_index` back to the root
/// Returns the ordered path as a vector of nodes from root to goal
/// node_map: ParentMap<N, C> - map of nodes with their parent index and per-node data
/// goal_index: usize - index of the goal node in the node_map
pub(crate) fn trace_path<N, C>(node_map: &ParentMap<N, C>, goal_index: usize) -> Result<Vec<N>, PathPlannerError>
where
    N: Clone,
{

    let mut path = Vec::new();
    let mut current_index = goal_index;

    // Trace back from goal to start
    while current_index != NO_PARENT {
        // a parent chain longer than the map means the tree is corrupt
        if path.len() > node_map.len() {
            return Err(PathPlannerError::NoPathFound);
        }
        if let Some((node, &(parent_index, _))) = node_map.get_index(current_index) {
            path.push(node.clone());
            current_index = parent_index;
        } else {
            return Err(PathPlannerError::NoPathFound);
        }
    }

    path.reverse();

    if path.is_empty() {
        return Err(PathPlannerError::NoPathFound);
    }

    Ok(path)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_path() {
        let mut node_map: ParentMap<i64, usize> = ParentMap::default();

        let a = node_map.insert_full(10, (NO_PARENT, 0)).0;
        let b = node_map.insert_full(20, (a, 1)).0;
        let c = node_map.insert_full(30, (a, 1)).0;
        let d = node_map.insert_full(40, (c, 2)).0;

        assert_eq!(trace_path(&node_map, d).unwrap(), vec![10, 30, 40]);
        assert_eq!(trace_path(&node_map, b).unwrap(), vec![10, 20]);
        assert_eq!(trace_path(&node_map, a).unwrap(), vec![10]);
    }

    #[test]
    fn test_trace_path_rejects_bad_index() {
        let mut node_map: ParentMap<i64, usize> = ParentMap::default();
        node_map.insert_full(1, (NO_PARENT, 0));
        node_map.insert_full(2, (7, 1));

        assert!(matches!(trace_path(&node_map, 1), Err(PathPlannerError::NoPathFound)));
        assert!(matches!(trace_path(&node_map, 5), Err(PathPlannerError::NoPathFound)));
    }

    #[test]
    fn test_trace_path_rejects_cycle() {
        let mut node_map: ParentMap<i64, usize> = ParentMap::default();
        node_map.insert_full(1, (1, 0));
        node_map.insert_full(2, (0, 1));

        assert!(matches!(trace_path(&node_map, 1), Err(PathPlannerError::NoPathFound)));
    }
}
