//! Place names resolved to graph nodes.
//!
//! Names are matched case-insensitively. Places given as coordinates are
//! snapped to the nearest intersection through a kd-tree over the graph's
//! node positions.

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use tracing::debug;

use crate::collections::FxIndexMap;
use crate::errors::PathPlannerError;
use crate::geometry::Point;
use crate::graph::{Graph, NodeId};


/// Long-lived mapping from place names to nodes
pub struct LocationIndex {
    places: FxIndexMap<String, (String, NodeId)>, // normalized name -> (display name, node)
    tree: KdTree<f64, NodeId, [f64; 2]>, // node position -> node
}

impl Default for LocationIndex {
    fn default() -> Self {
        Self {
            places: FxIndexMap::default(),
            tree: KdTree::new(2),
        }
    }
}

impl LocationIndex {

    pub fn new() -> Self {
        Self::default()
    }

    /// Index the positions of `nodes`, skipping those without coordinates
    pub fn with_nodes<G, I>(graph: &G, nodes: I) -> Result<Self, PathPlannerError>
    where
        G: Graph,
        I: IntoIterator<Item = NodeId>,
    {
        let mut index = Self::new();
        for node in nodes {
            if let Some(point) = graph.coordinates(node) {
                index.tree.add([point.x, point.y], node)?;
            }
        }
        debug!(nodes = index.tree.size(), "location index built");
        Ok(index)
    }

    /// Name a node, replacing any place with the same name
    pub fn register(&mut self, name: &str, node: NodeId) {
        self.places.insert(normalize(name), (name.trim().to_string(), node));
    }

    /// Name the intersection closest to `point`
    pub fn register_at(&mut self, name: &str, point: Point) -> Result<NodeId, PathPlannerError> {
        let node = self.nearest_node(point)?;
        debug!(name, node, "place snapped to nearest intersection");
        self.register(name, node);
        Ok(node)
    }

    /// Node for a place name, ignoring case and surrounding whitespace
    pub fn resolve(&self, name: &str) -> Result<NodeId, PathPlannerError> {
        self.places.get(&normalize(name))
            .map(|&(_, node)| node)
            .ok_or_else(|| PathPlannerError::UnknownLocation(name.trim().to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.places.contains_key(&normalize(name))
    }

    /// Display names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.places.values().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Indexed node closest to `point`
    pub fn nearest_node(&self, point: Point) -> Result<NodeId, PathPlannerError> {
        let nearest = self.tree.nearest(&[point.x, point.y], 1, &squared_euclidean)?;
        nearest.first()
            .map(|&(_, &node)| node)
            .ok_or_else(|| PathPlannerError::UnknownLocation(format!("no intersection near ({}, {})", point.x, point.y)))
    }
}


fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    fn graph() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_intersection(1, 38.74, 9.01);
        graph.add_intersection(2, 38.76, 9.03);
        graph.add_intersection(3, 38.80, 8.98);
        graph.add_road(1, 4, 10.0); // 4 has no coordinates
        graph
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let mut index = LocationIndex::new();
        index.register("Piassa", 7);

        assert_eq!(index.resolve("PIASSA").unwrap(), 7);
        assert_eq!(index.resolve("  piassa ").unwrap(), 7);
        assert!(index.contains("piAssa"));
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["Piassa"]);
    }

    #[test]
    fn test_unknown_location() {
        let index = LocationIndex::new();
        let error = index.resolve("Nowhere").unwrap_err();
        assert!(matches!(error, PathPlannerError::UnknownLocation(ref name) if name == "Nowhere"));
        assert_eq!(error.to_string(), "Unknown location: Nowhere");
    }

    #[test]
    fn test_nearest_node() {
        let graph = graph();
        let index = LocationIndex::with_nodes(&graph, graph.nodes()).unwrap();

        assert_eq!(index.nearest_node(Point::new(38.759, 9.029)).unwrap(), 2);
        assert_eq!(index.nearest_node(Point::new(38.81, 8.97)).unwrap(), 3);
    }

    #[test]
    fn test_register_at_snaps_to_intersection() {
        let graph = graph();
        let mut index = LocationIndex::with_nodes(&graph, graph.nodes()).unwrap();

        let node = index.register_at("Meskel Square", Point::new(38.741, 9.012)).unwrap();
        assert_eq!(node, 1);
        assert_eq!(index.resolve("meskel square").unwrap(), 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_nearest_node_on_empty_index() {
        let index = LocationIndex::new();
        assert!(index.nearest_node(Point::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_nearest_node_rejects_nan() {
        let graph = graph();
        let index = LocationIndex::with_nodes(&graph, graph.nodes()).unwrap();
        assert!(matches!(index.nearest_node(Point::new(f64::NAN, 0.0)), Err(PathPlannerError::KdTreeError(_))));
    }
}
