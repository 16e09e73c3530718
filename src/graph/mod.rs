//! Graph abstraction used by every search algorithm.
//!
//! Algorithms only read the graph through [`Graph`], so any weighted graph
//! backend can be plugged in. [`RoadGraph`] is the in-memory undirected
//! implementation used by the binary and the tests.

pub mod grid;

use crate::collections::{FxHashSet, FxIndexMap};
use crate::geometry::Point;


/// Opaque node identifier, e.g. an OSM node id
pub type NodeId = i64;

/// Numeric attributes attached to a node or edge
pub type Attributes = FxIndexMap<String, f64>;

/// Edge attribute holding the travel cost
pub const LENGTH: &str = "length";
/// Node attribute holding the longitude
pub const X: &str = "x";
/// Node attribute holding the latitude
pub const Y: &str = "y";

/// Cost used for edges without a usable `length`
pub const DEFAULT_EDGE_COST: f64 = 1.0;


/// Read-only view over a weighted graph
pub trait Graph {

    /// Nodes adjacent to `node`, in a deterministic order
    /// Unknown nodes have no neighbors
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;

    fn node_exists(&self, node: NodeId) -> bool;

    fn edge_exists(&self, u: NodeId, v: NodeId) -> bool;

    fn node_attributes(&self, node: NodeId) -> Option<&Attributes>;

    fn edge_attributes(&self, u: NodeId, v: NodeId) -> Option<&Attributes>;

    /// Graph induced by `nodes`, unknown ids are ignored
    fn subgraph(&self, nodes: &[NodeId]) -> Self
    where
        Self: Sized;

    /// Cost of travelling the edge u -> v
    /// Falls back to unit cost when the edge has no valid `length`
    fn edge_cost(&self, u: NodeId, v: NodeId) -> f64 {
        self.edge_attributes(u, v)
            .and_then(|attrs| attrs.get(LENGTH).copied())
            .filter(|length| length.is_finite() && *length >= 0.0)
            .unwrap_or(DEFAULT_EDGE_COST)
    }

    /// Edge-cost units per unit of coordinate distance
    /// Scales straight-line estimates so they compare with edge costs
    fn distance_scale(&self) -> f64 {
        1.0
    }

    /// Geographic position of a node, if it carries both `x` and `y`
    fn coordinates(&self, node: NodeId) -> Option<Point> {
        let attrs = self.node_attributes(node)?;
        let point = Point::new(*attrs.get(X)?, *attrs.get(Y)?);
        point.is_finite().then_some(point)
    }
}


/// Undirected road network kept in memory
/// Every edge is stored once per direction with the same attributes
#[derive(Clone, Debug)]
pub struct RoadGraph {
    nodes: FxIndexMap<NodeId, Attributes>,
    adjacency: FxIndexMap<NodeId, FxIndexMap<NodeId, Attributes>>,
    distance_scale: f64,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self {
            nodes: FxIndexMap::default(),
            adjacency: FxIndexMap::default(),
            distance_scale: 1.0,
        }
    }
}

impl RoadGraph {

    pub fn new() -> Self {
        Self::default()
    }

    /// Declare how many cost units one unit of coordinate distance is worth,
    /// e.g. metres per degree for lon/lat nodes with lengths in metres
    /// Non-finite or non-positive scales are ignored
    pub fn set_distance_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.distance_scale = scale;
        }
    }

    /// Add a node, merging attributes into an existing one
    pub fn add_node(&mut self, node: NodeId, attributes: Attributes) {
        self.nodes.entry(node).or_default().extend(attributes);
        self.adjacency.entry(node).or_default();
    }

    /// Add a node located at longitude `x`, latitude `y`
    pub fn add_intersection(&mut self, node: NodeId, x: f64, y: f64) {
        let mut attributes = Attributes::default();
        attributes.insert(X.to_string(), x);
        attributes.insert(Y.to_string(), y);
        self.add_node(node, attributes);
    }

    /// Add an undirected edge, creating missing endpoints without attributes
    /// Adding an existing edge replaces its attributes
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, attributes: Attributes) {
        self.add_node(u, Attributes::default());
        self.add_node(v, Attributes::default());
        self.adjacency.entry(u).or_default().insert(v, attributes.clone());
        self.adjacency.entry(v).or_default().insert(u, attributes);
    }

    /// Add an undirected road of the given length
    pub fn add_road(&mut self, u: NodeId, v: NodeId, length: f64) {
        let mut attributes = Attributes::default();
        attributes.insert(LENGTH.to_string(), length);
        self.add_edge(u, v, attributes);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges, self loops counted once
    pub fn edge_count(&self) -> usize {
        let directed: usize = self.adjacency.values().map(|adjacent| adjacent.len()).sum();
        let loops = self.adjacency.iter()
            .filter(|(u, adjacent)| adjacent.contains_key(*u))
            .count();
        (directed - loops) / 2 + loops
    }

    /// Node ids in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }
}

impl Graph for RoadGraph {

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.adjacency.get(&node)
            .map(|adjacent| adjacent.keys().copied().collect())
            .unwrap_or_default()
    }

    fn node_exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn edge_exists(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_attributes(u, v).is_some()
    }

    fn node_attributes(&self, node: NodeId) -> Option<&Attributes> {
        self.nodes.get(&node)
    }

    fn edge_attributes(&self, u: NodeId, v: NodeId) -> Option<&Attributes> {
        self.adjacency.get(&u)?.get(&v)
    }

    fn distance_scale(&self) -> f64 {
        self.distance_scale
    }

    fn subgraph(&self, nodes: &[NodeId]) -> Self {
        let keep: FxHashSet<NodeId> = nodes.iter().copied()
            .filter(|node| self.node_exists(*node))
            .collect();

        let mut subgraph = RoadGraph::new();
        subgraph.distance_scale = self.distance_scale;
        // walk in our own insertion order so the subgraph enumerates neighbors the same way
        for (node, attributes) in self.nodes.iter().filter(|(node, _)| keep.contains(*node)) {
            subgraph.add_node(*node, attributes.clone());
        }
        for (u, adjacent) in self.adjacency.iter().filter(|(u, _)| keep.contains(*u)) {
            for (v, attributes) in adjacent.iter().filter(|(v, _)| keep.contains(*v)) {
                subgraph.adjacency.entry(*u).or_default().insert(*v, attributes.clone());
            }
        }
        subgraph
    }
}
