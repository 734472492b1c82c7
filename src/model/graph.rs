//! Road network components - nodes, edges and the graph wrapper

use geo::Point;
use petgraph::Directed;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use xxhash_rust::xxh3::Xxh3;

/// Default edge speed of 50 km/h in [m/s].
pub const DEFAULT_SPEED: f64 = 50.0 / 3.6;

/// Road graph node
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// Node coordinates in a planar (projected) CRS
    pub geometry: Point<f64>,
}

/// Road graph edge (street segment)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Segment length in meters
    pub length: f64,
    /// Travel speed in m/s
    pub speed: f64,
    /// Traversal time in seconds, kept equal to `length / speed`
    pub time: f64,
}

impl RoadEdge {
    pub fn new(length: f64) -> Self {
        Self::with_speed(length, DEFAULT_SPEED)
    }

    pub fn with_speed(length: f64, speed: f64) -> Self {
        Self {
            length,
            speed,
            time: length / speed,
        }
    }

    pub(crate) fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
        self.time = self.length / speed;
    }
}

/// Directed road network with planar node coordinates.
///
/// Parallel edges between the same node pair are allowed and kept;
/// length-based computations always select the shortest parallel edge
/// through [`RoadGraph::shortest_edge_length`].
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    pub graph: Graph<RoadNode, RoadEdge, Directed>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, x: f64, y: f64) -> NodeIndex {
        self.graph.add_node(RoadNode {
            geometry: Point::new(x, y),
        })
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, length: f64) -> EdgeIndex {
        self.graph.add_edge(from, to, RoadEdge::new(length))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn point(&self, node: NodeIndex) -> Option<Point<f64>> {
        self.graph.node_weight(node).map(|n| n.geometry)
    }

    /// Length of the shortest parallel edge from `a` to `b`, if any exists.
    pub fn shortest_edge_length(&self, a: NodeIndex, b: NodeIndex) -> Option<f64> {
        self.graph
            .edges_connecting(a, b)
            .map(|edge| edge.weight().length)
            .min_by(f64::total_cmp)
    }

    /// Structural hash over the full node/edge attribute set.
    ///
    /// Covers every node coordinate and every edge's endpoints and length,
    /// so graphs of equal size but different topology hash differently.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(&(self.graph.node_count() as u64).to_le_bytes());
        for node in self.graph.node_weights() {
            hasher.update(&node.geometry.x().to_bits().to_le_bytes());
            hasher.update(&node.geometry.y().to_bits().to_le_bytes());
        }
        hasher.update(&(self.graph.edge_count() as u64).to_le_bytes());
        for edge in self.graph.edge_references() {
            hasher.update(&(edge.source().index() as u64).to_le_bytes());
            hasher.update(&(edge.target().index() as u64).to_le_bytes());
            hasher.update(&edge.weight().length.to_bits().to_le_bytes());
        }
        hasher.digest()
    }
}
