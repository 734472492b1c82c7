//! Nearest-neighbor index over graph node coordinates

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use rstar::{PointDistance, RTree, primitives::GeomWithData};

use crate::Error;
use crate::model::RoadGraph;

/// Node coordinate tagged with its graph index for R-tree lookups.
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Read-only nearest-neighbor index over node coordinates.
///
/// Built once per graph with a bulk load; a single build serves
/// arbitrarily many queries without mutation.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn new(graph: &RoadGraph) -> Self {
        let points = graph
            .graph
            .node_indices()
            .map(|node| {
                let point = graph.graph[node].geometry;
                IndexedPoint::new([point.x(), point.y()], node)
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Closest node to `point` and its Euclidean distance.
    ///
    /// The distance is exactly 0 when `point` coincides with an indexed
    /// node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPointsFound`] if the index is empty.
    pub fn nearest(&self, point: [f64; 2]) -> Result<(NodeIndex, f64), Error> {
        let found = self
            .tree
            .nearest_neighbor(&point)
            .ok_or(Error::NoPointsFound)?;
        Ok((found.data, found.distance_2(&point).sqrt()))
    }

    /// Independent per-point nearest matches, order preserving.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPointsFound`] if the index is empty.
    pub fn nearest_batch(&self, points: &[[f64; 2]]) -> Result<Vec<(NodeIndex, f64)>, Error> {
        points.par_iter().map(|point| self.nearest(*point)).collect()
    }

    /// All nodes within `radius` of `point`.
    pub fn radius_query(&self, point: [f64; 2], radius: f64) -> Vec<NodeIndex> {
        self.tree
            .locate_within_distance(point, radius * radius)
            .map(|found| found.data)
            .collect()
    }

    /// The `k` closest nodes to `point`, ascending by distance.
    pub fn k_nearest(&self, point: [f64; 2], k: usize) -> Vec<(NodeIndex, f64)> {
        self.tree
            .nearest_neighbor_iter_with_distance_2(&point)
            .take(k)
            .map(|(found, distance_2)| (found.data, distance_2.sqrt()))
            .collect()
    }
}
