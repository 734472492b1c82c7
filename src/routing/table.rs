//! All-pairs shortest-route table

use hashbrown::HashMap;
use log::info;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::dijkstra::shortest_paths;
use crate::model::RoadGraph;

/// Precomputed shortest path (by edge length) between every ordered pair
/// of reachable nodes, keyed source → target. Unreachable pairs are
/// absent. Once built the table is immutable and safe to share across
/// reader threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: HashMap<u32, HashMap<u32, Vec<u32>>>,
}

impl RouteTable {
    /// Node sequence of the shortest route, inclusive of both endpoints.
    pub fn route(&self, from: NodeIndex, to: NodeIndex) -> Option<&[u32]> {
        self.routes
            .get(&(from.index() as u32))
            .and_then(|targets| targets.get(&(to.index() as u32)))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether the table's node domain exactly equals the graph's node
    /// set. A table from a different graph version must never be used.
    pub fn domain_matches(&self, graph: &RoadGraph) -> bool {
        let node_count = graph.node_count() as u32;
        if self.routes.len() != node_count as usize {
            return false;
        }
        self.routes.iter().all(|(source, targets)| {
            *source < node_count && targets.keys().all(|target| *target < node_count)
        })
    }
}

/// Computes the all-pairs shortest-route table, one Dijkstra per source
/// node, parallelized across sources.
pub fn build_route_table(graph: &RoadGraph) -> RouteTable {
    info!(
        "Computing shortest routes between all pairs of {} nodes",
        graph.node_count()
    );
    let sources: Vec<NodeIndex> = graph.graph.node_indices().collect();
    // Per-source shards are computed in parallel and merged in source order.
    let shards: Vec<(u32, HashMap<u32, Vec<u32>>)> = sources
        .into_par_iter()
        .map(|source| {
            let targets = shortest_paths(graph, source)
                .into_iter()
                .map(|(target, path)| {
                    let path = path.into_iter().map(|n| n.index() as u32).collect();
                    (target.index() as u32, path)
                })
                .collect();
            (source.index() as u32, targets)
        })
        .collect();
    RouteTable {
        routes: shards.into_iter().collect(),
    }
}
