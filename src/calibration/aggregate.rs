//! Per-edge travel-time samples and their median reduction

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::matcher::MatchedTrip;
use crate::model::RoadGraph;
use crate::routing::RouteTable;

/// Ordered node pair identifying all parallel edges between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey(pub u32, pub u32);

impl EdgeKey {
    pub fn new(from: NodeIndex, to: NodeIndex) -> Self {
        Self(from.index() as u32, to.index() as u32)
    }
}

/// Ephemeral flat accumulator of inferred travel-time samples per edge.
/// Built from matched trips, consumed by [`EdgeSamples::reduce`].
#[derive(Debug, Default)]
pub struct EdgeSamples {
    samples: HashMap<EdgeKey, Vec<f64>>,
    pub route_missing: usize,
}

impl EdgeSamples {
    /// Attributes each trip's elapsed time to the edges of its assumed
    /// shortest route, at a constant speed along the whole route. Trips
    /// with no precomputed route are counted and skipped.
    pub fn accumulate(
        graph: &RoadGraph,
        table: &RouteTable,
        trips: &[MatchedTrip],
    ) -> Self {
        let mut acc = Self::default();
        for trip in trips {
            let Some(route) = table.route(trip.from, trip.to) else {
                acc.route_missing += 1;
                continue;
            };
            let Some(hops) = hop_lengths(graph, route) else {
                // The table references an edge the graph no longer has.
                acc.route_missing += 1;
                continue;
            };
            let route_length: f64 = hops.iter().map(|(_, length)| length).sum();
            if route_length <= 0.0 {
                continue;
            }
            // Assume the vehicle drove the whole route at constant speed.
            let speed = route_length / trip.elapsed;
            for (key, length) in hops {
                acc.samples.entry(key).or_default().push(length / speed);
            }
        }
        acc
    }

    pub fn sample_count(&self, key: EdgeKey) -> usize {
        self.samples.get(&key).map_or(0, Vec::len)
    }

    /// Reduces each edge's samples to their median, dropping edges with
    /// fewer than `min_ride_count` observations. The median is robust to
    /// single-trip detours and outliers.
    pub fn reduce(self, min_ride_count: usize) -> CalibrationResult {
        let mut medians = HashMap::new();
        for (key, mut samples) in self.samples {
            if samples.len() < min_ride_count.max(1) {
                continue;
            }
            samples.sort_by(f64::total_cmp);
            medians.insert(key, median_of_sorted(&samples));
        }
        CalibrationResult { medians }
    }
}

/// Shortest parallel edge length for every consecutive node pair on the
/// route, or `None` if any hop has no edge in the graph.
fn hop_lengths(graph: &RoadGraph, route: &[u32]) -> Option<Vec<(EdgeKey, f64)>> {
    route
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| {
            let from = NodeIndex::new(a as usize);
            let to = NodeIndex::new(b as usize);
            graph
                .shortest_edge_length(from, to)
                .map(|length| (EdgeKey(a, b), length))
        })
        .collect()
}

fn median_of_sorted(samples: &[f64]) -> f64 {
    let mid = samples.len() / 2;
    if samples.len() % 2 == 1 {
        samples[mid]
    } else {
        (samples[mid - 1] + samples[mid]) / 2.0
    }
}

/// Median travel time per edge with enough observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationResult {
    medians: HashMap<EdgeKey, f64>,
}

impl CalibrationResult {
    pub fn median(&self, key: EdgeKey) -> Option<f64> {
        self.medians.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.medians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medians.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, f64)> + '_ {
        self.medians.iter().map(|(&key, &median)| (key, median))
    }
}

// Serialized as a key-sorted entry vector: JSON object keys must be
// strings, and sorting keeps the encoding deterministic.
impl Serialize for CalibrationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(EdgeKey, f64)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CalibrationResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<(EdgeKey, f64)>::deserialize(deserializer)?;
        Ok(Self {
            medians: entries.into_iter().collect(),
        })
    }
}
