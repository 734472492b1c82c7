//! Snapping raw trips to graph nodes

use petgraph::graph::NodeIndex;

use super::CalibrationConfig;
use crate::Error;
use crate::model::{SpatialIndex, TripData};

/// A trip whose endpoints snapped to distinct graph nodes within
/// tolerance.
#[derive(Debug, Clone, Copy)]
pub struct MatchedTrip {
    pub from: NodeIndex,
    pub to: NodeIndex,
    /// Trip duration in time units, always positive.
    pub elapsed: f64,
}

/// Exclusion counters for one matching pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchStats {
    pub accepted: usize,
    pub rejected_distance: usize,
    pub rejected_duration: usize,
    pub degenerate: usize,
}

/// Matches every trip endpoint to its nearest graph node and filters out
/// trips that are too short, snapped too far away, or whose endpoints
/// collapse onto the same node. Exclusions are counted, never errors.
pub(crate) fn match_trips(
    trips: &TripData,
    index: &SpatialIndex,
    config: &CalibrationConfig,
) -> Result<(Vec<MatchedTrip>, MatchStats), Error> {
    let mut matched = Vec::with_capacity(trips.len());
    let mut stats = MatchStats::default();

    for trip in trips.iter() {
        let elapsed = trip.elapsed();
        if (elapsed as f64) < config.min_trip_duration {
            stats.rejected_duration += 1;
            continue;
        }
        let (from, pickup_distance) = index.nearest(trip.pickup_xy)?;
        if pickup_distance > config.max_match_distance {
            stats.rejected_distance += 1;
            continue;
        }
        let (to, dropoff_distance) = index.nearest(trip.dropoff_xy)?;
        if dropoff_distance > config.max_match_distance {
            stats.rejected_distance += 1;
            continue;
        }
        if from == to {
            // Degenerate no-op: zero-length route, contributes no samples.
            stats.degenerate += 1;
            continue;
        }
        stats.accepted += 1;
        matched.push(MatchedTrip {
            from,
            to,
            elapsed: elapsed as f64,
        });
    }

    Ok((matched, stats))
}
