//! Trip-driven calibration of edge travel times
//!
//! Matches raw trips onto the graph, attributes their elapsed time to the
//! edges of precomputed shortest routes, reduces per-edge observations to
//! medians and clips the derived speeds by population statistics. The
//! result is a fully annotated graph: every edge ends up with a speed and
//! a consistent `time = length / speed`, imputed from the population mean
//! where observations were too sparse.

mod aggregate;
mod clip;
mod matcher;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use aggregate::{CalibrationResult, EdgeKey, EdgeSamples};
pub use matcher::{MatchStats, MatchedTrip};

use crate::model::{RoadGraph, SpatialIndex, TripData};
use crate::routing::RouteTable;
use crate::Error;

/// Tunables for one calibration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Trips snapped further than this from either endpoint are dropped.
    pub max_match_distance: f64,
    /// Trips shorter than this many time units are dropped.
    pub min_trip_duration: f64,
    /// Edges with fewer samples fall back to the imputed mean speed.
    pub min_ride_count: usize,
    /// Half-width of the clipping band in standard deviations.
    pub clip_std_multiplier: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            max_match_distance: 300.0,
            min_trip_duration: 20.0,
            min_ride_count: 10,
            clip_std_multiplier: 2.0,
        }
    }
}

/// Exclusion and coverage counters for one calibration run. Exclusions
/// never abort a run; they are tallied here for observability.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationStats {
    pub trips_total: usize,
    pub accepted: usize,
    pub rejected_distance: usize,
    pub rejected_duration: usize,
    pub degenerate: usize,
    pub route_missing: usize,
    pub calibrated_edges: usize,
}

/// Outcome of a calibration run.
#[derive(Debug)]
pub struct Calibration {
    /// Input graph with every edge's speed and time recomputed.
    pub graph: RoadGraph,
    /// Median travel time for every sufficiently observed edge.
    pub medians: CalibrationResult,
    pub stats: CalibrationStats,
}

/// Calibrates edge travel times of `graph` from `trips`.
///
/// `table` must have been built for this exact graph (see
/// [`crate::routing::load_or_build_route_table`]).
///
/// # Errors
///
/// Returns [`Error::NoPointsFound`] if the graph has no nodes to snap to.
pub fn calibrate(
    graph: &RoadGraph,
    table: &RouteTable,
    trips: &TripData,
    config: &CalibrationConfig,
) -> Result<Calibration, Error> {
    info!("Calibrating edge times from {} trips", trips.len());
    let index = SpatialIndex::new(graph);
    let (matched, match_stats) = matcher::match_trips(trips, &index, config)?;

    let samples = EdgeSamples::accumulate(graph, table, &matched);
    let route_missing = samples.route_missing;
    let medians = samples.reduce(config.min_ride_count);

    let annotated = clip::clip_speeds(graph, &medians, config.clip_std_multiplier);

    let stats = CalibrationStats {
        trips_total: trips.len(),
        accepted: match_stats.accepted,
        rejected_distance: match_stats.rejected_distance,
        rejected_duration: match_stats.rejected_duration,
        degenerate: match_stats.degenerate,
        route_missing,
        calibrated_edges: medians.len(),
    };
    debug!(
        "Matched {}/{} trips ({} far, {} short, {} degenerate, {} unrouted); {} edges calibrated",
        stats.accepted,
        stats.trips_total,
        stats.rejected_distance,
        stats.rejected_duration,
        stats.degenerate,
        stats.route_missing,
        stats.calibrated_edges
    );

    Ok(Calibration {
        graph: annotated,
        medians,
        stats,
    })
}
