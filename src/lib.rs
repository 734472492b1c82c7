//! Calibration of road-network edge travel times from recorded trips.
//!
//! Given a directed road graph with planar node coordinates and a set of
//! raw trip records (pickup/dropoff time and position), this crate snaps
//! trip endpoints to graph nodes, reconstructs the route each trip most
//! likely took using a precomputed all-pairs shortest-path table, and
//! reduces the per-edge travel-time observations to robust medians. A
//! final clipping pass bounds the derived speeds by population statistics
//! and imputes the population mean for edges without enough observations,
//! so every edge of the annotated output graph carries a speed and time.

pub mod calibration;
pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;

pub use calibration::{
    Calibration, CalibrationConfig, CalibrationResult, CalibrationStats, EdgeKey, calibrate,
};
pub use error::Error;
pub use model::{DEFAULT_SPEED, RoadEdge, RoadGraph, RoadNode, SpatialIndex, TripData, TripRecord};
pub use routing::{
    BlobStore, FsBlobStore, MemoryBlobStore, RouteTable, build_route_table,
    load_or_build_route_table,
};

/// Identifier of a road graph node.
pub type RoadNodeId = petgraph::graph::NodeIndex;
