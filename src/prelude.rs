// Re-export key components
pub use crate::calibration::{
    Calibration, CalibrationConfig, CalibrationResult, CalibrationStats, EdgeKey, EdgeSamples,
    MatchStats, MatchedTrip, calibrate,
};
pub use crate::routing::{
    BlobStore, FsBlobStore, MemoryBlobStore, MinQueue, RouteTable, build_route_table,
    load_or_build_route_table, route_table_key,
};

// Core types for the road network
pub use crate::model::{DEFAULT_SPEED, RoadEdge, RoadGraph, RoadNode, SpatialIndex};
pub use crate::model::{TripData, TripRecord};
pub use crate::{Error, RoadNodeId};
