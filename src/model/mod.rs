//! Data model for the road network and raw trip records

pub mod graph;
pub mod spatial;
pub mod trips;

pub use graph::{DEFAULT_SPEED, RoadEdge, RoadGraph, RoadNode};
pub use spatial::{IndexedPoint, SpatialIndex};
pub use trips::{TripData, TripRecord};
