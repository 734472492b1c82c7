//! Shortest-route computation and content-keyed persistence

mod cache;
mod dijkstra;
pub mod queue;
mod table;

pub use cache::{
    BlobStore, FsBlobStore, MemoryBlobStore, load_or_build_route_table, route_table_key,
};
pub use queue::MinQueue;
pub use table::{RouteTable, build_route_table};
