//! Content-keyed persistence for route tables

use std::path::PathBuf;
use std::sync::Mutex;

use hashbrown::HashMap;
use log::{info, warn};

use super::table::{RouteTable, build_route_table};
use crate::Error;
use crate::model::RoadGraph;

/// Persistent blob store: string fingerprint key → opaque bytes.
pub trait BlobStore {
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn put(&self, key: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Blob store backed by one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    directory: PathBuf,
}

impl FsBlobStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl BlobStore for FsBlobStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.directory.join(key)).ok()
    }

    fn put(&self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(self.directory.join(key), bytes)
    }
}

/// In-memory blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .ok()
            .and_then(|blobs| blobs.get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        match self.blobs.lock() {
            Ok(mut blobs) => {
                blobs.insert(key.to_owned(), bytes.to_vec());
                Ok(())
            }
            Err(_) => Err(std::io::Error::other("blob store mutex poisoned")),
        }
    }
}

/// Cache key for a graph's route table, derived from the structural
/// fingerprint of the full node/edge attribute set.
pub fn route_table_key(graph: &RoadGraph) -> String {
    format!("route-table-{:016x}.json", graph.fingerprint())
}

/// Loads the route table cached for `graph`, or computes and persists it.
///
/// A cached table whose node domain does not match the current graph, or
/// that fails to decode, is treated as a cache miss and recomputed; a
/// partial or stale table is never returned.
///
/// # Errors
///
/// Returns an error if a freshly computed table cannot be serialized or
/// written to the store.
pub fn load_or_build_route_table(
    graph: &RoadGraph,
    store: &dyn BlobStore,
) -> Result<RouteTable, Error> {
    let key = route_table_key(graph);
    if let Some(bytes) = store.get(&key) {
        match serde_json::from_slice::<RouteTable>(&bytes) {
            Ok(table) if table.domain_matches(graph) => {
                info!("Loaded route table from cache under \"{key}\"");
                return Ok(table);
            }
            Ok(_) => {
                warn!("Cached route table \"{key}\" does not cover the current node set, recomputing");
            }
            Err(e) => {
                warn!("Cached route table \"{key}\" failed to decode ({e}), recomputing");
            }
        }
    }
    let table = build_route_table(graph);
    store.put(&key, &serde_json::to_vec(&table)?)?;
    info!("Saved route table to cache under \"{key}\"");
    Ok(table)
}
