//! Raw trip records in column layout

use serde::{Deserialize, Serialize};

use crate::Error;

/// Trip observations as equal-length parallel columns; row `i` across all
/// four columns describes one trip. Timestamps are monotonic integer time
/// units; positions are planar coordinates in the graph's CRS.
///
/// No ordering of pickup against dropoff is assumed here - the duration
/// filter during matching is the sole safeguard against corrupt rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripData {
    pub pickup_time: Vec<u64>,
    pub dropoff_time: Vec<u64>,
    pub pickup_xy: Vec<[f64; 2]>,
    pub dropoff_xy: Vec<[f64; 2]>,
}

impl TripData {
    /// # Errors
    ///
    /// Returns [`Error::MismatchedColumns`] if the columns differ in length.
    pub fn new(
        pickup_time: Vec<u64>,
        dropoff_time: Vec<u64>,
        pickup_xy: Vec<[f64; 2]>,
        dropoff_xy: Vec<[f64; 2]>,
    ) -> Result<Self, Error> {
        let len = pickup_time.len();
        if dropoff_time.len() != len || pickup_xy.len() != len || dropoff_xy.len() != len {
            return Err(Error::MismatchedColumns);
        }
        Ok(Self {
            pickup_time,
            dropoff_time,
            pickup_xy,
            dropoff_xy,
        })
    }

    pub fn len(&self) -> usize {
        self.pickup_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickup_time.is_empty()
    }

    pub fn push(&mut self, record: TripRecord) {
        self.pickup_time.push(record.pickup_time);
        self.dropoff_time.push(record.dropoff_time);
        self.pickup_xy.push(record.pickup_xy);
        self.dropoff_xy.push(record.dropoff_xy);
    }

    pub fn iter(&self) -> impl Iterator<Item = TripRecord> + '_ {
        (0..self.len()).map(|i| TripRecord {
            pickup_time: self.pickup_time[i],
            dropoff_time: self.dropoff_time[i],
            pickup_xy: self.pickup_xy[i],
            dropoff_xy: self.dropoff_xy[i],
        })
    }
}

/// One trip, as a row view over [`TripData`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRecord {
    pub pickup_time: u64,
    pub dropoff_time: u64,
    pub pickup_xy: [f64; 2],
    pub dropoff_xy: [f64; 2],
}

impl TripRecord {
    /// Trip duration; a dropoff earlier than its pickup saturates to zero.
    pub fn elapsed(&self) -> u64 {
        self.dropoff_time.saturating_sub(self.pickup_time)
    }
}
