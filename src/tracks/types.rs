use serde::{Serialize, Serializer};
use std::fmt;

use crate::buckets::Sample;

/// Identity of an inferred track: the left hour of the pair it started in and
/// the index of its first sample within that hour's sorted bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId {
    pub origin_hour: u8,
    pub origin_index: usize,
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}-{}", self.origin_hour, self.origin_index)
    }
}

impl Serialize for TrackId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    pub track: TrackId,
    pub seq: usize,
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.track, self.seq)
    }
}

impl Serialize for SegmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub samples: Vec<Sample>,
}

/// Directed association of `left[left_index]` (hour h) with `right[right_index]` (hour h+1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub left_index: usize,
    pub right_index: usize,
    pub distance_km: f64,
}
