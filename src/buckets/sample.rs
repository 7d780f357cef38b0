use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::geodesy::LatLon;

/// One observed position. Samples carry no identity across hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    pub alt_km: f64,
    pub timestamp: DateTime<Utc>,
    pub hour: u8,
}

impl Sample {
    pub fn new(lat: f64, lon: f64, alt_km: f64, timestamp: DateTime<Utc>, hour: u8) -> Self {
        Self {
            lat,
            lon,
            alt_km,
            timestamp,
            hour,
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    /// Timestamp, then latitude, then longitude.
    pub fn linking_order(&self, other: &Sample) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.lat.total_cmp(&other.lat))
            .then_with(|| self.lon.total_cmp(&other.lon))
    }

    /// Hour-offset, then timestamp.
    pub fn track_order(&self, other: &Sample) -> Ordering {
        self.hour
            .cmp(&other.hour)
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}
