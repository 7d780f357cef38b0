use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use super::levels::PressureLevel;
use super::wind::WindVector;

pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Forecast lookup key: 0.25° lat/lon cell, epoch hour and pressure level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastKey {
    lat_quarter: i32,
    lon_quarter: i32,
    epoch_hour: i64,
    level: PressureLevel,
}

impl ForecastKey {
    pub fn new(lat: f64, lon: f64, hour: DateTime<Utc>, level: PressureLevel) -> Self {
        Self {
            lat_quarter: (lat * 4.0).round() as i32,
            lon_quarter: (lon * 4.0).round() as i32,
            epoch_hour: hour.timestamp().div_euclid(3600),
            level,
        }
    }
}

/// Bounded LRU of fetched forecast vectors, shared by concurrent lookups.
pub struct ForecastCache {
    entries: Mutex<LruCache<ForecastKey, WindVector>>,
}

impl ForecastCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &ForecastKey) -> Option<WindVector> {
        self.entries.lock().get(key).copied()
    }

    pub fn insert(&self, key: ForecastKey, value: WindVector) {
        self.entries.lock().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn nearby_points_share_a_key() {
        let a = ForecastKey::new(10.01, 20.02, hour(), PressureLevel::Hpa250);
        let b = ForecastKey::new(9.95, 20.1, hour(), PressureLevel::Hpa250);
        let c = ForecastKey::new(9.95, 20.1, hour(), PressureLevel::Hpa300);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = ForecastCache::new(2);
        let keys: Vec<_> = (0..3)
            .map(|i| ForecastKey::new(f64::from(i), 0.0, hour(), PressureLevel::Hpa500))
            .collect();
        let wind = WindVector { u: 1.0, v: 2.0 };

        cache.insert(keys[0], wind);
        cache.insert(keys[1], wind);
        assert!(cache.get(&keys[0]).is_some());
        cache.insert(keys[2], wind);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&keys[1]).is_none());
        assert_eq!(cache.get(&keys[0]), Some(wind));
    }
}
