use std::collections::BTreeMap;

use super::error::StoreError;
use super::sample::Sample;

/// Number of hourly snapshots in the window.
pub const HOURS: u8 = 24;

/// Per-hour sample sets, populated in any order. Absent hours read as empty.
#[derive(Debug, Default, Clone)]
pub struct HourBucketStore {
    buckets: BTreeMap<u8, Vec<Sample>>,
}

impl HourBucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hour: u8, samples: Vec<Sample>) -> Result<(), StoreError> {
        if hour >= HOURS {
            return Err(StoreError::HourOutOfRange(hour));
        }
        if self.buckets.contains_key(&hour) {
            return Err(StoreError::AlreadyPopulated(hour));
        }
        log::debug!("hour {} populated with {} samples", hour, samples.len());
        self.buckets.insert(hour, samples);
        Ok(())
    }

    pub fn get(&self, hour: u8) -> &[Sample] {
        self.buckets.get(&hour).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.buckets.contains_key(&hour)
    }

    /// Populated hours in ascending order.
    pub fn hours(&self) -> impl Iterator<Item = u8> + '_ {
        self.buckets.keys().copied()
    }

    pub fn bucket_sizes(&self) -> BTreeMap<u8, usize> {
        self.buckets.iter().map(|(h, s)| (*h, s.len())).collect()
    }

    pub fn total_samples(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(hour: u8) -> Sample {
        Sample::new(1.0, 2.0, 10.0, Utc::now(), hour)
    }

    #[test]
    fn absent_hours_are_empty() {
        let store = HourBucketStore::new();
        assert!(store.get(7).is_empty());
        assert!(!store.contains(7));
        assert!(store.is_empty());
    }

    #[test]
    fn out_of_order_population() {
        let mut store = HourBucketStore::new();
        store.insert(12, vec![sample(12), sample(12)]).unwrap();
        store.insert(3, vec![sample(3)]).unwrap();

        assert_eq!(store.hours().collect::<Vec<_>>(), vec![3, 12]);
        assert_eq!(store.get(12).len(), 2);
        assert_eq!(store.total_samples(), 3);
    }

    #[test]
    fn rejects_second_population_and_bad_hour() {
        let mut store = HourBucketStore::new();
        store.insert(0, vec![sample(0)]).unwrap();

        assert!(matches!(
            store.insert(0, vec![]),
            Err(StoreError::AlreadyPopulated(0))
        ));
        assert!(matches!(
            store.insert(24, vec![]),
            Err(StoreError::HourOutOfRange(24))
        ));
        assert_eq!(store.get(0).len(), 1);
    }
}
