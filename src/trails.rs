//! In-memory trail state for one session: hour buckets as they arrive, the
//! segments of every linked hour pair, and the spatial index over them.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::buckets::{HourBucketStore, Sample, StoreError, HOURS};
use crate::config::Config;
use crate::index::{BBox, SegmentIndex};
use crate::neighbor::{resolve_neighbor, NeighborResult, NeighborSettings};
use crate::tracks::{build_pair_segments, PairSegments, Segment, SegmentId, TrackId};

#[derive(Debug, Clone, Copy)]
pub struct TrailSettings {
    pub max_km_per_hour: f64,
    pub max_reasonable_speed_ms: Option<f64>,
    pub neighbor: NeighborSettings,
}

impl From<&Config> for TrailSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_km_per_hour: config.tracking.max_km_per_hour,
            max_reasonable_speed_ms: config.tracking.max_reasonable_speed_ms,
            neighbor: config.neighbor.settings(),
        }
    }
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Inputs for linking one hour pair, detached from the session so it can run
/// on another thread.
#[derive(Debug, Clone)]
pub struct PairJob {
    pub pair_hour: u8,
    pub left: Vec<Sample>,
    pub right: Vec<Sample>,
    pub max_km_per_hour: f64,
}

impl PairJob {
    pub fn run(self) -> PairSegments {
        build_pair_segments(&self.left, &self.right, self.pair_hour, self.max_km_per_hour)
    }
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub buckets: BTreeMap<u8, usize>,
    pub linked_pairs: Vec<u8>,
    pub segments: usize,
    pub index_items: usize,
}

pub struct TrailSession {
    settings: TrailSettings,
    store: HourBucketStore,
    pair_segments: BTreeMap<u8, Vec<Segment>>,
    segment_lookup: HashMap<SegmentId, (u8, usize)>,
    track_segments: HashMap<TrackId, Vec<SegmentId>>,
    index: SegmentIndex,
}

impl TrailSession {
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            settings,
            store: HourBucketStore::new(),
            pair_segments: BTreeMap::new(),
            segment_lookup: HashMap::new(),
            track_segments: HashMap::new(),
            index: SegmentIndex::new(),
        }
    }

    pub fn store(&self) -> &HourBucketStore {
        &self.store
    }

    pub fn settings(&self) -> TrailSettings {
        self.settings
    }

    /// Stores a bucket and links every pair it completes, in place.
    pub fn ingest_hour(&mut self, hour: u8, samples: Vec<Sample>) -> Result<Vec<u8>, StoreError> {
        let jobs = self.insert_bucket(hour, samples)?;
        let mut linked = Vec::with_capacity(jobs.len());
        for job in jobs {
            let pair = job.run();
            linked.push(pair.pair_hour);
            self.apply_pair(pair);
        }
        Ok(linked)
    }

    /// Stores a bucket and returns a job for every pair that can be linked but
    /// has not been applied yet. The caller runs them and hands the output back
    /// through [`Self::apply_pair`]; a job that never comes back is offered
    /// again on the next call.
    pub fn insert_bucket(
        &mut self,
        hour: u8,
        samples: Vec<Sample>,
    ) -> Result<Vec<PairJob>, StoreError> {
        self.store.insert(hour, samples)?;
        Ok(self.pending_jobs())
    }

    fn pending_jobs(&self) -> Vec<PairJob> {
        (0..HOURS - 1)
            .filter(|pair_hour| self.is_linkable(*pair_hour))
            .map(|pair_hour| PairJob {
                pair_hour,
                left: self.store.get(pair_hour).to_vec(),
                right: self.store.get(pair_hour + 1).to_vec(),
                max_km_per_hour: self.settings.max_km_per_hour,
            })
            .collect()
    }

    fn is_linkable(&self, pair_hour: u8) -> bool {
        !self.pair_segments.contains_key(&pair_hour)
            && !self.store.get(pair_hour).is_empty()
            && !self.store.get(pair_hour + 1).is_empty()
    }

    /// Records one linked pair. A pair already recorded is ignored so its
    /// segments never enter the index twice.
    pub fn apply_pair(&mut self, pair: PairSegments) {
        if self.pair_segments.contains_key(&pair.pair_hour) {
            log::warn!("hour pair {} already linked, skipping", pair.pair_hour);
            return;
        }

        for (i, segment) in pair.segments.iter().enumerate() {
            self.segment_lookup.insert(segment.id, (pair.pair_hour, i));
            self.track_segments
                .entry(segment.track_id)
                .or_default()
                .push(segment.id);
        }
        self.index.insert(pair.index_items);

        log::info!(
            "linked hours {}-{}: {} segments",
            pair.pair_hour,
            pair.pair_hour + 1,
            pair.segments.len()
        );
        self.pair_segments.insert(pair.pair_hour, pair.segments);
    }

    pub fn segment(&self, id: &SegmentId) -> Option<&Segment> {
        let (pair_hour, i) = self.segment_lookup.get(id)?;
        self.pair_segments.get(pair_hour)?.get(*i)
    }

    pub fn pair_segments(&self, pair_hour: u8) -> &[Segment] {
        self.pair_segments
            .get(&pair_hour)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Segments whose box touches `bbox`, starting within the most recent
    /// `max_hours` hours and no faster than the configured speed cap.
    pub fn visible_segments(&self, bbox: &BBox, max_hours: u8) -> Vec<&Segment> {
        let speed_cap = self.settings.max_reasonable_speed_ms.unwrap_or(f64::INFINITY);
        self.index
            .query(bbox)
            .into_iter()
            .filter(|item| item.pair_hour < max_hours)
            .filter_map(|item| self.segment(&item.segment_id))
            .filter(|segment| segment.speed_ms <= speed_cap)
            .collect()
    }

    pub fn track_segment_ids(&self, track: &TrackId) -> &[SegmentId] {
        self.track_segments
            .get(track)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn resolve_neighbor(&self, point: &Sample) -> NeighborResult {
        resolve_neighbor(point, &self.store, self.settings.neighbor)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            buckets: self.store.bucket_sizes(),
            linked_pairs: self.pair_segments.keys().copied().collect(),
            segments: self.segment_lookup.len(),
            index_items: self.index.len(),
        }
    }
}
