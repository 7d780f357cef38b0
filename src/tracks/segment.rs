use serde::Serialize;

use crate::buckets::Sample;
use crate::geodesy::distance_km;
use crate::geojson::{Feature, Geometry};
use crate::index::IndexItem;

use super::linker::tracks_for_pair;
use super::types::{SegmentId, Track, TrackId};

/// Hour-offsets are treated as exactly one hour apart; the actual timestamps
/// are not consulted for elapsed time.
const SECONDS_PER_HOUR_STEP: f64 = 3600.0;

/// One hour-to-hour edge of a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: SegmentId,
    pub track_id: TrackId,
    pub h0: u8,
    /// `[lon, lat]`
    pub from: [f64; 2],
    /// `[lon, lat]`
    pub to: [f64; 2],
    pub d_alt_km: f64,
    pub abs_d_alt_km: f64,
    pub length_km: f64,
    pub speed_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct SegmentProperties {
    pub id: SegmentId,
    #[serde(rename = "trackId")]
    pub track_id: TrackId,
    pub h0: u8,
    #[serde(rename = "dAltKm")]
    pub d_alt_km: f64,
    #[serde(rename = "absDAltKm")]
    pub abs_d_alt_km: f64,
    #[serde(rename = "lengthKm")]
    pub length_km: f64,
    #[serde(rename = "speedMs")]
    pub speed_ms: f64,
}

impl Segment {
    pub fn to_feature(&self) -> Feature<SegmentProperties> {
        Feature::new(
            Geometry::LineString {
                coordinates: vec![self.from, self.to],
            },
            SegmentProperties {
                id: self.id,
                track_id: self.track_id,
                h0: self.h0,
                d_alt_km: self.d_alt_km,
                abs_d_alt_km: self.abs_d_alt_km,
                length_km: self.length_km,
                speed_ms: self.speed_ms,
            },
        )
    }
}

/// Emits one segment per consecutive sample pair, ordered by hour then timestamp.
pub fn build_segments(track: &Track) -> Vec<Segment> {
    if track.samples.len() < 2 {
        return Vec::new();
    }

    let mut ordered: Vec<&Sample> = track.samples.iter().collect();
    ordered.sort_by(|a, b| a.track_order(b));

    ordered
        .windows(2)
        .enumerate()
        .map(|(seq, pair)| segment_between(track.id, seq, pair[0], pair[1]))
        .collect()
}

fn segment_between(track_id: TrackId, seq: usize, prev: &Sample, next: &Sample) -> Segment {
    let length_km = distance_km(prev.position(), next.position());
    let hour_steps = f64::from(next.hour.abs_diff(prev.hour).max(1));
    let d_alt_km = next.alt_km - prev.alt_km;

    Segment {
        id: SegmentId { track: track_id, seq },
        track_id,
        h0: prev.hour,
        from: [prev.lon, prev.lat],
        to: [next.lon, next.lat],
        d_alt_km,
        abs_d_alt_km: d_alt_km.abs(),
        length_km,
        speed_ms: length_km * 1000.0 / (hour_steps * SECONDS_PER_HOUR_STEP),
    }
}

/// Everything derived from linking one hour pair.
#[derive(Debug, Clone)]
pub struct PairSegments {
    pub pair_hour: u8,
    pub segments: Vec<Segment>,
    pub index_items: Vec<IndexItem>,
}

/// Links `left` (hour `pair_hour`) to `right` (hour `pair_hour + 1`) and builds
/// the resulting segments and index entries. Pure; safe to run off-thread.
pub fn build_pair_segments(
    left: &[Sample],
    right: &[Sample],
    pair_hour: u8,
    max_distance_km: f64,
) -> PairSegments {
    let segments: Vec<Segment> = tracks_for_pair(left, right, pair_hour, max_distance_km)
        .iter()
        .flat_map(build_segments)
        .collect();
    let index_items = segments
        .iter()
        .map(|s| IndexItem::from_segment(s, pair_hour))
        .collect();

    PairSegments {
        pair_hour,
        segments,
        index_items,
    }
}
