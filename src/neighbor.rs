use serde::{Deserialize, Serialize};

use crate::buckets::{HourBucketStore, Sample, HOURS};
use crate::geodesy::{bearing_deg, distance_km, LatLon};

pub const DEFAULT_NEIGHBOR_MAX_KM: f64 = 500.0;

/// How hour-offsets at the window edges relate to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourAdjacency {
    /// Hour 0 and hour 23 are neighbours.
    #[default]
    Cyclic,
    /// Hour 0 has no previous hour and hour 23 no next hour.
    Linear,
}

impl HourAdjacency {
    /// Hours outside the window have no neighbours.
    pub fn prev(self, hour: u8) -> Option<u8> {
        match (self, hour) {
            (_, h) if h >= HOURS => None,
            (HourAdjacency::Cyclic, 0) => Some(HOURS - 1),
            (HourAdjacency::Linear, 0) => None,
            _ => Some(hour - 1),
        }
    }

    pub fn next(self, hour: u8) -> Option<u8> {
        match self {
            _ if hour >= HOURS => None,
            HourAdjacency::Cyclic => Some((hour + 1) % HOURS),
            HourAdjacency::Linear if hour + 1 < HOURS => Some(hour + 1),
            HourAdjacency::Linear => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSide {
    Prev,
    Next,
}

/// Observed motion for one point. When `has_neighbor` is false the speed and
/// heading are placeholders, not a zero-motion observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborResult {
    pub has_neighbor: bool,
    pub from_hour: NeighborSide,
    pub speed_ms: f64,
    pub heading_deg: f64,
}

impl NeighborResult {
    pub fn none() -> Self {
        Self {
            has_neighbor: false,
            from_hour: NeighborSide::Prev,
            speed_ms: 0.0,
            heading_deg: 0.0,
        }
    }

    pub fn observed(&self) -> Option<(f64, f64)> {
        self.has_neighbor.then_some((self.speed_ms, self.heading_deg))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NeighborSettings {
    pub max_km: f64,
    pub adjacency: HourAdjacency,
}

impl Default for NeighborSettings {
    fn default() -> Self {
        Self {
            max_km: DEFAULT_NEIGHBOR_MAX_KM,
            adjacency: HourAdjacency::Cyclic,
        }
    }
}

fn closest_within(origin: LatLon, candidates: &[Sample], max_km: f64) -> Option<(&Sample, f64)> {
    let mut best: Option<(&Sample, f64)> = None;
    for candidate in candidates {
        let d = distance_km(origin, candidate.position());
        if d < max_km && best.map_or(true, |(_, min)| d < min) {
            best = Some((candidate, d));
        }
    }
    best
}

/// Derives an observed vector for `point` from its closest sample in the
/// adjacent hours.
///
/// The nearer of the previous-hour and next-hour candidates wins, ties going to
/// the previous hour. Speed assumes one hour between the two observations.
/// Heading runs from the older observation to the newer one: a previous-hour
/// neighbour (lower offset) is newer than `point`, a next-hour one older.
pub fn resolve_neighbor(
    point: &Sample,
    store: &HourBucketStore,
    settings: NeighborSettings,
) -> NeighborResult {
    let origin = point.position();
    let lookup = |hour: Option<u8>| {
        hour.and_then(|h| closest_within(origin, store.get(h), settings.max_km))
    };
    let prev = lookup(settings.adjacency.prev(point.hour));
    let next = lookup(settings.adjacency.next(point.hour));

    let (side, neighbor, distance) = match (prev, next) {
        (Some((p, dp)), Some((_, dn))) if dp <= dn => (NeighborSide::Prev, p, dp),
        (_, Some((n, dn))) => (NeighborSide::Next, n, dn),
        (Some((p, dp)), None) => (NeighborSide::Prev, p, dp),
        (None, None) => return NeighborResult::none(),
    };

    let heading_deg = match side {
        NeighborSide::Prev => bearing_deg(origin, neighbor.position()),
        NeighborSide::Next => bearing_deg(neighbor.position(), origin),
    };

    NeighborResult {
        has_neighbor: true,
        from_hour: side,
        // km per hour to m/s
        speed_ms: distance / 3.6,
        heading_deg,
    }
}
