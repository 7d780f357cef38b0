use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::tracks::{Segment, SegmentId, TrackId};

/// Axis-aligned lon/lat rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_lon, self.min_lat], [self.max_lon, self.max_lat])
    }
}

/// Bounding box of exactly one segment, with back-references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexItem {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub segment_id: SegmentId,
    pub track_id: TrackId,
    pub pair_hour: u8,
}

impl IndexItem {
    pub fn from_segment(segment: &Segment, pair_hour: u8) -> Self {
        let [lon0, lat0] = segment.from;
        let [lon1, lat1] = segment.to;
        Self {
            min_lon: lon0.min(lon1),
            min_lat: lat0.min(lat1),
            max_lon: lon0.max(lon1),
            max_lat: lat0.max(lat1),
            segment_id: segment.id,
            track_id: segment.track_id,
            pair_hour,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

impl RTreeObject for IndexItem {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox().envelope()
    }
}

/// R-tree over segment boxes. Queries are box-level only; callers needing exact
/// geometry must filter the results themselves.
#[derive(Default)]
pub struct SegmentIndex {
    tree: RTree<IndexItem>,
}

impl SegmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bulk_load(items: Vec<IndexItem>) -> Self {
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Adds every item. The same item inserted twice is stored twice.
    pub fn insert(&mut self, items: impl IntoIterator<Item = IndexItem>) {
        for item in items {
            self.tree.insert(item);
        }
    }

    pub fn query(&self, bbox: &BBox) -> Vec<&IndexItem> {
        self.tree
            .locate_in_envelope_intersecting(&bbox.envelope())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: usize = 10;

    fn cell_item(col: usize, row: usize) -> IndexItem {
        // unit boxes with a gap so neighbouring cells never touch
        let lon = col as f64 * 2.0;
        let lat = row as f64 * 2.0;
        IndexItem {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon + 1.0,
            max_lat: lat + 1.0,
            segment_id: SegmentId {
                track: TrackId {
                    origin_hour: 0,
                    origin_index: row * GRID + col,
                },
                seq: 0,
            },
            track_id: TrackId {
                origin_hour: 0,
                origin_index: row * GRID + col,
            },
            pair_hour: 0,
        }
    }

    fn grid_index() -> SegmentIndex {
        let mut index = SegmentIndex::new();
        for row in 0..GRID {
            // several insert calls; earlier batches must survive later ones
            index.insert((0..GRID).map(|col| cell_item(col, row)));
        }
        index
    }

    #[test]
    fn single_cell_query_finds_only_that_cell() {
        let index = grid_index();
        assert_eq!(index.len(), GRID * GRID);

        for k in [0, 17, 55, 99] {
            let expected = cell_item(k % GRID, k / GRID);
            let hits = index.query(&expected.bbox());
            assert_eq!(hits.len(), 1, "cell {k}");
            assert_eq!(hits[0], &expected);
        }
    }

    #[test]
    fn whole_grid_query_returns_everything() {
        let index = grid_index();
        let span = GRID as f64 * 2.0;
        assert_eq!(index.query(&BBox::new(0.0, 0.0, span, span)).len(), GRID * GRID);
        assert!(index.query(&BBox::new(-50.0, -50.0, -40.0, -40.0)).is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let mut index = SegmentIndex::new();
        index.insert([cell_item(0, 0)]);
        index.insert([cell_item(0, 0)]);
        assert_eq!(index.len(), 2);

        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn bulk_load_matches_incremental() {
        let items: Vec<_> = (0..GRID).map(|c| cell_item(c, 3)).collect();
        let index = SegmentIndex::bulk_load(items);
        assert_eq!(index.query(&BBox::world()).len(), GRID);
    }
}
