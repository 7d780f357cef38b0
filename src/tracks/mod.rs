mod linker;
mod segment;
mod types;

pub use linker::{
    chain_tracks, link_pair, sort_for_linking, tracks_for_pair, DEFAULT_MAX_KM_PER_HOUR,
};
pub use segment::{build_pair_segments, build_segments, PairSegments, Segment, SegmentProperties};
pub use types::{Link, SegmentId, Track, TrackId};
