use std::collections::HashMap;

use crate::buckets::{HourBucketStore, Sample, HOURS};
use crate::geodesy::distance_km;

use super::types::{Link, Track, TrackId};

pub const DEFAULT_MAX_KM_PER_HOUR: f64 = 500.0;

/// Puts samples into the order linking relies on for stable track ids.
pub fn sort_for_linking(samples: &mut [Sample]) {
    samples.sort_by(Sample::linking_order);
}

fn sorted(samples: &[Sample]) -> Vec<Sample> {
    let mut owned = samples.to_vec();
    sort_for_linking(&mut owned);
    owned
}

/// Links every left sample to its nearest right sample strictly closer than
/// `max_distance_km`; the first minimum in `right` order wins.
///
/// Each left sample decides independently, so two left samples may pick the
/// same right sample.
pub fn link_pair(left: &[Sample], right: &[Sample], max_distance_km: f64) -> Vec<Link> {
    let mut links = Vec::new();

    for (left_index, l) in left.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (right_index, r) in right.iter().enumerate() {
            let d = distance_km(l.position(), r.position());
            if d >= max_distance_km {
                continue;
            }
            if best.map_or(true, |(_, min)| d < min) {
                best = Some((right_index, d));
            }
        }

        if let Some((right_index, distance_km)) = best {
            links.push(Link {
                left_index,
                right_index,
                distance_km,
            });
        }
    }

    links
}

/// Two-sample tracks for a single hour pair (`hour`, `hour + 1`).
pub fn tracks_for_pair(
    left: &[Sample],
    right: &[Sample],
    hour: u8,
    max_distance_km: f64,
) -> Vec<Track> {
    let left = sorted(left);
    let right = sorted(right);

    link_pair(&left, &right, max_distance_km)
        .into_iter()
        .map(|link| Track {
            id: TrackId {
                origin_hour: hour,
                origin_index: link.left_index,
            },
            samples: vec![
                left[link.left_index].clone(),
                right[link.right_index].clone(),
            ],
        })
        .collect()
}

/// Chains the links of all adjacent hour pairs into multi-hour tracks.
///
/// Every track whose tail links to a right sample gains that sample; only the
/// first such track keeps extending from it in the next pair. A pair with an
/// empty side breaks every chain.
pub fn chain_tracks(store: &HourBucketStore, max_distance_km: f64) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();
    // sorted index in the current left hour -> track whose tail it is
    let mut open: HashMap<usize, usize> = HashMap::new();

    for hour in 0..HOURS - 1 {
        let left = sorted(store.get(hour));
        let right = sorted(store.get(hour + 1));
        if left.is_empty() || right.is_empty() {
            open.clear();
            continue;
        }

        let mut next_open = HashMap::new();
        for link in link_pair(&left, &right, max_distance_km) {
            let track_index = match open.get(&link.left_index) {
                Some(&index) => index,
                None => {
                    tracks.push(Track {
                        id: TrackId {
                            origin_hour: hour,
                            origin_index: link.left_index,
                        },
                        samples: vec![left[link.left_index].clone()],
                    });
                    tracks.len() - 1
                }
            };

            tracks[track_index]
                .samples
                .push(right[link.right_index].clone());
            next_open.entry(link.right_index).or_insert(track_index);
        }
        open = next_open;
    }

    log::debug!("chained {} tracks", tracks.len());
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::BTreeSet;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn at(lat: f64, lon: f64, hour: u8) -> Sample {
        Sample::new(lat, lon, 12.0, base() - Duration::hours(i64::from(hour)), hour)
    }

    #[test]
    fn links_to_nearest_candidate() {
        let left = vec![at(0.0, 0.0, 0)];
        let right = vec![at(0.0, 0.001, 1), at(10.0, 10.0, 1)];

        let links = link_pair(&left, &right, 500.0);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].right_index, 0);
    }

    #[test]
    fn cap_is_strict() {
        let left = vec![at(0.0, 0.0, 0)];
        let right = vec![at(1.0, 0.0, 1)];
        let d = distance_km(left[0].position(), right[0].position());

        assert!(link_pair(&left, &right, d).is_empty());
        assert_eq!(link_pair(&left, &right, d + 1e-6).len(), 1);
    }

    #[test]
    fn equal_distances_keep_first_seen() {
        let left = vec![at(0.0, 0.0, 0)];
        let right = vec![at(0.0, 1.0, 1), at(0.0, -1.0, 1)];

        let links = link_pair(&left, &right, 500.0);

        assert_eq!(links[0].right_index, 0);
    }

    #[test]
    fn greedy_match_allows_merges() {
        let left = vec![at(0.0, 0.0, 0), at(0.0, 0.2, 0)];
        let right = vec![at(0.0, 0.1, 1), at(5.0, 5.0, 1)];

        let links = link_pair(&left, &right, 100.0);

        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.right_index == 0));
    }

    #[test]
    fn pair_tracks_are_deterministic() {
        let left = vec![at(3.0, 3.0, 4), at(1.0, 1.0, 4), at(2.0, 2.0, 4)];
        let right = vec![at(2.1, 2.1, 5), at(1.1, 1.1, 5), at(3.1, 3.1, 5)];
        let mut shuffled_left = left.clone();
        shuffled_left.reverse();
        let mut shuffled_right = right.clone();
        shuffled_right.rotate_left(1);

        let a = tracks_for_pair(&left, &right, 4, 500.0);
        let b = tracks_for_pair(&shuffled_left, &shuffled_right, 4, 500.0);

        let ids_a: BTreeSet<_> = a.iter().map(|t| t.id).collect();
        let ids_b: BTreeSet<_> = b.iter().map(|t| t.id).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.len(), 3);
        for (ta, tb) in a.iter().zip(&b) {
            assert_eq!(ta.samples, tb.samples);
        }
    }

    #[test]
    fn chains_across_hours() {
        let mut store = HourBucketStore::new();
        store.insert(0, vec![at(0.0, 0.0, 0), at(40.0, 40.0, 0)]).unwrap();
        store.insert(1, vec![at(0.0, 1.0, 1), at(40.0, 41.0, 1)]).unwrap();
        store.insert(2, vec![at(0.0, 2.0, 2)]).unwrap();

        let tracks = chain_tracks(&store, 500.0);

        assert_eq!(tracks.len(), 2);
        let long = tracks.iter().find(|t| t.samples.len() == 3).unwrap();
        assert_eq!(long.id, TrackId { origin_hour: 0, origin_index: 0 });
        let hours: Vec<u8> = long.samples.iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![0, 1, 2]);
    }

    #[test]
    fn gap_breaks_chains() {
        let mut store = HourBucketStore::new();
        store.insert(0, vec![at(0.0, 0.0, 0)]).unwrap();
        store.insert(1, vec![at(0.0, 1.0, 1)]).unwrap();
        store.insert(3, vec![at(0.0, 3.0, 3)]).unwrap();
        store.insert(4, vec![at(0.0, 4.0, 4)]).unwrap();

        let tracks = chain_tracks(&store, 500.0);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].id.origin_hour, 3);
        assert!(tracks.iter().all(|t| t.samples.len() == 2));
    }
}
