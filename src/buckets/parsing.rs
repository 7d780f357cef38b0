use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use super::error::IngestError;
use super::sample::Sample;

/// `[lat, lon, alt_km]` as published per hour.
pub type RawTriplet = [f64; 3];

pub fn parse_hour_file(content: &str) -> Result<Vec<RawTriplet>, IngestError> {
    Ok(serde_json::from_str(content)?)
}

/// Turns one hour of raw triplets into samples stamped `batch_time - hour`.
///
/// Out-of-range or non-finite triplets are dropped, as are duplicates
/// (lat/lon to 5 decimals, altitude to 2 decimals).
pub fn samples_from_triplets(
    hour: u8,
    batch_time: DateTime<Utc>,
    raw: &[RawTriplet],
) -> Vec<Sample> {
    let timestamp = batch_time - Duration::hours(i64::from(hour));
    let mut seen = HashSet::new();
    let mut samples = Vec::with_capacity(raw.len());
    let mut rejected = 0usize;

    for &[lat, lon, alt_km] in raw {
        if !is_valid(lat, lon, alt_km) {
            rejected += 1;
            continue;
        }
        let key = (
            (lat * 1e5).round() as i64,
            (lon * 1e5).round() as i64,
            (alt_km * 1e2).round() as i64,
        );
        if seen.insert(key) {
            samples.push(Sample::new(lat, lon, alt_km, timestamp, hour));
        }
    }

    if rejected > 0 {
        log::debug!("hour {}: dropped {} invalid triplets", hour, rejected);
    }
    samples
}

fn is_valid(lat: f64, lon: f64, alt_km: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && alt_km.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
        && (0.0..=40.0).contains(&alt_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamps_and_filters() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let raw = [
            [10.0, 20.0, 15.0],
            [10.000001, 20.000001, 15.001],
            [91.0, 0.0, 1.0],
            [0.0, 181.0, 1.0],
            [0.0, 0.0, 41.0],
            [f64::NAN, 0.0, 1.0],
            [-5.0, -5.0, 0.0],
        ];

        let samples = samples_from_triplets(3, now, &raw);

        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.hour == 3));
        assert_eq!(samples[0].timestamp, now - Duration::hours(3));
        assert_eq!(samples[1].lat, -5.0);
    }

    #[test]
    fn parses_triplet_arrays() {
        let raw = parse_hour_file("[[1.5, -2.25, 12.0], [0, 0, 0]]").unwrap();
        assert_eq!(raw, vec![[1.5, -2.25, 12.0], [0.0, 0.0, 0.0]]);
        assert!(parse_hour_file("{\"oops\": true}").is_err());
    }
}
