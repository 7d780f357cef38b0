use serde::Serialize;

use super::pipeline::Comparison;

/// Median and 90th percentile by nearest rank on the sorted series; zero for
/// an empty series.
pub fn median_p90(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let p90_index = ((n as f64 * 0.9).floor() as usize).min(n - 1);
    (sorted[n / 2], sorted[p90_index])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComparisonStats {
    pub count: usize,
    pub med_dspeed: f64,
    pub p90_dspeed: f64,
    pub med_dhead: f64,
    pub p90_dhead: f64,
}

impl ComparisonStats {
    /// Statistics of the absolute speed and heading differences.
    pub fn from_comparisons(comparisons: &[Comparison]) -> Self {
        let speeds: Vec<f64> = comparisons.iter().map(|c| c.d_speed.abs()).collect();
        let heads: Vec<f64> = comparisons.iter().map(|c| c.d_head.abs()).collect();
        let (med_dspeed, p90_dspeed) = median_p90(&speeds);
        let (med_dhead, p90_dhead) = median_p90(&heads);
        Self {
            count: comparisons.len(),
            med_dspeed,
            p90_dspeed,
            med_dhead,
            p90_dhead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_is_zero() {
        assert_eq!(median_p90(&[]), (0.0, 0.0));
        assert_eq!(ComparisonStats::from_comparisons(&[]), ComparisonStats::default());
    }

    #[test]
    fn nearest_rank_indices() {
        let values: Vec<f64> = (1..=10).rev().map(f64::from).collect();
        assert_eq!(median_p90(&values), (6.0, 10.0));
        assert_eq!(median_p90(&[4.0]), (4.0, 4.0));
        assert_eq!(median_p90(&[3.0, 1.0, 2.0]), (2.0, 3.0));
    }
}
