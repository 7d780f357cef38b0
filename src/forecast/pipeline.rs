use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::geodesy::smallest_angle_diff;
use crate::geojson::{Feature, FeatureCollection, Geometry};

use super::cache::{ForecastCache, ForecastKey};
use super::error::CompareError;
use super::levels::{round_hour_utc, PressureLevel};
use super::source::ForecastSource;
use super::stats::ComparisonStats;
use super::wind::WindVector;

pub const DEFAULT_CONCURRENCY: usize = 6;
pub const DEFAULT_MAX_POINTS: usize = 100;

/// A point whose observed motion is compared against the forecast wind.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPoint {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub alt_km: f64,
    pub timestamp: DateTime<Utc>,
    pub hour: u8,
    #[serde(default)]
    pub obs_speed: Option<f64>,
    #[serde(default)]
    pub obs_head: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub id: String,
    #[serde(skip)]
    pub lat: f64,
    #[serde(skip)]
    pub lon: f64,
    /// Hour offset of the observation within the 24 h window.
    pub hour: u8,
    pub level: PressureLevel,
    #[serde(rename = "tHour")]
    pub hour_utc: DateTime<Utc>,
    pub fc_speed: f64,
    pub fc_head: f64,
    pub obs_speed: f64,
    pub obs_head: f64,
    pub d_speed: f64,
    pub d_head: f64,
}

impl Comparison {
    pub fn into_feature(self) -> Feature<Comparison> {
        let coordinates = [self.lon, self.lat];
        Feature::new(Geometry::Point { coordinates }, self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonReport {
    pub comparisons: Vec<Comparison>,
    pub stats: ComparisonStats,
}

impl ComparisonReport {
    pub fn into_feature_collection(self) -> FeatureCollection<Comparison> {
        FeatureCollection::new(
            self.comparisons
                .into_iter()
                .map(Comparison::into_feature)
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub concurrency: usize,
    pub max_points: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

/// Fetches forecast winds for a bounded batch of points and compares them with
/// the observed vectors.
pub struct ComparisonPipeline<S> {
    source: S,
    cache: Arc<ForecastCache>,
    settings: PipelineSettings,
}

impl<S: ForecastSource> ComparisonPipeline<S> {
    pub fn new(source: S, cache: Arc<ForecastCache>, settings: PipelineSettings) -> Self {
        Self {
            source,
            cache,
            settings,
        }
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Compares every point, `concurrency` at a time; each group completes
    /// before the next starts. Points without an observed vector or without a
    /// forecast are left out of the report.
    pub async fn compare(&self, points: &[ForecastPoint]) -> Result<ComparisonReport, CompareError> {
        if points.len() > self.settings.max_points {
            return Err(CompareError::TooManyPoints {
                count: points.len(),
                max: self.settings.max_points,
            });
        }

        let mut comparisons = Vec::with_capacity(points.len());
        for chunk in points.chunks(self.settings.concurrency.max(1)) {
            let results = join_all(chunk.iter().map(|p| self.compare_point(p))).await;
            comparisons.extend(results.into_iter().flatten());
        }

        if comparisons.len() < points.len() {
            log::info!(
                "compared {} of {} points",
                comparisons.len(),
                points.len()
            );
        }

        let stats = ComparisonStats::from_comparisons(&comparisons);
        Ok(ComparisonReport { comparisons, stats })
    }

    async fn compare_point(&self, point: &ForecastPoint) -> Option<Comparison> {
        let (obs_speed, obs_head) = point.obs_speed.zip(point.obs_head)?;
        let level = PressureLevel::for_altitude(point.alt_km);
        let hour_utc = round_hour_utc(point.timestamp);

        let wind = self.forecast(point, hour_utc, level).await?;
        let fc_speed = wind.speed();
        let fc_head = wind.heading_deg();

        Some(Comparison {
            id: point.id.clone(),
            lat: point.lat,
            lon: point.lon,
            hour: point.hour,
            level,
            hour_utc,
            fc_speed,
            fc_head,
            obs_speed,
            obs_head,
            d_speed: fc_speed - obs_speed,
            d_head: smallest_angle_diff(fc_head, obs_head),
        })
    }

    async fn forecast(
        &self,
        point: &ForecastPoint,
        hour_utc: DateTime<Utc>,
        level: PressureLevel,
    ) -> Option<WindVector> {
        let key = ForecastKey::new(point.lat, point.lon, hour_utc, level);
        if let Some(hit) = self.cache.get(&key) {
            return Some(hit);
        }

        match self
            .source
            .fetch(point.lat, point.lon, hour_utc, level)
            .await
        {
            Ok(wind) => {
                self.cache.insert(key, wind);
                Some(wind)
            }
            Err(e) => {
                log::warn!(
                    "No forecast for point {} ({:.3}, {:.3}): {}",
                    point.id,
                    point.lat,
                    point.lon,
                    e
                );
                None
            }
        }
    }
}
