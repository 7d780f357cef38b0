use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::forecast::{
    PipelineSettings, DEFAULT_CACHE_CAPACITY, DEFAULT_CONCURRENCY, DEFAULT_FORECAST_URL,
    DEFAULT_MAX_POINTS,
};
use crate::neighbor::{HourAdjacency, NeighborSettings, DEFAULT_NEIGHBOR_MAX_KM};
use crate::tracks::DEFAULT_MAX_KM_PER_HOUR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub neighbor: NeighborConfig,
    pub forecast: ForecastConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub max_km_per_hour: f64,
    /// Segments faster than this are hidden from viewport queries.
    pub max_reasonable_speed_ms: Option<f64>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_km_per_hour: DEFAULT_MAX_KM_PER_HOUR,
            max_reasonable_speed_ms: Some(120.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NeighborConfig {
    pub max_km: f64,
    pub adjacency: HourAdjacency,
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self {
            max_km: DEFAULT_NEIGHBOR_MAX_KM,
            adjacency: HourAdjacency::Cyclic,
        }
    }
}

impl NeighborConfig {
    pub fn settings(&self) -> NeighborSettings {
        NeighborSettings {
            max_km: self.max_km,
            adjacency: self.adjacency,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub max_points: usize,
    pub cache_capacity: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FORECAST_URL.to_string(),
            timeout_secs: 10,
            concurrency: DEFAULT_CONCURRENCY,
            max_points: DEFAULT_MAX_POINTS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ForecastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pipeline limits from the file, capped at the service maximums of
    /// `DEFAULT_CONCURRENCY` requests in flight and `DEFAULT_MAX_POINTS` points.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        let concurrency = self.concurrency.clamp(1, DEFAULT_CONCURRENCY);
        let max_points = self.max_points.min(DEFAULT_MAX_POINTS);
        if concurrency != self.concurrency || max_points != self.max_points {
            log::warn!(
                "forecast limits capped to concurrency {} and max_points {}",
                concurrency,
                max_points
            );
        }
        PipelineSettings {
            concurrency,
            max_points,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}
