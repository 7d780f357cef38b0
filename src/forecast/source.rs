use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::error::ForecastError;
use super::levels::PressureLevel;
use super::wind::WindVector;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Supplier of forecast winds for one location, hour and pressure level.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        hour: DateTime<Utc>,
        level: PressureLevel,
    ) -> Result<WindVector, ForecastError>;
}

/// Open-Meteo style hourly forecast endpoint. Requests time out and are never retried.
#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    client: Client,
    base_url: String,
}

impl OpenMeteoSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoSource {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        hour: DateTime<Utc>,
        level: PressureLevel,
    ) -> Result<WindVector, ForecastError> {
        let speed_key = format!("wind_speed_{}hPa", level.hpa());
        let direction_key = format!("wind_direction_{}hPa", level.hpa());
        let hour_param = hour.format("%Y-%m-%dT%H:00").to_string();

        let body: Value = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("hourly", format!("{speed_key},{direction_key}")),
                ("wind_speed_unit", "ms".to_string()),
                ("start_hour", hour_param.clone()),
                ("end_hour", hour_param),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_hourly_wind(&body, &speed_key, &direction_key)
    }
}

fn parse_hourly_wind(
    body: &Value,
    speed_key: &str,
    direction_key: &str,
) -> Result<WindVector, ForecastError> {
    let first = |key: &str| {
        body.get("hourly")
            .and_then(|h| h.get(key))
            .and_then(|series| series.get(0))
            .and_then(Value::as_f64)
            .ok_or_else(|| ForecastError::MissingField(key.to_string()))
    };
    let speed = first(speed_key)?;
    let direction = first(direction_key)?;
    Ok(WindVector::from_speed_direction(speed, direction))
}
