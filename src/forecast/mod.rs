mod cache;
mod error;
mod levels;
mod pipeline;
mod source;
mod stats;
mod wind;

pub use cache::{ForecastCache, ForecastKey, DEFAULT_CACHE_CAPACITY};
pub use error::{CompareError, ForecastError};
pub use levels::{round_hour_utc, PressureLevel};
pub use pipeline::{
    Comparison, ComparisonPipeline, ComparisonReport, ForecastPoint, PipelineSettings,
    DEFAULT_CONCURRENCY, DEFAULT_MAX_POINTS,
};
pub use source::{ForecastSource, OpenMeteoSource, DEFAULT_FORECAST_URL};
pub use stats::{median_p90, ComparisonStats};
pub use wind::WindVector;
