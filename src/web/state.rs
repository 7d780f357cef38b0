use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::forecast::{ComparisonPipeline, ForecastCache, ForecastError, OpenMeteoSource};
use crate::trails::{TrailSession, TrailSettings};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<RwLock<TrailSession>>,
    pub pipeline: Arc<ComparisonPipeline<OpenMeteoSource>>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, ForecastError> {
        let source =
            OpenMeteoSource::new(config.forecast.base_url.clone(), config.forecast.timeout())?;
        let cache = Arc::new(ForecastCache::new(config.forecast.cache_capacity));
        let pipeline = ComparisonPipeline::new(source, cache, config.forecast.pipeline_settings());
        let session = TrailSession::new(TrailSettings::from(&config));

        Ok(AppState {
            config: Arc::new(config),
            session: Arc::new(RwLock::new(session)),
            pipeline: Arc::new(pipeline),
        })
    }
}
