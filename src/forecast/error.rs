use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("forecast response missing {0}")]
    MissingField(String),
    #[error("forecast unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("batch of {count} points exceeds the limit of {max}")]
    TooManyPoints { count: usize, max: usize },
}
