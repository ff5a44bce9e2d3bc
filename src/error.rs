use thiserror::Error;

#[derive(Error, Debug)]
pub enum EarningsError {
    #[error("Failed to fetch line-item data: {0}")]
    FetchFailed(String),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Unknown metric identifier: {0}")]
    UnknownMetric(String),

    #[error("Lever {lever} value {value} is outside [{min}, {max}]")]
    LeverOutOfRange {
        lever: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Metric {metric} = {value} violates bounds [{floor}, {ceiling}]")]
    BoundViolation {
        metric: String,
        value: f64,
        floor: f64,
        ceiling: f64,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, EarningsError>;
