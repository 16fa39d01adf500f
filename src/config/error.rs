use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse acquisition time: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Sun is below the horizon at {datetime} (lat {latitude}, lon {longitude})")]
    SunBelowHorizon {
        datetime: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    },

    #[error("latitude must be between -90 and 90, got {0}")]
    Latitude(f64),

    #[error("longitude must be between -180 and 180, got {0}")]
    Longitude(f64),
}
