use thiserror::Error;

/// Failures while reading, validating or writing preferences
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("target count {count} is outside 1..={max}")]
    TargetCountOutOfRange { count: u32, max: u32 },

    /// Decay timing that would never count down
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}
