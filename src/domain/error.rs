//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for the backtester.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("unsupported indicator: {name}")]
    UnsupportedIndicator { name: String },

    #[error(
        "insufficient data: this strategy requires at least {required} days of data, \
         but only {available} days are available"
    )]
    InsufficientData { required: usize, available: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("no price data found for the specified date range ({start_date} to {end_date})")]
    EmptyPriceRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        BacktestError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) | BacktestError::Report { .. } => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::Data { .. } => 3,
            BacktestError::UnsupportedIndicator { .. } | BacktestError::InvalidParameter { .. } => {
                4
            }
            BacktestError::InsufficientData { .. } | BacktestError::EmptyPriceRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
