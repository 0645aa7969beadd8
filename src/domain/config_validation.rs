//! Configuration validation.
//!
//! Validates all config fields before any price data is loaded.

use crate::domain::error::BacktestError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::strategy::{StrategyParams, STRATEGY_SECTION};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const BACKTEST_SECTION: &str = "backtest";

/// The `[backtest]` section after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSettings {
    pub symbol: String,
    pub data_dir: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub output: Option<String>,
    /// Indented JSON output, on unless `pretty = false`.
    pub pretty: bool,
}

impl BacktestSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BacktestError> {
        validate_backtest_config(config)?;
        let (start_date, end_date) = read_dates(config)?;
        Ok(BacktestSettings {
            symbol: required_string(config, "symbol")?.to_uppercase(),
            data_dir: required_string(config, "data_dir")?,
            start_date,
            end_date,
            output: config
                .get_string(BACKTEST_SECTION, "output")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            pretty: config.get_bool(BACKTEST_SECTION, "pretty", true),
        })
    }
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    read_dates(config)?;
    validate_symbol(config)?;
    required_string(config, "data_dir")?;
    Ok(())
}

/// Check `[strategy] indicator` names a supported indicator and that its
/// parameters are valid. Returns the parsed parameters.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<StrategyParams, BacktestError> {
    let kind = read_indicator(config)?;
    StrategyParams::from_config(kind, config)
}

pub fn read_indicator(config: &dyn ConfigPort) -> Result<IndicatorKind, BacktestError> {
    match config.get_string(STRATEGY_SECTION, "indicator") {
        Some(name) if !name.trim().is_empty() => name.parse(),
        _ => Err(BacktestError::ConfigMissing {
            section: STRATEGY_SECTION.to_string(),
            key: "indicator".to_string(),
        }),
    }
}

fn read_dates(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), BacktestError> {
    let start_str = config.get_string(BACKTEST_SECTION, "start_date");
    let end_str = config.get_string(BACKTEST_SECTION, "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(BacktestError::ConfigInvalid {
            section: BACKTEST_SECTION.to_string(),
            key: "start_date".to_string(),
            reason: format!("start_date ({start_date}) must not be after end_date ({end_date})"),
        });
    }
    Ok((start_date, end_date))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, BacktestError> {
    match value {
        None => Err(BacktestError::ConfigMissing {
            section: BACKTEST_SECTION.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            BacktestError::ConfigInvalid {
                section: BACKTEST_SECTION.to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let symbol = required_string(config, "symbol")?;
    let valid = symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(BacktestError::ConfigInvalid {
            section: BACKTEST_SECTION.to_string(),
            key: "symbol".to_string(),
            reason: format!("'{symbol}' contains characters not allowed in a ticker symbol"),
        });
    }
    Ok(())
}

fn required_string(config: &dyn ConfigPort, key: &str) -> Result<String, BacktestError> {
    match config.get_string(BACKTEST_SECTION, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(BacktestError::ConfigMissing {
            section: BACKTEST_SECTION.to_string(),
            key: key.to_string(),
        }),
    }
}
