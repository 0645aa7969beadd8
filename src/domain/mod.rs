//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod warmup;
pub mod portfolio;
pub mod trade;
pub mod backtest;
pub mod metrics;
pub mod strategy;
pub mod date_range;
pub mod config_validation;
pub mod error;
