//! CSV file price adapter.
//!
//! Each symbol lives in `{base_path}/{SYMBOL}.csv` with the header
//! `date,open,high,low,close,volume` and ISO dates.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Every bar in the symbol's file, sorted by date with duplicate dates
    /// collapsed to the last row seen.
    fn read_all(&self, symbol: &str) -> Result<Vec<PriceBar>, BacktestError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| BacktestError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| BacktestError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            // header is line 1
            bars.push(parse_record(&record, line + 2)?);
        }

        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        dedup_keep_last(&mut bars);
        if bars.len() < before {
            warn!(
                "{}: dropped {} rows with duplicate dates",
                path.display(),
                before - bars.len()
            );
        }

        debug!("loaded {} bars from {}", bars.len(), path.display());
        Ok(bars)
    }
}

fn dedup_keep_last(bars: &mut Vec<PriceBar>) {
    let mut out: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars.drain(..) {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    *bars = out;
}

fn parse_record(record: &csv::StringRecord, line: usize) -> Result<PriceBar, BacktestError> {
    let date_str = record.get(0).ok_or_else(|| BacktestError::Data {
        reason: format!("line {line}: missing date column"),
    })?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| BacktestError::Data {
        reason: format!("line {line}: invalid date '{date_str}': {e}"),
    })?;

    Ok(PriceBar {
        date,
        open: parse_number(record, 1, "open", line)?,
        high: parse_number(record, 2, "high", line)?,
        low: parse_number(record, 3, "low", line)?,
        close: parse_number(record, 4, "close", line)?,
        volume: parse_number(record, 5, "volume", line)?,
    })
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    line: usize,
) -> Result<f64, BacktestError> {
    let raw = record.get(index).ok_or_else(|| BacktestError::Data {
        reason: format!("line {line}: missing {column} column"),
    })?;
    raw.parse().map_err(|e| BacktestError::Data {
        reason: format!("line {line}: invalid {column} value '{raw}': {e}"),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, BacktestError> {
        let bars: Vec<PriceBar> = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        debug!(
            "{} bars for {} between {} and {}",
            bars.len(),
            symbol,
            start_date,
            end_date
        );
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let bars = self.read_all(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
