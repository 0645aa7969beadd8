//! JSON report adapter implementing ReportPort.
//!
//! Writes the serialized result to `output_path`, or to stdout when the path
//! is `-`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::domain::backtest::{BacktestResult, BenchmarkResult};
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

pub const STDOUT_PATH: &str = "-";

#[derive(Debug, Clone, Copy)]
pub struct JsonReportAdapter {
    pretty: bool,
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<String, BacktestError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| BacktestError::Report {
            reason: format!("failed to serialize result: {e}"),
        })
    }

    fn write_value<T: Serialize>(&self, value: &T, output_path: &str) -> Result<(), BacktestError> {
        let json = self.render(value)?;

        if output_path == STDOUT_PATH {
            let mut out = io::stdout().lock();
            writeln!(out, "{json}")?;
            return Ok(());
        }

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                return Err(BacktestError::Report {
                    reason: format!("output directory {} does not exist", parent.display()),
                });
            }
        }

        let file = File::create(path).map_err(|e| BacktestError::Report {
            reason: format!("failed to create {}: {e}", path.display()),
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("wrote report to {}", path.display());
        Ok(())
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), BacktestError> {
        self.write_value(result, output_path)
    }

    fn write_benchmark(
        &self,
        result: &BenchmarkResult,
        output_path: &str,
    ) -> Result<(), BacktestError> {
        self.write_value(result, output_path)
    }
}
