use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Context, Result};
use crate::fetch::{PriceBar, PriceHistory};
use crate::utils::{iso_timestamp, write_atomically};

/// One row of an output artifact. Field names follow the provider's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: Option<f64>,
    #[serde(rename = "High")]
    pub high: Option<f64>,
    #[serde(rename = "Low")]
    pub low: Option<f64>,
    #[serde(rename = "Close")]
    pub close: Option<f64>,
    #[serde(rename = "Volume")]
    pub volume: Option<u64>,
    #[serde(rename = "Dividends")]
    pub dividends: f64,
    #[serde(rename = "Stock Splits")]
    pub stock_splits: f64,
}

impl From<&PriceBar> for HistoryRecord {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: iso_timestamp(&bar.timestamp),
            open: finite(bar.open),
            high: finite(bar.high),
            low: finite(bar.low),
            close: finite(bar.close),
            volume: bar.volume,
            dividends: bar.dividends,
            stock_splits: bar.stock_splits,
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Output file name for a symbol, e.g. `AAPL_last5days.json`.
pub fn history_file_name(symbol: &str, window_days: u32) -> String {
    format!("{symbol}_last{window_days}days.json")
}

pub fn history_records(history: &PriceHistory) -> Vec<HistoryRecord> {
    history.bars.iter().map(HistoryRecord::from).collect()
}

/// Serialize a history as a compact JSON array, one object per session.
pub fn render_history_json(history: &PriceHistory) -> Result<String> {
    let json = serde_json::to_string(&history_records(history))
        .with_context(|| format!("Failed to serialize history for {}", history.symbol))?;
    Ok(json)
}

/// Write the history artifact into `dir`, replacing any previous file for the symbol.
pub fn save_history(dir: &Path, history: &PriceHistory, window_days: u32) -> Result<PathBuf> {
    let json = render_history_json(history)?;
    let path = dir.join(history_file_name(&history.symbol, window_days));
    write_atomically(&path, json.as_bytes())?;
    Ok(path)
}

/// Read an artifact written by [`save_history`].
pub fn load_history(path: &Path) -> Result<Vec<HistoryRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {:?}", path))?;
    let records = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse history file {:?}", path))?;
    Ok(records)
}
