use chrono::{DateTime, Utc};

use crate::error::Result;

pub mod decode;
pub mod history;

pub use decode::parse_chart_response;
pub use history::YahooHistoryProvider;

pub type FetchResult<T> = Result<T>;

/// One trading session as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    /// Session date at exchange-local midnight.
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
    pub dividends: f64,
    pub stock_splits: f64,
}

/// Ordered daily bars for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}

/// Source of trailing daily history. An empty history means the provider knows of no data.
pub trait HistoryProvider {
    fn name(&self) -> &str;

    fn fetch_history(&self, symbol: &str, window_days: u32) -> FetchResult<PriceHistory>;
}

impl<T: HistoryProvider + ?Sized> HistoryProvider for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_history(&self, symbol: &str, window_days: u32) -> FetchResult<PriceHistory> {
        (**self).fetch_history(symbol, window_days)
    }
}
