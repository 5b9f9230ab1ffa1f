use std::path::PathBuf;
use std::time::Duration;

pub mod validator;

pub use validator::validate_batch_config;

const DEFAULT_CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Reference ticker list fetched by the shipped binary.
pub const DEFAULT_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOG", "AMZN", "META", "TSLA", "NVDA", "NFLX", "INTC", "AMD", "ADBE", "CRM",
    "PYPL", "CSCO", "ORCL", "QCOM", "AVGO", "TXN", "INTU", "IBM", "SHOP", "BABA", "UBER", "LYFT",
    "SQ", "TWLO", "ZM", "PLTR", "ROKU", "SPOT", "DIS", "V", "MA", "JPM", "BAC", "WFC", "C", "GS",
    "MS", "AXP", "COIN", "T", "VZ", "TMUS", "PFE", "MRNA", "JNJ", "UNH", "CVS", "TMO", "ABT",
];

/// HTTP settings for the chart endpoint.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn builtin() -> Self {
        Self {
            endpoint: DEFAULT_CHART_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Everything the batch driver needs: what to fetch, how far back, and how fast.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub symbols: Vec<String>,
    /// Trailing window in calendar days; also drives the output file name.
    pub window_days: u32,
    /// Pause after each symbol, the last one included. Zero disables it.
    pub request_delay: Duration,
    pub output_dir: PathBuf,
    pub provider: ProviderConfig,
}

impl BatchConfig {
    pub fn builtin() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            window_days: 5,
            request_delay: Duration::from_secs(1),
            output_dir: PathBuf::from("."),
            provider: ProviderConfig::builtin(),
        }
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
