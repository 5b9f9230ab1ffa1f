use reqwest::{
    blocking::Client,
    header::{ACCEPT, USER_AGENT},
};

use crate::config::ProviderConfig;
use crate::error::{AppError, Context, Result};

use super::decode::{into_history, ChartResponse};
use super::{FetchResult, HistoryProvider, PriceHistory};

/// Daily history from the Yahoo Finance v8 chart endpoint.
pub struct YahooHistoryProvider {
    client: Client,
    config: ProviderConfig,
}

impl YahooHistoryProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to construct history HTTP client")?;
        Ok(Self::with_client(config, client))
    }

    /// Use a preconfigured client, e.g. one that bypasses system proxies.
    pub fn with_client(config: ProviderConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), symbol)
    }
}

impl HistoryProvider for YahooHistoryProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_history(&self, symbol: &str, window_days: u32) -> FetchResult<PriceHistory> {
        let url = self.chart_url(symbol);
        let range = format!("{window_days}d");
        log::debug!("GET {url}?range={range}&interval=1d");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", range.as_str()),
                ("interval", "1d"),
                ("events", "div,splits"),
            ])
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("History request failed for {}", symbol))?;

        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("Failed to read history body for {}", symbol))?;

        // Unknown symbols come back as 404 with a chart error payload.
        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(chart) => into_history(chart, symbol),
            Err(_) if !status.is_success() => Err(AppError::provider(
                format!("HTTP {}", status.as_u16()),
                format!(
                    "history request for {} returned {}",
                    symbol,
                    status.canonical_reason().unwrap_or("an error status")
                ),
            )),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to parse chart JSON for {}", symbol))
                .map_err(AppError::from),
        }
    }
}
