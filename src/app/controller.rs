use std::io::Write;
use std::thread;

use crate::app::preview::render_preview;
use crate::app::report::{outcome_line, summary_line, BatchSummary, FetchOutcome};
use crate::config::BatchConfig;
use crate::error::{Context, Result};
use crate::fetch::HistoryProvider;
use crate::records::save_history;

/// Drives the fetch, preview, save, pause cycle over every configured symbol.
///
/// Console output goes to `out`; one symbol's failure never stops the batch.
pub struct BatchController<P, W> {
    config: BatchConfig,
    provider: P,
    out: W,
}

impl<P: HistoryProvider, W: Write> BatchController<P, W> {
    pub fn new(config: BatchConfig, provider: P, out: W) -> Self {
        Self {
            config,
            provider,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Process every symbol in list order, pausing after each one.
    pub fn run(&mut self) -> BatchSummary {
        let symbols = self.config.symbols.clone();
        let delay = self.config.request_delay;
        log::info!(
            "fetching {} symbols from {} ({}d window)",
            symbols.len(),
            self.provider.name(),
            self.config.window_days
        );

        let mut summary = BatchSummary::default();
        for symbol in &symbols {
            let outcome = self.fetch_and_save(symbol);
            summary.record(symbol, outcome);

            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        self.emit(&summary_line(&summary));
        log::info!(
            "batch done: {} saved, {} without data, {} failed",
            summary.saved(),
            summary.no_data(),
            summary.failed()
        );
        summary
    }

    /// Fetch one symbol's trailing history and persist it, reporting the outcome.
    pub fn fetch_and_save(&mut self, symbol: &str) -> FetchOutcome {
        let outcome = match self.try_fetch_and_save(symbol) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("{symbol}: {}", err.detailed());
                FetchOutcome::Failed(err)
            }
        };

        if let FetchOutcome::Saved { path, rows } = &outcome {
            log::debug!("{symbol}: wrote {rows} rows to {}", path.display());
        }
        self.emit(&outcome_line(symbol, &outcome));
        outcome
    }

    fn try_fetch_and_save(&mut self, symbol: &str) -> Result<FetchOutcome> {
        let history = self
            .provider
            .fetch_history(symbol, self.config.window_days)?;

        if history.is_empty() {
            return Ok(FetchOutcome::NoData);
        }

        write!(self.out, "{}", render_preview(&history))
            .with_context(|| format!("Failed to print preview for {}", symbol))?;

        let path = save_history(&self.config.output_dir, &history, self.config.window_days)?;
        Ok(FetchOutcome::Saved {
            path,
            rows: history.len(),
        })
    }

    fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            log::warn!("failed to write console output: {err}");
        }
    }
}
