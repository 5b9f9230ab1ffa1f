use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::utils::current_human_timestamp;

/// What happened to one symbol.
#[derive(Debug)]
pub enum FetchOutcome {
    Saved { path: PathBuf, rows: usize },
    NoData,
    Failed(AppError),
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FetchOutcome::Saved { .. })
    }
}

/// Per-symbol outcomes in processing order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<(String, FetchOutcome)>,
}

impl BatchSummary {
    pub fn record(&mut self, symbol: &str, outcome: FetchOutcome) {
        self.outcomes.push((symbol.to_string(), outcome));
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn saved(&self) -> usize {
        self.count(|outcome| outcome.is_saved())
    }

    pub fn no_data(&self) -> usize {
        self.count(|outcome| matches!(outcome, FetchOutcome::NoData))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FetchOutcome::Failed(_)))
    }

    pub fn outcome(&self, symbol: &str) -> Option<&FetchOutcome> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| candidate == symbol)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, predicate: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}

/// Console line for a finished symbol.
pub fn outcome_line(symbol: &str, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Saved { path, .. } => format!("✅ Saved data to {}", file_label(path)),
        FetchOutcome::NoData => format!("⚠️ No data for {symbol}"),
        FetchOutcome::Failed(err) => {
            format!("❌ Error fetching {symbol}: [{}] {}", err.kind(), err.detailed())
        }
    }
}

pub fn summary_line(summary: &BatchSummary) -> String {
    format!(
        "Batch finished on {}.\nSucceeded: {}  No data: {}  Failed: {} (Total: {})",
        current_human_timestamp(),
        summary.saved(),
        summary.no_data(),
        summary.failed(),
        summary.total()
    )
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
