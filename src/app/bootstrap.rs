use std::io;

use crate::app::controller::BatchController;
use crate::app::report::BatchSummary;
use crate::config::{validate_batch_config, BatchConfig};
use crate::error::Result;
use crate::fetch::YahooHistoryProvider;

/// Entry point used by `main`: validate the built-in configuration and run the batch.
pub fn run() -> Result<BatchSummary> {
    run_with(BatchConfig::builtin())
}

pub fn run_with(config: BatchConfig) -> Result<BatchSummary> {
    validate_batch_config(&config)?;
    let provider = YahooHistoryProvider::new(config.provider.clone())?;
    let mut controller = BatchController::new(config, provider, io::stdout());
    Ok(controller.run())
}
