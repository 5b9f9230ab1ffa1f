use anyhow::{Context, Result};
use env_logger::Env;

use stock_history_batch::app;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Per-symbol failures are reported inside the batch; only startup errors surface here.
    app::run().context("Failed to start history batch")?;
    Ok(())
}
