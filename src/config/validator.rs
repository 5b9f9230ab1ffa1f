use std::collections::HashSet;

use crate::error::{AppError, Result};

use super::{BatchConfig, ProviderConfig};

/// Validate a batch configuration, collecting every problem into one error.
pub fn validate_batch_config(config: &BatchConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_symbols(&config.symbols, &mut issues);
    validate_window(config.window_days, &mut issues);
    validate_provider(&config.provider, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "batch config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_symbols(symbols: &[String], issues: &mut Vec<String>) {
    if symbols.is_empty() {
        issues.push("symbol list must not be empty".to_string());
        return;
    }

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for (position, symbol) in symbols.iter().enumerate() {
        if symbol.trim().is_empty() {
            issues.push(format!("symbol at position {position} is blank"));
            continue;
        }
        if symbol.chars().any(|c| c.is_whitespace() || c == '/') {
            issues.push(format!(
                "symbol `{symbol}` contains characters not allowed in a file name"
            ));
        }
        if !seen.insert(symbol.as_str()) {
            duplicates.push(symbol.as_str());
        }
    }

    if !duplicates.is_empty() {
        issues.push(format!(
            "symbol list contains duplicates: {}",
            duplicates.join(", ")
        ));
    }
}

fn validate_window(window_days: u32, issues: &mut Vec<String>) {
    if window_days == 0 {
        issues.push("window_days must be at least 1".to_string());
    }
}

fn validate_provider(provider: &ProviderConfig, issues: &mut Vec<String>) {
    if provider.endpoint.trim().is_empty() {
        issues.push("provider.endpoint must not be empty".to_string());
    }
    if provider.timeout.is_zero() {
        issues.push("provider.timeout must be greater than zero".to_string());
    }
}
