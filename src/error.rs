use std::fmt;

use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("provider returned {code}: {description}")]
    Provider { code: String, description: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure category printed next to per-symbol diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Provider,
    Decode,
    Io,
    Config,
    Other,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Provider => "provider",
            ErrorKind::Decode => "decode",
            ErrorKind::Io => "io",
            ErrorKind::Config => "config",
            ErrorKind::Other => "error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn provider<C: Into<String>, D: Into<String>>(code: C, description: D) -> Self {
        AppError::Provider {
            code: code.into(),
            description: description.into(),
        }
    }

    /// Classify the error, looking through `anyhow` context layers for the root cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Io(_) => ErrorKind::Io,
            AppError::Json(_) => ErrorKind::Decode,
            AppError::Reqwest(err) => classify_reqwest(err),
            AppError::Provider { .. } => ErrorKind::Provider,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Message(_) => ErrorKind::Other,
            AppError::Other(err) => {
                for cause in err.chain() {
                    if let Some(inner) = cause.downcast_ref::<AppError>() {
                        return inner.kind();
                    }
                    if let Some(inner) = cause.downcast_ref::<reqwest::Error>() {
                        return classify_reqwest(inner);
                    }
                    if cause.is::<serde_json::Error>() {
                        return ErrorKind::Decode;
                    }
                    if cause.is::<std::io::Error>() {
                        return ErrorKind::Io;
                    }
                }
                ErrorKind::Other
            }
        }
    }

    /// Render the full cause chain on one line, e.g. `History request failed for X: timed out`.
    pub fn detailed(&self) -> String {
        match self {
            AppError::Other(err) => format!("{err:#}"),
            other => other.to_string(),
        }
    }
}

fn classify_reqwest(err: &reqwest::Error) -> ErrorKind {
    if err.is_decode() {
        ErrorKind::Decode
    } else if err.is_status() {
        ErrorKind::Provider
    } else {
        ErrorKind::Network
    }
}
