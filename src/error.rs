use std::path::PathBuf;

use thiserror::Error;

/// Failures that callers are expected to branch on. Everything else is
/// propagated as an `anyhow` chain with context.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to decode {path}: {reason}")]
    InputDecode { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}
