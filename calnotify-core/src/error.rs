//! Error types for calnotify.

use thiserror::Error;

/// Errors that can occur in calnotify operations.
#[derive(Error, Debug)]
pub enum CalNotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event '{summary}': {reason}")]
    InvalidEvent { summary: String, reason: String },

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid notification template '{template}': {reason}")]
    Template { template: String, reason: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid sound asset '{path}': {reason}")]
    SoundAsset { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CalNotifyError {
    pub(crate) fn invalid_event(summary: &str, reason: impl Into<String>) -> Self {
        CalNotifyError::InvalidEvent {
            summary: summary.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for calnotify operations.
pub type CalNotifyResult<T> = Result<T, CalNotifyError>;
