use thiserror::Error;

/// Top-level error type for Annadata Connect.
#[derive(Debug, Error)]
pub enum AnnadataError {
    /// Error from a hosted model provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Input or output did not match its declared schema.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Translation catalog or language error.
    #[error("localization error: {0}")]
    Localization(String),

    /// Persisted preference storage error.
    #[error("preferences error: {0}")]
    Preferences(String),

    /// Marketplace cart/wallet error.
    #[error("market error: {0}")]
    Market(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
