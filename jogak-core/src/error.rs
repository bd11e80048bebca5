//! Error types for loading, configuration and serialization
//!
//! Segmentation itself never fails: every classification and cleaning
//! decision is total over its input. Errors only arise at the edges where
//! documents are read, configuration is validated, or records are written.

use thiserror::Error;

/// Error type for jogak-core operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid segmentation configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid lexicon definition
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// Upstream document could not be interpreted as a page list
    #[error("invalid document {source_id}: {reason}")]
    InvalidDocument {
        /// File or identifier of the offending document
        source_id: String,
        /// What was wrong with it
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for jogak-core operations
pub type Result<T> = std::result::Result<T, Error>;
