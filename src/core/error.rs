//! Error types and error handling for vaultdex.
//!
//! Absence is never an error in this crate: unknown documents, tags
//! or search misses come back as empty results. The variants below
//! cover configuration problems, corrupt index data and I/O failures
//! at the edges (filesystem source, index file, watcher).

use thiserror::Error;

/// Result type alias for vaultdex operations
pub type Result<T> = std::result::Result<T, VaultdexError>;

/// Main error type for vaultdex
#[derive(Error, Debug)]
pub enum VaultdexError {
    #[error("Invalid indexing policy: {0}")]
    InvalidPolicy(String),

    #[error("Malformed index data: {0}")]
    MalformedIndexData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl VaultdexError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            VaultdexError::InvalidPolicy(_)
                | VaultdexError::MalformedIndexData(_)
                | VaultdexError::ConfigError(_)
        )
    }

    /// Check if this error originated in the index data itself
    pub fn is_malformed_data(&self) -> bool {
        matches!(self, VaultdexError::MalformedIndexData(_))
    }
}
