//! Configuration management.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, VaultdexError};
use crate::core::types::{IndexingPolicy, ASSUMED_AVG_LINE_LENGTH};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Average line length used to turn `overlap` into whole lines
    #[serde(default = "default_avg_line_length")]
    pub assumed_avg_line_length: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Extensions eligible for indexing, e.g. ".md"
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Path fragments that exclude a document when contained in its path
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Index file location; resolved from the XDG data dir when unset
    #[serde(default)]
    pub index_file: Option<PathBuf>,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to display
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

// Default value functions
fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

fn default_avg_line_length() -> usize {
    ASSUMED_AVG_LINE_LENGTH
}

fn default_max_file_size() -> usize {
    10
}

fn default_limit() -> usize {
    20
}

fn default_allowed_extensions() -> Vec<String> {
    [".md", ".txt", ".json", ".yaml", ".yml"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_excluded_paths() -> Vec<String> {
    [".obsidian/", "node_modules/", ".git/"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            assumed_avg_line_length: default_avg_line_length(),
            max_file_size_mb: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
            excluded_paths: default_excluded_paths(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl IndexingConfig {
    /// Build the validated chunking and ingestion policy
    pub fn policy(&self) -> Result<IndexingPolicy> {
        IndexingPolicy::new(
            self.chunk_size,
            self.overlap,
            &self.allowed_extensions,
            self.excluded_paths.iter().cloned(),
        )?
        .with_assumed_avg_line_length(self.assumed_avg_line_length)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VaultdexError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// The config file is VAULTDEX_CONFIG when set, otherwise the XDG
    /// config file if it exists, otherwise defaults. An explicitly named
    /// file that is missing is an error.
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let config_file = xdg.config_file();
        let explicit = env::var_os("VAULTDEX_CONFIG").is_some();

        let mut config = if explicit || config_file.exists() {
            Self::from_file(&config_file)?
        } else {
            Self::default()
        };

        config.merge_env();

        if config.storage.index_file.is_none() {
            config.storage.index_file = Some(xdg.index_file());
        }

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        override_from_env("VAULTDEX_CHUNK_SIZE", &mut self.indexing.chunk_size);
        override_from_env("VAULTDEX_OVERLAP", &mut self.indexing.overlap);
        override_from_env(
            "VAULTDEX_AVG_LINE_LENGTH",
            &mut self.indexing.assumed_avg_line_length,
        );
        override_from_env("VAULTDEX_MAX_FILE_SIZE_MB", &mut self.indexing.max_file_size_mb);
        override_from_env("VAULTDEX_DEFAULT_LIMIT", &mut self.search.default_limit);

        if let Ok(index_file) = env::var("VAULTDEX_INDEX_FILE") {
            self.storage.index_file = Some(PathBuf::from(index_file));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.indexing
            .policy()
            .map_err(|e| VaultdexError::ConfigError(e.message()))?;

        if self.indexing.max_file_size_mb == 0 {
            return Err(VaultdexError::ConfigError(
                "Max file size must be non-zero".to_string(),
            ));
        }

        if self.search.default_limit == 0 {
            return Err(VaultdexError::ConfigError(
                "Default limit must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Index file location, falling back to the XDG default
    pub fn index_file(&self) -> PathBuf {
        self.storage
            .index_file
            .clone()
            .unwrap_or_else(|| XdgDirs::new().index_file())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!(
            "  Assumed line length: {} chars",
            self.indexing.assumed_avg_line_length
        );
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!("  Extensions: {:?}", self.indexing.allowed_extensions);
        tracing::info!("  Excluded paths: {:?}", self.indexing.excluded_paths);
        tracing::info!("  Index file: {:?}", self.index_file());
        tracing::info!("  Default limit: {}", self.search.default_limit);
    }
}

/// Parse `var` into `target` when set; unparsable values are ignored
/// with a warning
fn override_from_env<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(raw) = env::var(var) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring {}={:?}: not a valid number", var, raw),
        }
    }
}
