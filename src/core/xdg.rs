//! XDG Base Directory Support
//!
//! Resolves where the configuration file and the index file live on
//! Linux/Unix systems.

use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "vaultdex";

/// XDG directory structure for vaultdex
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories.
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit VAULTDEX_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve("VAULTDEX_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: Self::resolve("VAULTDEX_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    fn resolve(explicit: &str, xdg_var: &str, fallback: &[&str]) -> PathBuf {
        if let Ok(dir) = env::var(explicit) {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var(xdg_var) {
            return PathBuf::from(xdg).join(APP_DIR);
        }

        let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        for part in fallback {
            dir.push(part);
        }
        dir.join(APP_DIR)
    }

    /// Config file path; VAULTDEX_CONFIG overrides the XDG location
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("VAULTDEX_CONFIG") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Default index file path
    pub fn index_file(&self) -> PathBuf {
        self.data_dir.join("index.json")
    }

    /// Create the config and data directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
        tracing::debug!("  Index file: {:?}", self.index_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
