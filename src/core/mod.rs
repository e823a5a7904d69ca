//! Core domain logic (frontend-agnostic)
//!
//! Everything here is independent of the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Chunks, documents, policy and statistics
//! - **xdg**: XDG directory handling
//! - **indexer**: Ingestion gate, chunker, sources, pipeline, watcher
//! - **storage**: The chunk index and its file format
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, VaultdexError};
pub use services::Services;
