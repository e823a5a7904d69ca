//! vaultdex - chunking and retrieval index for note vaults
//!
//! Splits markdown and plain-text documents into overlapping,
//! line-aligned chunks annotated with a content type and tags, and
//! keeps them in an in-memory index that can be filtered, searched,
//! exported and re-imported.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - indexer (ingestion gate, chunker, sources, pipeline, watcher)
//!   - storage (chunk index, index file)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vaultdex::{ChunkIndex, Document, IndexingPipeline, IndexingPolicy};
//!
//! let index = Arc::new(ChunkIndex::new());
//! let pipeline = IndexingPipeline::new(IndexingPolicy::default(), Arc::clone(&index));
//!
//! let doc = Document::from_epoch_millis("notes/todo.md", "- [ ] write docs #work", 0, 0);
//! pipeline.index_document(&doc);
//!
//! assert_eq!(index.get_by_tag("work").len(), 1);
//! ```

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, VaultdexError};
pub use core::indexer::{
    Chunker, DocumentSource, FsDocumentSource, IndexingPipeline, IngestionGate,
};
pub use core::services::Services;
pub use core::storage::ChunkIndex;
pub use core::types::*;
