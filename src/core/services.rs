//! Unified service container for vaultdex
//!
//! Provides shared access to the configuration and the chunk index.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::{FsDocumentSource, IndexingPipeline, IngestionGate};
use crate::core::storage::{self, ChunkIndex};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// The chunk index every command operates on
    pub index: Arc<ChunkIndex>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services with an empty index
    pub fn new(config: Config) -> Self {
        Self {
            index: Arc::new(ChunkIndex::new()),
            config: Arc::new(config),
        }
    }

    /// Where the index is persisted
    pub fn index_file(&self) -> PathBuf {
        self.config.index_file()
    }

    /// Create an IndexingPipeline over the shared index using the
    /// configured policy
    pub fn create_pipeline(&self) -> Result<IndexingPipeline> {
        let policy = self.config.indexing.policy()?;
        Ok(IndexingPipeline::new(policy, Arc::clone(&self.index)))
    }

    /// Create a filesystem source for a vault root using the
    /// configured policy and size limit
    pub fn create_source(&self, root: &Path) -> Result<FsDocumentSource> {
        let policy = self.config.indexing.policy()?;
        FsDocumentSource::new(
            root,
            IngestionGate::new(&policy),
            self.config.indexing.max_file_size_mb,
        )
    }

    /// Load the persisted index, if any, into the shared index
    pub fn load_index(&self) -> Result<Option<usize>> {
        storage::load_index(&self.index, &self.index_file())
    }

    /// Persist the shared index
    pub fn save_index(&self) -> Result<()> {
        storage::save_index(&self.index, &self.index_file())
    }
}
