//! In-memory chunk index.
//!
//! [`ChunkIndex`] owns every chunk across every document. All
//! mutations take a single write lock, so replacing a document's
//! chunk set (remove old, insert new) is one atomic step for readers.
//! Reads return owned copies in insertion order.
//!
//! Growth is unbounded: the index holds whatever the host indexes.
//! Memory use is roughly the total text of the indexed documents plus
//! the overlap duplication and per-chunk metadata.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::error::{Result, VaultdexError};
use crate::core::types::{Chunk, ContentType, IndexStats, UpsertOutcome};

/// Process-wide mutable store of chunks, keyed by chunk id
#[derive(Debug, Default)]
pub struct ChunkIndex {
    chunks: RwLock<Vec<Chunk>>,
}

impl ChunkIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single retain/extend/replace, so a poisoned
    // lock still guards a consistent Vec.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Chunk>> {
        self.chunks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Chunk>> {
        self.chunks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace every chunk of `document_id` with `chunks`.
    ///
    /// Chunks that name a different owning document are dropped with
    /// a warning. Existing chunks whose ids collide with the new ones
    /// are replaced as well, keeping ids unique.
    pub fn upsert_document(&self, document_id: &str, chunks: Vec<Chunk>) -> UpsertOutcome {
        let (owned, foreign): (Vec<Chunk>, Vec<Chunk>) = chunks
            .into_iter()
            .partition(|c| c.metadata.document_id == document_id);

        if !foreign.is_empty() {
            tracing::warn!(
                "Dropped {} chunks not owned by {} during upsert",
                foreign.len(),
                document_id
            );
        }

        let new_ids: HashSet<&str> = owned.iter().map(|c| c.id.as_str()).collect();

        let (removed, evicted) = {
            let mut store = self.write();
            let before = store.len();
            let mut evicted = 0;
            store.retain(|c| {
                if c.metadata.document_id == document_id {
                    return false;
                }
                if new_ids.contains(c.id.as_str()) {
                    evicted += 1;
                    return false;
                }
                true
            });
            let removed = before - store.len();
            store.extend(owned.iter().cloned());
            (removed, evicted)
        };

        if evicted > 0 {
            tracing::warn!(
                "Upsert of {} evicted {} chunks of other documents with colliding ids",
                document_id,
                evicted
            );
        }

        let outcome = UpsertOutcome {
            removed,
            inserted: owned.len(),
        };

        tracing::info!(
            "Indexed {}: {} chunks ({} replaced)",
            document_id,
            outcome.inserted,
            outcome.removed
        );

        outcome
    }

    /// Remove every chunk of `document_id`; returns how many were
    /// removed (0 for an unknown document)
    pub fn remove_document(&self, document_id: &str) -> usize {
        let removed = {
            let mut store = self.write();
            let before = store.len();
            store.retain(|c| c.metadata.document_id != document_id);
            before - store.len()
        };

        if removed > 0 {
            tracing::info!("Removed {} chunks of {} from index", removed, document_id);
        }

        removed
    }

    /// Every chunk, in insertion order
    pub fn chunks(&self) -> Vec<Chunk> {
        self.read().clone()
    }

    /// Chunks of one document, in chunk order
    pub fn get_by_document(&self, document_id: &str) -> Vec<Chunk> {
        self.filter(|c| c.metadata.document_id == document_id)
    }

    pub fn get_by_content_type(&self, content_type: ContentType) -> Vec<Chunk> {
        self.filter(|c| c.metadata.content_type == content_type)
    }

    /// Chunks carrying `tag` (given without the leading `#`)
    pub fn get_by_tag(&self, tag: &str) -> Vec<Chunk> {
        self.filter(|c| c.metadata.tags.contains(tag))
    }

    /// Case-insensitive substring search over chunk content.
    ///
    /// No ranking or tokenization: every chunk containing the query is
    /// returned in insertion order. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<Chunk> {
        let needle = query.to_lowercase();
        self.filter(|c| c.content.to_lowercase().contains(&needle))
    }

    fn filter(&self, predicate: impl Fn(&Chunk) -> bool) -> Vec<Chunk> {
        self.read()
            .iter()
            .filter(|c| predicate(c))
            .cloned()
            .collect()
    }

    /// Whether any chunk of `document_id` is stored
    pub fn contains_document(&self, document_id: &str) -> bool {
        self.read()
            .iter()
            .any(|c| c.metadata.document_id == document_id)
    }

    /// Distinct owning document ids, sorted
    pub fn document_ids(&self) -> Vec<String> {
        let store = self.read();
        let ids: BTreeSet<&str> = store
            .iter()
            .map(|c| c.metadata.document_id.as_str())
            .collect();
        ids.into_iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Aggregate statistics
    pub fn stats(&self) -> IndexStats {
        let store = self.read();

        let documents: HashSet<&str> = store
            .iter()
            .map(|c| c.metadata.document_id.as_str())
            .collect();

        let total_chars: usize = store.iter().map(|c| c.content.chars().count()).sum();
        let average_chunk_size = if store.is_empty() {
            0
        } else {
            (total_chars as f64 / store.len() as f64).round() as usize
        };

        let mut type_distribution = BTreeMap::new();
        for chunk in store.iter() {
            *type_distribution
                .entry(chunk.metadata.content_type)
                .or_insert(0) += 1;
        }

        IndexStats {
            total_chunks: store.len(),
            total_documents: documents.len(),
            average_chunk_size,
            type_distribution,
        }
    }

    /// Serialize the whole index as a pretty-printed JSON array
    pub fn export_all(&self) -> Result<String> {
        let store = self.read();
        Ok(serde_json::to_string_pretty(&*store)?)
    }

    /// Replace the whole index with previously exported data.
    ///
    /// The data is parsed and validated before the index is touched;
    /// on any error the current contents are left as they were.
    /// Returns the number of chunks imported.
    pub fn import_all(&self, data: &str) -> Result<usize> {
        let chunks: Vec<Chunk> = serde_json::from_str(data)
            .map_err(|e| VaultdexError::MalformedIndexData(e.to_string()))?;

        validate_chunks(&chunks)?;

        let count = chunks.len();
        *self.write() = chunks;

        tracing::info!("Imported {} chunks", count);
        Ok(count)
    }

    /// Empty the index; returns how many chunks were dropped
    pub fn clear(&self) -> usize {
        let dropped = std::mem::take(&mut *self.write()).len();
        tracing::info!("Index cleared ({} chunks)", dropped);
        dropped
    }
}

/// Schema checks serde cannot express
fn validate_chunks(chunks: &[Chunk]) -> Result<()> {
    let mut seen = HashSet::with_capacity(chunks.len());

    for (pos, chunk) in chunks.iter().enumerate() {
        if chunk.id.is_empty() {
            return Err(VaultdexError::MalformedIndexData(format!(
                "chunk at position {pos} has an empty id"
            )));
        }
        if !seen.insert(chunk.id.as_str()) {
            return Err(VaultdexError::MalformedIndexData(format!(
                "duplicate chunk id '{}'",
                chunk.id
            )));
        }
        if chunk.metadata.document_id.is_empty() {
            return Err(VaultdexError::MalformedIndexData(format!(
                "chunk '{}' has an empty document id",
                chunk.id
            )));
        }
        if chunk.content.trim().is_empty() {
            return Err(VaultdexError::MalformedIndexData(format!(
                "chunk '{}' has empty content",
                chunk.id
            )));
        }
        if chunk.metadata.start_line > chunk.metadata.end_line {
            return Err(VaultdexError::MalformedIndexData(format!(
                "chunk '{}' starts at line {} after it ends at line {}",
                chunk.id, chunk.metadata.start_line, chunk.metadata.end_line
            )));
        }
    }

    Ok(())
}
