//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end indexing workflow:
//! 1. Ask the document source for eligible documents
//! 2. Filter them through the ingestion gate
//! 3. Read and chunk each document
//! 4. Replace the document's chunk set in the index
//!
//! Chunks are computed in full before the index is touched, so a
//! failure never leaves a document half-indexed.

use std::sync::Arc;
use std::time::Instant;

use crate::core::error::Result;
use crate::core::indexer::{Chunker, DocumentSource, IngestionGate};
use crate::core::storage::ChunkIndex;
use crate::core::types::{Chunk, Document, IndexProgress, IndexSummary, IndexingPolicy};

/// Log batch progress every this many documents
const PROGRESS_LOG_INTERVAL: usize = 100;

/// Orchestrates the indexing pipeline against one index
pub struct IndexingPipeline {
    policy: IndexingPolicy,
    gate: IngestionGate,
    chunker: Chunker,
    index: Arc<ChunkIndex>,
}

impl IndexingPipeline {
    /// Create a pipeline writing into `index`
    pub fn new(policy: IndexingPolicy, index: Arc<ChunkIndex>) -> Self {
        Self {
            gate: IngestionGate::new(&policy),
            chunker: Chunker::new(&policy),
            policy,
            index,
        }
    }

    /// Active policy
    pub fn policy(&self) -> &IndexingPolicy {
        &self.policy
    }

    /// Swap in a new policy. Already indexed chunks are kept as they
    /// are; re-index to apply the new policy to them.
    pub fn set_policy(&mut self, policy: IndexingPolicy) {
        self.gate = IngestionGate::new(&policy);
        self.chunker = Chunker::new(&policy);
        self.policy = policy;
    }

    pub fn gate(&self) -> &IngestionGate {
        &self.gate
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    pub fn index(&self) -> &Arc<ChunkIndex> {
        &self.index
    }

    /// Chunk a single document and replace its chunks in the index.
    ///
    /// Returns the new chunk set. Does not consult the ingestion gate;
    /// callers holding a path should check it first.
    pub fn index_document(&self, document: &Document) -> Vec<Chunk> {
        let chunks = self.chunker.chunk_document(document);
        self.index.upsert_document(&document.id, chunks.clone());
        chunks
    }

    /// Drop a document from the index; returns the removed chunk count
    pub fn remove_document(&self, document_id: &str) -> usize {
        self.index.remove_document(document_id)
    }

    /// Index every eligible document of `source`.
    ///
    /// Documents are processed sequentially. Unreadable documents are
    /// logged and counted as failed; they do not stop the batch.
    /// `on_progress` is called once per document.
    ///
    /// # Returns
    ///
    /// A tuple of (all new chunks, summary) or an error if the source
    /// cannot be listed
    pub fn index_all<S, F>(&self, source: &S, mut on_progress: F) -> Result<(Vec<Chunk>, IndexSummary)>
    where
        S: DocumentSource + ?Sized,
        F: FnMut(&IndexProgress),
    {
        let start = Instant::now();

        // Step 1: Collect documents
        let refs = source.list_eligible_documents()?;
        tracing::info!("Found {} documents to index", refs.len());

        // Step 2: Read, chunk and store
        let mut all_chunks = Vec::new();
        let mut summary = IndexSummary::default();
        let total = refs.len();

        for (idx, doc_ref) in refs.iter().enumerate() {
            if idx % PROGRESS_LOG_INTERVAL == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} documents processed", idx, total);
            }

            if !self.gate.should_index(&doc_ref.id, &doc_ref.extension) {
                tracing::debug!("Skipping ineligible document {}", doc_ref.id);
                summary.documents_skipped += 1;
            } else {
                match source.read_document(&doc_ref.id) {
                    Ok(document) => {
                        let chunks = self.index_document(&document);
                        tracing::debug!("Indexed {} ({} chunks)", document.id, chunks.len());
                        summary.documents_indexed += 1;
                        all_chunks.extend(chunks);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to process {}: {}", doc_ref.id, e);
                        summary.documents_failed += 1;
                    }
                }
            }

            on_progress(&IndexProgress {
                processed: idx + 1,
                total,
                chunks_created: all_chunks.len(),
                current: doc_ref.id.clone(),
            });
        }

        summary.chunks_created = all_chunks.len();
        summary.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Indexing complete: {} documents indexed, {} skipped, {} failed, \
             {} chunks created in {}ms",
            summary.documents_indexed,
            summary.documents_skipped,
            summary.documents_failed,
            summary.chunks_created,
            summary.duration_ms
        );

        Ok((all_chunks, summary))
    }
}
