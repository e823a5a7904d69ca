//! File-change notifications mapped onto index mutations.
//!
//! [`VaultWatcher`] turns debounced filesystem events into batches of
//! changed paths. [`classify_path`] decides what each path means for
//! the index and [`apply_change`] performs the mutation:
//!
//! - created or modified document: chunk and upsert
//! - deleted document: remove its chunks
//!
//! Renames arrive as a delete of the old path plus a create of the new
//! one.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::core::error::{Result, VaultdexError};
use crate::core::indexer::{DocumentSource, FsDocumentSource, IndexingPipeline};
use crate::core::storage::ChunkIndex;
use crate::core::types::{Document, UpsertOutcome};

/// A change to one document
#[derive(Debug, Clone, PartialEq)]
pub enum FileChange {
    Created(Document),
    Modified(Document),
    /// Carries the id of the document that went away
    Deleted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl FileChange {
    pub fn kind(&self) -> ChangeKind {
        match self {
            FileChange::Created(_) => ChangeKind::Created,
            FileChange::Modified(_) => ChangeKind::Modified,
            FileChange::Deleted(_) => ChangeKind::Deleted,
        }
    }

    pub fn document_id(&self) -> &str {
        match self {
            FileChange::Created(doc) | FileChange::Modified(doc) => &doc.id,
            FileChange::Deleted(id) => id,
        }
    }
}

/// Result of applying one change, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedChange {
    pub kind: ChangeKind,
    pub document_id: String,
    pub outcome: UpsertOutcome,
}

/// Apply a single change to the pipeline's index
pub fn apply_change(pipeline: &IndexingPipeline, change: &FileChange) -> UpsertOutcome {
    match change {
        FileChange::Created(doc) | FileChange::Modified(doc) => {
            let chunks = pipeline.chunker().chunk_document(doc);
            pipeline.index().upsert_document(&doc.id, chunks)
        }
        FileChange::Deleted(id) => UpsertOutcome {
            removed: pipeline.remove_document(id),
            inserted: 0,
        },
    }
}

/// Work out which changes a touched path implies.
///
/// An eligible file is read and reported as created or modified
/// depending on whether the index already holds it. A missing or no
/// longer eligible path yields deletions for the document stored under
/// it and, for a removed directory, every document below it. Existing
/// directories yield nothing; their files report their own events.
pub fn classify_path(
    source: &FsDocumentSource,
    index: &ChunkIndex,
    path: &Path,
) -> Result<Vec<FileChange>> {
    let Some(id) = source.id_for_path(path) else {
        return Ok(Vec::new());
    };

    if path.is_dir() {
        return Ok(Vec::new());
    }

    if let Some(doc_ref) = source.eligible(path) {
        let document = source.read_document(&doc_ref.id)?;
        let change = if index.contains_document(&doc_ref.id) {
            FileChange::Modified(document)
        } else {
            FileChange::Created(document)
        };
        return Ok(vec![change]);
    }

    let nested = format!("{id}/");
    Ok(index
        .document_ids()
        .into_iter()
        .filter(|doc_id| *doc_id == id || doc_id.starts_with(&nested))
        .map(FileChange::Deleted)
        .collect())
}

/// Classify and apply a batch of touched paths.
///
/// Paths that cannot be read are logged and skipped so one bad file
/// does not stall the watch loop.
pub fn sync_paths(
    pipeline: &IndexingPipeline,
    source: &FsDocumentSource,
    paths: &[PathBuf],
) -> Vec<AppliedChange> {
    let mut applied = Vec::new();

    for path in paths {
        let changes = match classify_path(source, pipeline.index(), path) {
            Ok(changes) => changes,
            Err(e) => {
                tracing::warn!("Skipping change to {:?}: {}", path, e);
                continue;
            }
        };

        for change in changes {
            let outcome = apply_change(pipeline, &change);
            tracing::debug!(
                "{:?} {} (-{} +{})",
                change.kind(),
                change.document_id(),
                outcome.removed,
                outcome.inserted
            );
            applied.push(AppliedChange {
                kind: change.kind(),
                document_id: change.document_id().to_string(),
                outcome,
            });
        }
    }

    applied
}

/// Debounced recursive watch on a vault root
pub struct VaultWatcher {
    root: PathBuf,
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<DebounceEventResult>,
}

impl VaultWatcher {
    /// Start watching `root` recursively, coalescing events that arrive
    /// within `debounce` of each other
    pub fn new(root: &Path, debounce: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let mut debouncer = new_debouncer(debounce, move |res: DebounceEventResult| {
            // Receiver gone means the watcher is being dropped
            let _ = tx.send(res);
        })
        .map_err(watch_error)?;

        debouncer
            .watcher()
            .watch(root, RecursiveMode::Recursive)
            .map_err(watch_error)?;

        tracing::info!("Watching {:?}", root);

        Ok(Self {
            root: root.to_path_buf(),
            _debouncer: debouncer,
            events: rx,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait up to `timeout` for the next batch of changed paths.
    ///
    /// Returns `Ok(None)` on timeout. Paths are deduplicated and sorted.
    /// Backend errors inside a batch are logged and yield an empty
    /// batch; a dead backend is a `WatchError`.
    pub fn next_batch(&self, timeout: Duration) -> Result<Option<Vec<PathBuf>>> {
        match self.events.recv_timeout(timeout) {
            Ok(Ok(events)) => {
                let paths: BTreeSet<PathBuf> = events.into_iter().map(|e| e.path).collect();
                Ok(Some(paths.into_iter().collect()))
            }
            Ok(Err(e)) => {
                tracing::warn!("Watch error: {}", e);
                Ok(Some(Vec::new()))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(VaultdexError::WatchError(
                "file watcher stopped unexpectedly".to_string(),
            )),
        }
    }
}

fn watch_error(e: notify::Error) -> VaultdexError {
    VaultdexError::WatchError(e.to_string())
}
