//! Document sources.
//!
//! The indexer never reads files itself; it asks a [`DocumentSource`]
//! to list eligible documents and to read one by id. Two sources are
//! provided:
//!
//! - [`FsDocumentSource`]: walks a vault directory on disk
//! - [`MemorySource`]: holds documents in memory (hosts that already
//!   have the content, and tests)

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, VaultdexError};
use crate::core::indexer::IngestionGate;
use crate::core::types::{normalize_extension, Document, DocumentRef};

/// Narrow read interface onto wherever documents live
pub trait DocumentSource {
    /// Enumerate documents that pass the ingestion gate
    fn list_eligible_documents(&self) -> Result<Vec<DocumentRef>>;

    /// Read a document's text and timestamps
    fn read_document(&self, id: &str) -> Result<Document>;
}

/// Filesystem-backed source rooted at a vault directory.
///
/// Document ids are vault-relative paths using `/` separators.
pub struct FsDocumentSource {
    root: PathBuf,
    gate: IngestionGate,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl FsDocumentSource {
    /// Create a source for `root`
    ///
    /// # Arguments
    ///
    /// * `root` - Vault directory (must exist)
    /// * `gate` - Eligibility filter applied while listing
    /// * `max_file_size_mb` - Maximum file size in megabytes
    pub fn new(root: &Path, gate: IngestionGate, max_file_size_mb: usize) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| {
            VaultdexError::InvalidPath(format!("{}: {e}", root.display()))
        })?;

        if !root.is_dir() {
            return Err(VaultdexError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(Self {
            root,
            gate,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Canonical vault root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn gate(&self) -> &IngestionGate {
        &self.gate
    }

    /// Map an absolute path inside the vault to its document id
    pub fn id_for_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<_>>()?;

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Resolve a document id back to a path, refusing ids that would
    /// escape the vault
    pub fn path_for_id(&self, id: &str) -> Result<PathBuf> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));

        if id.is_empty() || escapes {
            return Err(VaultdexError::InvalidPath(format!(
                "document id '{id}' is not a vault-relative path"
            )));
        }

        Ok(self.root.join(relative))
    }

    /// Check a single file against every listing filter.
    ///
    /// Returns `None` for paths outside the vault, paths below a hidden
    /// directory, paths the gate rejects and files above the size limit.
    pub fn eligible(&self, path: &Path) -> Option<DocumentRef> {
        let Some(id) = self.id_for_path(path) else {
            tracing::debug!("Skipping path outside vault or non UTF-8: {:?}", path);
            return None;
        };

        let mut parts: Vec<&str> = id.split('/').collect();
        parts.pop();
        if parts.iter().any(|dir| dir.starts_with('.')) {
            return None;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
            .unwrap_or_default();

        if !self.gate.should_index(&id, &extension) {
            return None;
        }

        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        if metadata.len() > self.max_file_size_bytes {
            tracing::debug!(
                "Skipping large file: {:?} ({} bytes)",
                path,
                metadata.len()
            );
            return None;
        }

        Some(DocumentRef {
            id,
            path: path.to_path_buf(),
            extension,
        })
    }

    /// Skip hidden directories below the root
    fn should_descend(entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        !entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
    }
}

impl DocumentSource for FsDocumentSource {
    fn list_eligible_documents(&self) -> Result<Vec<DocumentRef>> {
        let mut docs = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(Self::should_descend)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(doc_ref) = self.eligible(entry.path()) {
                docs.push(doc_ref);
            }
        }

        Ok(docs)
    }

    fn read_document(&self, id: &str) -> Result<Document> {
        let path = self.path_for_id(id)?;

        let text = fs::read_to_string(&path).map_err(|e| {
            // Binary files surface as invalid UTF-8
            if e.kind() == std::io::ErrorKind::InvalidData {
                VaultdexError::IndexingFailed(format!("Skipping non-UTF-8 file: {path:?}"))
            } else {
                VaultdexError::IndexingFailed(format!("Failed to read {path:?}: {e}"))
            }
        })?;

        let metadata = fs::metadata(&path)?;
        let modified_at: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::from)
            .unwrap_or_default();
        // Not every filesystem records creation time
        let created_at = metadata
            .created()
            .map(DateTime::from)
            .unwrap_or(modified_at);

        Ok(Document {
            id: id.to_string(),
            text,
            created_at,
            modified_at,
        })
    }
}

/// In-memory source keyed by document id.
///
/// Extensions are taken from the id; ids are listed in sorted order.
pub struct MemorySource {
    gate: IngestionGate,
    documents: BTreeMap<String, Document>,
}

impl MemorySource {
    pub fn new(gate: IngestionGate) -> Self {
        Self {
            gate,
            documents: BTreeMap::new(),
        }
    }

    /// Add or replace a document
    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.id.clone(), document);
    }

    /// Drop a document, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        self.documents.remove(id)
    }
}

impl DocumentSource for MemorySource {
    fn list_eligible_documents(&self) -> Result<Vec<DocumentRef>> {
        Ok(self
            .documents
            .keys()
            .filter_map(|id| {
                let extension = Path::new(id)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(normalize_extension)?;
                self.gate.should_index(id, &extension).then(|| DocumentRef {
                    id: id.clone(),
                    path: PathBuf::from(id),
                    extension,
                })
            })
            .collect())
    }

    fn read_document(&self, id: &str) -> Result<Document> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| VaultdexError::InvalidPath(format!("unknown document '{id}'")))
    }
}
