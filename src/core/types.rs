//! Core data types for vaultdex.
//!
//! Defines the indexed unit ([`Chunk`]) and its metadata, the
//! documents handed in by a [`DocumentSource`](crate::core::indexer::DocumentSource),
//! the validated [`IndexingPolicy`] and the statistics returned by
//! the index and the indexing pipeline.
//!
//! The serialized shape of [`Chunk`] is the persisted index format:
//! a JSON array of chunks with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::{Result, VaultdexError};

/// Average line length used to turn a character overlap budget into
/// a line count. True overlap length varies with actual line lengths.
pub const ASSUMED_AVG_LINE_LENGTH: usize = 50;

/// A bounded segment of a document, the unit of indexing and retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Chunk {
    /// `{documentId}-{chunkIndex}`
    pub id: String,

    /// Trimmed text payload (never empty)
    pub content: String,

    pub metadata: ChunkMetadata,

    /// Opaque vector attached by an external embedding service.
    /// Never computed by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// Per-chunk metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChunkMetadata {
    /// Owning document
    pub document_id: String,

    /// First source line in this chunk (0-based, inclusive)
    pub start_line: usize,

    /// Last source line in this chunk (0-based, inclusive)
    pub end_line: usize,

    pub content_type: ContentType,

    /// Inline `#tags` found in the chunk text
    pub tags: BTreeSet<String>,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Coarse classification of a chunk's textual nature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Code,
    Documentation,
    TaskList,
    Table,
    Text,
    /// Reserved for classifications added after an index was written
    Other,
}

impl ContentType {
    /// All variants, in detection priority order
    pub const ALL: [ContentType; 6] = [
        ContentType::Code,
        ContentType::Documentation,
        ContentType::TaskList,
        ContentType::Table,
        ContentType::Text,
        ContentType::Other,
    ];

    /// Wire name of the content type
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Code => "code",
            ContentType::Documentation => "documentation",
            ContentType::TaskList => "task-list",
            ContentType::Table => "table",
            ContentType::Text => "text",
            ContentType::Other => "other",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = ContentType::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "Unknown content type '{s}'. Valid types: {}",
                    valid.join(", ")
                )
            })
    }
}

/// A source document as seen by the chunker
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Stable identifier (vault-relative path for filesystem sources)
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Document {
    /// Build a document from epoch-millisecond timestamps, as reported
    /// by most host file APIs. Out-of-range timestamps map to the epoch.
    pub fn from_epoch_millis(
        id: impl Into<String>,
        text: impl Into<String>,
        created_ms: i64,
        modified_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            created_at: DateTime::from_timestamp_millis(created_ms).unwrap_or_default(),
            modified_at: DateTime::from_timestamp_millis(modified_ms).unwrap_or_default(),
        }
    }
}

/// An entry in a document source listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    pub id: String,
    pub path: PathBuf,
    /// Extension with a leading dot, e.g. `.md` (empty if none)
    pub extension: String,
}

/// Chunking and ingestion policy.
///
/// Construct with [`IndexingPolicy::new`]; the constructor rejects
/// a zero chunk size and an overlap that is not smaller than the
/// chunk size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexingPolicy {
    chunk_size_chars: usize,
    overlap_chars: usize,
    assumed_avg_line_length: usize,
    allowed_extensions: BTreeSet<String>,
    excluded_path_substrings: Vec<String>,
}

impl IndexingPolicy {
    /// Create a validated policy.
    ///
    /// Extensions are normalized to lowercase with a leading dot, so
    /// `"MD"`, `"md"` and `".md"` are equivalent.
    pub fn new<E, X>(
        chunk_size_chars: usize,
        overlap_chars: usize,
        allowed_extensions: E,
        excluded_path_substrings: X,
    ) -> Result<Self>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: Into<String>,
    {
        if chunk_size_chars == 0 {
            return Err(VaultdexError::InvalidPolicy(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap_chars >= chunk_size_chars {
            return Err(VaultdexError::InvalidPolicy(format!(
                "overlap ({overlap_chars}) must be less than chunk size ({chunk_size_chars})"
            )));
        }

        Ok(Self {
            chunk_size_chars,
            overlap_chars,
            assumed_avg_line_length: ASSUMED_AVG_LINE_LENGTH,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| e.len() > 1)
                .collect(),
            excluded_path_substrings: excluded_path_substrings
                .into_iter()
                .map(Into::<String>::into)
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    /// Replace the average line length used to derive overlap lines
    pub fn with_assumed_avg_line_length(mut self, chars: usize) -> Result<Self> {
        if chars == 0 {
            return Err(VaultdexError::InvalidPolicy(
                "assumed average line length must be greater than zero".to_string(),
            ));
        }
        self.assumed_avg_line_length = chars;
        Ok(self)
    }

    pub fn chunk_size_chars(&self) -> usize {
        self.chunk_size_chars
    }

    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    pub fn assumed_avg_line_length(&self) -> usize {
        self.assumed_avg_line_length
    }

    /// Number of trailing lines carried into the next chunk
    pub fn overlap_lines(&self) -> usize {
        self.overlap_chars / self.assumed_avg_line_length
    }

    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    pub fn excluded_path_substrings(&self) -> &[String] {
        &self.excluded_path_substrings
    }
}

impl Default for IndexingPolicy {
    fn default() -> Self {
        Self {
            chunk_size_chars: 1000,
            overlap_chars: 200,
            assumed_avg_line_length: ASSUMED_AVG_LINE_LENGTH,
            allowed_extensions: [".md", ".txt", ".json", ".yaml", ".yml"]
                .into_iter()
                .map(String::from)
                .collect(),
            excluded_path_substrings: vec![
                ".obsidian/".to_string(),
                "node_modules/".to_string(),
                ".git/".to_string(),
            ],
        }
    }
}

/// Lowercase an extension and make sure it has exactly one leading dot
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

/// Result of replacing one document's chunk set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    /// Chunks dropped from the previous version of the document
    pub removed: usize,
    /// Chunks now stored for the document
    pub inserted: usize,
}

/// Aggregate statistics over the whole index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_chunks: usize,

    /// Distinct document ids
    pub total_documents: usize,

    /// Rounded mean content length in characters (0 when empty)
    pub average_chunk_size: usize,

    pub type_distribution: BTreeMap<ContentType, usize>,
}

/// Progress of a batch indexing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexProgress {
    /// Documents handled so far (indexed, skipped or failed)
    pub processed: usize,
    pub total: usize,
    pub chunks_created: usize,
    /// Document that was just handled
    pub current: String,
}

/// Summary of a batch indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Documents chunked and stored
    pub documents_indexed: usize,

    /// Documents rejected by the ingestion gate
    pub documents_skipped: usize,

    /// Documents that could not be read
    pub documents_failed: usize,

    pub chunks_created: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,
}
