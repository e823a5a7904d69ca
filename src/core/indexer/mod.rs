//! Document indexing module.
//!
//! Turns vault documents into searchable chunks:
//!
//! - Ingestion gate: extension allow-list and excluded path fragments
//! - Line-oriented chunking with configurable size and overlap
//! - Content-type detection and tag extraction per chunk
//! - Document sources (filesystem vault, in-memory)
//! - Pipeline orchestration with progress reporting
//! - File watching mapped onto index mutations
//!
//! # Safety
//!
//! Chunk sizes are counted in characters and text is only ever split
//! at line boundaries, so multi-byte UTF-8 content never panics.

pub mod chunker;
pub mod gate;
pub mod metadata;
pub mod pipeline;
pub mod source;
pub mod watcher;

pub use chunker::Chunker;
pub use gate::IngestionGate;
pub use metadata::{detect_content_type, extract_tags, profile_document, DocumentProfile};
pub use pipeline::IndexingPipeline;
pub use source::{DocumentSource, FsDocumentSource, MemorySource};
pub use watcher::{
    apply_change, classify_path, sync_paths, AppliedChange, ChangeKind, FileChange, VaultWatcher,
};
