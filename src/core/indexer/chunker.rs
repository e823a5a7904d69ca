//! Line-based document chunking with overlap.
//!
//! Lines are accumulated into a buffer until the buffer reaches the
//! policy's chunk size (in characters, not bytes) or the document
//! ends. Each finalized buffer becomes one [`Chunk`] tagged with its
//! content type and inline tags. The next buffer is seeded with the
//! trailing lines of the previous one.
//!
//! # Example
//!
//! ```
//! use vaultdex::core::indexer::Chunker;
//! use vaultdex::core::types::{Document, IndexingPolicy};
//!
//! let policy = IndexingPolicy::new(50, 10, [".md"], [".git/"]).unwrap();
//! let chunker = Chunker::new(&policy);
//! let doc = Document::from_epoch_millis("notes/a.md", "# Title\nBody text", 0, 0);
//! let chunks = chunker.chunk_document(&doc);
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].id, "notes/a.md-0");
//! ```

use crate::core::indexer::metadata::{detect_content_type, extract_tags};
use crate::core::types::{Chunk, ChunkMetadata, Document, IndexingPolicy};

/// Stateless chunker derived from an [`IndexingPolicy`]
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Characters that trigger finalizing a chunk
    chunk_size: usize,

    /// Trailing lines carried into the next chunk
    overlap_lines: usize,
}

/// Lines accumulated for the chunk being built
struct Buffer<'a> {
    lines: Vec<&'a str>,
    start_line: usize,
    /// Character count including one newline per line
    len: usize,
}

impl<'a> Buffer<'a> {
    fn starting_at(start_line: usize) -> Self {
        Self {
            lines: Vec::new(),
            start_line,
            len: 0,
        }
    }

    fn push(&mut self, line: &'a str) {
        self.len += line.chars().count() + 1;
        self.lines.push(line);
    }

    /// Seed a new buffer with the last `count` lines of this one.
    /// `end_line` is the source index of this buffer's last line.
    fn carry_over(&self, count: usize, end_line: usize) -> Buffer<'a> {
        let count = count.min(self.lines.len());
        let mut next = Buffer::starting_at(end_line + 1 - count);
        for line in &self.lines[self.lines.len() - count..] {
            next.push(line);
        }
        next
    }
}

impl Chunker {
    /// Create a chunker for the given policy
    pub fn new(policy: &IndexingPolicy) -> Self {
        Self {
            chunk_size: policy.chunk_size_chars(),
            overlap_lines: policy.overlap_lines(),
        }
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the number of overlap lines.
    pub fn overlap_lines(&self) -> usize {
        self.overlap_lines
    }

    /// Split a document into ordered, overlapping chunks.
    ///
    /// Chunk ids are `{document.id}-{n}` with `n` counting only the
    /// chunks actually emitted, so ids stay contiguous even when a
    /// whitespace-only buffer is dropped. Empty text yields no chunks.
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        let lines: Vec<&str> = document.text.lines().collect();
        let Some(last_line) = lines.len().checked_sub(1) else {
            return Vec::new();
        };

        let mut chunks = Vec::new();
        let mut buffer = Buffer::starting_at(0);

        for (line_idx, line) in lines.iter().enumerate() {
            buffer.push(line);

            if buffer.len < self.chunk_size && line_idx != last_line {
                continue;
            }

            let raw = buffer.lines.join("\n");
            let content = raw.trim();
            if !content.is_empty() {
                chunks.push(Chunk {
                    id: format!("{}-{}", document.id, chunks.len()),
                    content: content.to_string(),
                    metadata: ChunkMetadata {
                        document_id: document.id.clone(),
                        start_line: buffer.start_line,
                        end_line: line_idx,
                        content_type: detect_content_type(content),
                        tags: extract_tags(content),
                        created_at: document.created_at,
                        modified_at: document.modified_at,
                    },
                    embedding: None,
                });
            }

            if line_idx < last_line {
                buffer = buffer.carry_over(self.overlap_lines, line_idx);
            }
        }

        tracing::debug!(
            "Chunked {} ({} lines) into {} chunks",
            document.id,
            lines.len(),
            chunks.len()
        );

        chunks
    }
}
