//! Storage layer: the in-memory chunk index and its file format.
//!
//! # Architecture
//!
//! - **ChunkIndex**: owns all chunks, single-writer mutations
//! - **persist**: load/save the JSON export to an index file
//!
//! # Index File Format
//!
//! ```text
//! [
//!   {
//!     "id": "notes/a.md-0",
//!     "content": "# Title ...",
//!     "metadata": {
//!       "documentId": "notes/a.md",
//!       "startLine": 0,
//!       "endLine": 12,
//!       "contentType": "documentation",
//!       "tags": ["project"],
//!       "createdAt": "2025-01-01T00:00:00Z",
//!       "modifiedAt": "2025-01-02T00:00:00Z"
//!     }
//!   }
//! ]
//! ```

mod index;
pub mod persist;

pub use index::ChunkIndex;
pub use persist::{load_index, save_index};
