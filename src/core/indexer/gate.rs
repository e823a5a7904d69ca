//! Ingestion gate: decides which documents are eligible for indexing.
//!
//! A document passes when its extension is in the allow-list and its
//! path contains none of the excluded substrings. Matching is plain
//! substring matching, not glob or regex.

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::types::{normalize_extension, IndexingPolicy};

/// Extension allow-list plus path exclude-list
#[derive(Debug, Clone)]
pub struct IngestionGate {
    /// Normalized extensions (lowercase, leading dot)
    allowed_extensions: BTreeSet<String>,

    /// Substrings that disqualify a path (e.g. ".git/")
    excluded_paths: Vec<String>,
}

impl IngestionGate {
    /// Build a gate from the policy's extension and path lists
    pub fn new(policy: &IndexingPolicy) -> Self {
        Self {
            allowed_extensions: policy.allowed_extensions().clone(),
            excluded_paths: policy.excluded_path_substrings().to_vec(),
        }
    }

    /// Check a path and its extension.
    ///
    /// The extension is compared case-insensitively and may be given
    /// with or without the leading dot.
    pub fn should_index(&self, path: &str, extension: &str) -> bool {
        if !self
            .allowed_extensions
            .contains(&normalize_extension(extension))
        {
            return false;
        }

        !self
            .excluded_paths
            .iter()
            .any(|excluded| path.contains(excluded.as_str()))
    }

    /// Check a filesystem path, deriving the extension from it.
    ///
    /// Path separators are normalized to `/` before matching so that
    /// exclusions like `.git/` behave the same on every platform.
    pub fn should_index_path(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let Some(path_str) = path.to_str() else {
            return false;
        };

        self.should_index(&path_str.replace('\\', "/"), extension)
    }
}
