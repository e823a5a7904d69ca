//! Index file persistence.
//!
//! The index file holds exactly what [`ChunkIndex::export_all`]
//! produces. Saves go through a temporary sibling file and a rename so
//! a crash mid-write never leaves a truncated index behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::core::storage::ChunkIndex;

/// Write the index to `path`, creating parent directories as needed
pub fn save_index(index: &ChunkIndex, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = index.export_all()?;
    let tmp = temp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    tracing::debug!("Saved {} chunks to {:?}", index.len(), path);
    Ok(())
}

/// Replace the index contents with the file at `path`.
///
/// A missing file is not an error: the index is left untouched and
/// `Ok(None)` is returned. Otherwise returns the imported chunk count.
pub fn load_index(index: &ChunkIndex, path: &Path) -> Result<Option<usize>> {
    if !path.exists() {
        tracing::debug!("No index file at {:?}", path);
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let count = index.import_all(&contents)?;

    tracing::debug!("Loaded {} chunks from {:?}", count, path);
    Ok(Some(count))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
