//! Parquet snapshot I/O.
//!
//! Writes go through a staged temp file (`{file}.parquet.tmp`) that is
//! renamed into place, so a snapshot name never refers to a half-written
//! file. The temp suffix keeps staged files out of every snapshot pattern.

use super::naming::SnapshotKey;
use super::provider::DataError;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A snapshot file found on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size_bytes: u64,
}

impl SnapshotFile {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Read a snapshot into a DataFrame.
pub fn read_snapshot(path: &Path) -> Result<DataFrame, DataError> {
    let file = fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| DataError::ParquetError(format!("read {}: {e}", path.display())))
}

/// Write a snapshot, atomically replacing anything at `path`.
pub fn write_snapshot(df: &DataFrame, path: &Path) -> Result<(), DataError> {
    stage_snapshot(df, path)?.commit()
}

/// A fully written snapshot waiting to be renamed onto its final name.
#[derive(Debug)]
#[must_use = "a staged snapshot must be committed or discarded"]
pub struct StagedSnapshot {
    tmp_path: PathBuf,
    final_path: PathBuf,
}

impl StagedSnapshot {
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Rename the staged file onto its final name.
    pub fn commit(self) -> Result<(), DataError> {
        fs::rename(&self.tmp_path, &self.final_path).map_err(|e| {
            let _ = fs::remove_file(&self.tmp_path);
            DataError::io(&self.final_path, e)
        })
    }

    /// Drop the staged file without publishing it.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp_path);
    }
}

/// Write `df` next to `path` under a temporary name.
pub fn stage_snapshot(df: &DataFrame, path: &Path) -> Result<StagedSnapshot, DataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let tmp_path = path.with_extension("parquet.tmp");
    let file = fs::File::create(&tmp_path).map_err(|e| DataError::io(&tmp_path, e))?;
    if let Err(e) = ParquetWriter::new(file).finish(&mut df.clone()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(DataError::ParquetError(format!(
            "write {}: {e}",
            tmp_path.display()
        )));
    }

    Ok(StagedSnapshot {
        tmp_path,
        final_path: path.to_path_buf(),
    })
}

/// List the regular files directly under `dir` matching `key`'s pattern.
///
/// A missing directory simply has no snapshots. Matching entries whose
/// metadata cannot be read (dangling symlinks, files removed mid-scan) are
/// logged and skipped. Order is unspecified.
pub fn list_snapshots(dir: &Path, key: &SnapshotKey) -> Result<Vec<SnapshotFile>, DataError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DataError::io(dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !key.matches(name) {
            continue;
        }

        let path = entry.path();
        let (meta, modified) = match fs::metadata(&path).and_then(|m| {
            let modified = m.modified()?;
            Ok((m, modified))
        }) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable snapshot");
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }

        found.push(SnapshotFile {
            path,
            modified,
            size_bytes: meta.len(),
        });
    }

    Ok(found)
}
