//! Moves superseded snapshots into `{data_folder}/old/`.
//!
//! Best effort: a file that cannot be moved is logged and left in place, and
//! the remaining files are still processed. Nothing is ever deleted; a
//! same-named file already in the archive is overwritten by the move.

use super::naming::{SnapshotKey, ARCHIVE_DIR};
use super::provider::DataError;
use super::snapshot::list_snapshots;
use std::fs;
use std::path::{Path, PathBuf};

/// What one archive pass did.
#[derive(Debug, Default)]
pub struct ArchiveSummary {
    /// Destinations of the files that were moved.
    pub moved: Vec<PathBuf>,
    /// Files that stayed put, with the reason.
    pub failed: Vec<(PathBuf, DataError)>,
}

/// Path of the archive directory for `data_folder`.
pub fn archive_dir(data_folder: &Path) -> PathBuf {
    data_folder.join(ARCHIVE_DIR)
}

/// Archive every current snapshot of `key` found directly under `data_folder`.
///
/// Only fails when the archive directory itself cannot be created or the
/// data folder cannot be listed; individual move failures land in
/// [`ArchiveSummary::failed`].
pub fn archive_old_files(data_folder: &Path, key: &SnapshotKey) -> Result<ArchiveSummary, DataError> {
    let old_dir = archive_dir(data_folder);
    fs::create_dir_all(&old_dir).map_err(|e| DataError::io(&old_dir, e))?;

    let mut summary = ArchiveSummary::default();

    for snapshot in list_snapshots(data_folder, key)? {
        let destination = old_dir.join(snapshot.file_name());
        tracing::info!(
            asset = key.name(),
            from = %snapshot.path.display(),
            to = %destination.display(),
            "archiving superseded snapshot"
        );

        match fs::rename(&snapshot.path, &destination) {
            Ok(()) => summary.moved.push(destination),
            Err(e) => {
                tracing::warn!(
                    asset = key.name(),
                    file = snapshot.file_name(),
                    error = %e,
                    "failed to archive snapshot"
                );
                let err = DataError::io(&snapshot.path, e);
                summary.failed.push((snapshot.path, err));
            }
        }
    }

    Ok(summary)
}
