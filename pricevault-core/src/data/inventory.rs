//! Read-only inventory of the snapshot cache, per configured asset.

use super::archive::archive_dir;
use super::latest::latest_snapshot;
use super::provider::DataError;
use super::snapshot::list_snapshots;
use crate::config::AssetMap;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::path::Path;

/// One current snapshot file.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotEntry {
    pub file_name: String,
    pub as_of: Option<NaiveDate>,
    pub modified: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Cache state of one asset.
#[derive(Debug, Clone, Serialize)]
pub struct AssetInventory {
    pub asset: String,
    pub pattern: String,
    /// Snapshots at the top level of the data folder, oldest first.
    pub current: Vec<SnapshotEntry>,
    /// File name `load_latest_asset_data` would pick.
    pub latest: Option<String>,
    /// Snapshots under `old/`.
    pub archived: usize,
}

impl AssetInventory {
    /// A healthy series has exactly one current snapshot.
    pub fn needs_archiving(&self) -> bool {
        self.current.len() > 1
    }
}

/// Scan `data_folder` for every asset in `assets`.
pub fn scan(assets: &AssetMap, data_folder: &Path) -> Result<Vec<AssetInventory>, DataError> {
    let old_dir = archive_dir(data_folder);
    let mut inventory = Vec::with_capacity(assets.len());

    for (name, info) in assets {
        let key = info.snapshot_key(name);

        let mut current: Vec<SnapshotEntry> = list_snapshots(data_folder, &key)?
            .into_iter()
            .map(|f| SnapshotEntry {
                file_name: f.file_name().to_string(),
                as_of: key.as_of(f.file_name()),
                modified: DateTime::<Utc>::from(f.modified),
                size_bytes: f.size_bytes,
            })
            .collect();
        current.sort_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });

        let latest = latest_snapshot(data_folder, &key)?.map(|f| f.file_name().to_string());
        let archived = list_snapshots(&old_dir, &key)?.len();

        inventory.push(AssetInventory {
            asset: name.clone(),
            pattern: key.pattern(),
            current,
            latest,
            archived,
        });
    }

    Ok(inventory)
}
