//! Offline loader: the newest snapshot of every asset, no network.
//!
//! "Newest" means the greatest filesystem modification time, which is only
//! as reliable as the clock and timestamp resolution of the filesystem. Ties
//! go to the lexicographically greatest file name.

use super::naming::SnapshotKey;
use super::provider::DataError;
use super::snapshot::{list_snapshots, read_snapshot, SnapshotFile};
use crate::config::AssetMap;
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::path::Path;

/// The newest current snapshot of `key` in `data_folder`, if any.
pub fn latest_snapshot(data_folder: &Path, key: &SnapshotKey) -> Result<Option<SnapshotFile>, DataError> {
    let snapshots = list_snapshots(data_folder, key)?;
    Ok(snapshots.into_iter().max_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.file_name().cmp(b.file_name()))
    }))
}

/// Load the newest snapshot of every asset.
///
/// Read-only. Fails on the first asset without any matching file, naming the
/// asset and the pattern searched; no partial mapping is returned.
pub fn load_latest_asset_data(
    assets: &AssetMap,
    data_folder: &Path,
) -> Result<BTreeMap<String, DataFrame>, DataError> {
    tracing::debug!(folder = %data_folder.display(), "looking for latest local snapshots");

    let mut data = BTreeMap::new();

    for (name, info) in assets {
        let key = info.snapshot_key(name);
        let latest = latest_snapshot(data_folder, &key)?.ok_or_else(|| {
            DataError::NoMatchingSnapshot {
                asset: name.clone(),
                pattern: key.pattern(),
            }
        })?;

        tracing::info!(asset = %name, file = latest.file_name(), "loading latest snapshot");
        data.insert(name.clone(), read_snapshot(&latest.path)?);
    }

    Ok(data)
}
