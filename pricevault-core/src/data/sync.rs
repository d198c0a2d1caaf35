//! Synchronizer: for every configured asset, load today's snapshot if it
//! exists, otherwise fetch a fresh one.
//!
//! Assets whose fetch comes back empty or fails are left out of the data
//! mapping; [`SyncReport::outcomes`] says why.

use super::fetch::{download_and_archive, FetchOutcome};
use super::provider::{DataError, DataProvider};
use super::snapshot::read_snapshot;
use crate::config::{AssetMap, DEFAULT_SETTLE_DELAY_MS};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Knobs for a sync pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Pause after each provider request.
    pub settle_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
        }
    }
}

/// What happened to one asset during a sync pass.
#[derive(Debug)]
pub enum AssetOutcome {
    /// Today's snapshot already existed and was loaded.
    Cached,
    /// A new snapshot was downloaded and written.
    Fetched,
    /// The provider had no rows for the asset.
    Empty,
    /// Retrieval or persistence failed.
    Failed(DataError),
}

impl AssetOutcome {
    pub fn has_data(&self) -> bool {
        matches!(self, AssetOutcome::Cached | AssetOutcome::Fetched)
    }
}

/// Result of [`update_and_load_asset_data`].
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Asset name → price table, only for assets that have data.
    pub data: BTreeMap<String, DataFrame>,
    /// Asset name → outcome, for every configured asset.
    pub outcomes: BTreeMap<String, AssetOutcome>,
}

impl SyncReport {
    /// Assets that ended up without data.
    pub fn missing(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.has_data())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn into_data(self) -> BTreeMap<String, DataFrame> {
        self.data
    }
}

/// Load or fetch the `as_of` snapshot of every asset in `assets`.
///
/// Provider failures and empty histories are absorbed per asset. Only a
/// failure to read an existing current snapshot aborts the whole pass.
pub fn update_and_load_asset_data(
    assets: &AssetMap,
    data_folder: &Path,
    as_of: NaiveDate,
    provider: &dyn DataProvider,
    opts: &SyncOptions,
) -> Result<SyncReport, DataError> {
    let mut report = SyncReport::default();

    for (name, info) in assets {
        let file_name = info.snapshot_key(name).file_name(as_of);
        let filepath = data_folder.join(&file_name);

        if filepath.exists() {
            tracing::info!(asset = %name, file = %file_name, "loading local snapshot");
            let df = read_snapshot(&filepath)?;
            report.data.insert(name.clone(), df);
            report.outcomes.insert(name.clone(), AssetOutcome::Cached);
            continue;
        }

        let outcome = match download_and_archive(
            provider,
            name,
            info,
            &filepath,
            data_folder,
            opts.settle_delay,
        ) {
            FetchOutcome::Success(df) => {
                report.data.insert(name.clone(), df);
                AssetOutcome::Fetched
            }
            FetchOutcome::Empty => AssetOutcome::Empty,
            FetchOutcome::RetrievalError(e) => AssetOutcome::Failed(e),
        };
        report.outcomes.insert(name.clone(), outcome);
    }

    Ok(report)
}
