//! Fetch one asset's full history, archive the previous snapshot, persist
//! the new one.

use super::archive::archive_old_files;
use super::provider::{DataError, DataProvider, HistoryRequest, RawBar};
use super::schema::bars_to_frame;
use super::snapshot::stage_snapshot;
use crate::config::AssetInfo;
use polars::prelude::DataFrame;
use std::path::Path;
use std::time::Duration;

/// How a fetch ended.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Non-empty history, persisted to the requested path.
    Success(DataFrame),
    /// The provider answered with zero rows. Nothing was archived or written.
    Empty,
    /// Retrieval failed, or the new snapshot could not be persisted.
    RetrievalError(DataError),
}

impl FetchOutcome {
    pub fn into_frame(self) -> Option<DataFrame> {
        match self {
            FetchOutcome::Success(df) => Some(df),
            _ => None,
        }
    }
}

/// Download `info.ticker` from `info.start` (adjusted prices), then archive
/// older snapshots of the series and write the new one to `filepath`.
///
/// Sleeps `settle_delay` after the request whatever its result. Errors never
/// escape: they come back as [`FetchOutcome::RetrievalError`].
///
/// The new table is staged next to `filepath` before anything is archived,
/// so a failed write leaves the previous snapshot where it was.
pub fn download_and_archive(
    provider: &dyn DataProvider,
    name: &str,
    info: &AssetInfo,
    filepath: &Path,
    data_folder: &Path,
    settle_delay: Duration,
) -> FetchOutcome {
    tracing::info!(asset = name, ticker = %info.ticker, provider = provider.name(), "download started");

    let request = HistoryRequest {
        ticker: &info.ticker,
        start: info.start,
        adjusted: true,
    };
    let fetched = provider.fetch(&request);

    if !settle_delay.is_zero() {
        std::thread::sleep(settle_delay);
    }

    let bars = match fetched {
        Ok(bars) => bars,
        Err(e) => {
            tracing::error!(asset = name, ticker = %info.ticker, error = %e, "download failed");
            return FetchOutcome::RetrievalError(e);
        }
    };

    if bars.is_empty() {
        tracing::warn!(asset = name, ticker = %info.ticker, "download returned no rows");
        return FetchOutcome::Empty;
    }

    match persist(name, info, &bars, filepath, data_folder) {
        Ok(df) => {
            tracing::info!(asset = name, rows = df.height(), path = %filepath.display(), "snapshot saved");
            FetchOutcome::Success(df)
        }
        Err(e) => {
            tracing::error!(asset = name, path = %filepath.display(), error = %e, "failed to persist snapshot");
            FetchOutcome::RetrievalError(e)
        }
    }
}

fn persist(
    name: &str,
    info: &AssetInfo,
    bars: &[RawBar],
    filepath: &Path,
    data_folder: &Path,
) -> Result<DataFrame, DataError> {
    let df = bars_to_frame(bars)?;
    let staged = stage_snapshot(&df, filepath)?;

    let archived = match archive_old_files(data_folder, &info.snapshot_key(name)) {
        Ok(summary) => summary,
        Err(e) => {
            staged.discard();
            return Err(e);
        }
    };
    if !archived.failed.is_empty() {
        tracing::warn!(
            asset = name,
            failed = archived.failed.len(),
            "some superseded snapshots stayed in place"
        );
    }

    staged.commit()?;
    Ok(df)
}
