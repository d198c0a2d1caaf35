//! Snapshot cache: naming, parquet I/O, fetch, archive, sync and offline load

pub mod archive;
pub mod fetch;
pub mod inventory;
pub mod latest;
pub mod naming;
pub mod provider;
pub mod schema;
pub mod snapshot;
pub mod sync;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::{archive_old_files, ArchiveSummary};
pub use fetch::{download_and_archive, FetchOutcome};
pub use inventory::{scan, AssetInventory, SnapshotEntry};
pub use latest::{latest_snapshot, load_latest_asset_data};
pub use naming::{compact_date, parse_date, SnapshotKey, ARCHIVE_DIR};
pub use provider::{DataError, DataProvider, HistoryRequest, RawBar};
pub use schema::{bars_to_frame, date_span, PriceSchema};
pub use snapshot::{read_snapshot, write_snapshot, SnapshotFile};
pub use sync::{update_and_load_asset_data, AssetOutcome, SyncOptions, SyncReport};
pub use yahoo::YahooProvider;

pub use polars::prelude::DataFrame;
