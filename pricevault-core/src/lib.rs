//! PriceVault Core: local snapshot cache of daily price histories.
//!
//! - Snapshot naming (`{name}_day_{start}_{as_of}.parquet`) and parquet I/O
//! - Data provider trait plus the Yahoo Finance chart provider
//! - Fetcher: download, archive superseded snapshots, persist
//! - Synchronizer: today's snapshot from disk, or fetched on a miss
//! - Latest-loader: newest snapshot per asset, fully offline
//! - TOML configuration of tracked assets

pub mod config;
pub mod data;

pub use config::{AssetInfo, AssetMap, ConfigError, HttpConfig, PriceVaultConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: provider and report types can cross threads, so
    /// a caller may run a sync pass on a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyncReport>();
        require_send::<data::FetchOutcome>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<config::PriceVaultConfig>();
        require_sync::<config::PriceVaultConfig>();
    }

    #[test]
    fn provider_trait_is_object_safe() {
        let provider = data::test_support::MockProvider::default();
        let dyn_provider: &dyn data::DataProvider = &provider;
        assert!(!dyn_provider.name().is_empty());
    }
}
