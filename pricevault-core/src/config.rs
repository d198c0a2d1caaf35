//! Serializable configuration: tracked assets, data folder, HTTP identity.
//!
//! ```toml
//! data_folder = "data"
//! settle_delay_ms = 1000
//!
//! [http]
//! timeout_secs = 30
//!
//! [assets.SPX]
//! ticker = "^GSPC"
//! start = "1990-01-01"
//! ```

use crate::data::naming::SnapshotKey;
use crate::data::provider::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default pause after every provider request.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// One tracked asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Provider ticker symbol, e.g. `^GSPC`.
    pub ticker: String,
    /// First day of history to request.
    pub start: NaiveDate,
}

impl AssetInfo {
    pub fn new(ticker: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start,
        }
    }

    /// Snapshot series key for this asset stored under `name`.
    pub fn snapshot_key(&self, name: &str) -> SnapshotKey {
        SnapshotKey::new(name, self.start)
    }
}

/// Asset name → info. Names are unique and become file name prefixes.
pub type AssetMap = BTreeMap<String, AssetInfo>;

/// HTTP client settings for the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

impl HttpConfig {
    /// Build the blocking client handed to the provider.
    pub fn build_client(&self) -> Result<reqwest::blocking::Client, DataError> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))
    }
}

/// Errors from loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceVaultConfig {
    #[serde(default = "default_data_folder")]
    pub data_folder: PathBuf,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default)]
    pub http: HttpConfig,

    pub assets: AssetMap,
}

fn default_data_folder() -> PathBuf {
    PathBuf::from("data")
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl PriceVaultConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Reject configs that would produce unusable snapshot names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.is_empty() {
            return Err(ConfigError::Invalid("no assets configured".into()));
        }
        for (name, info) in &self.assets {
            if name.is_empty()
                || name == "."
                || name == ".."
                || name.contains(['/', '\\'])
            {
                return Err(ConfigError::Invalid(format!(
                    "asset name '{name}' must be a single path segment"
                )));
            }
            if info.ticker.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("asset '{name}' has an empty ticker")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
data_folder = "/var/lib/prices"

[assets.SPX]
ticker = "^GSPC"
start = "1990-01-01"

[assets.GOLD]
ticker = "GC=F"
start = "2000-08-30"
"#;

    #[test]
    fn parses_assets_and_defaults() {
        let config = PriceVaultConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.data_folder, PathBuf::from("/var/lib/prices"));
        assert_eq!(config.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.http, HttpConfig::default());
        assert_eq!(config.assets.len(), 2);
        assert_eq!(
            config.assets["SPX"],
            AssetInfo::new("^GSPC", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        );
    }

    #[test]
    fn snapshot_key_uses_name_and_start() {
        let config = PriceVaultConfig::from_toml(SAMPLE).unwrap();
        let key = config.assets["GOLD"].snapshot_key("GOLD");
        assert_eq!(key.pattern(), "GOLD_day_20000830_*.parquet");
    }

    #[test]
    fn malformed_start_is_a_parse_error() {
        let toml = r#"
[assets.SPX]
ticker = "^GSPC"
start = "1990/01/01"
"#;
        assert!(matches!(
            PriceVaultConfig::from_toml(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_path_like_asset_names() {
        let toml = r#"
[assets."../SPX"]
ticker = "^GSPC"
start = "1990-01-01"
"#;
        assert!(matches!(
            PriceVaultConfig::from_toml(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_empty_asset_map() {
        assert!(matches!(
            PriceVaultConfig::from_toml("[assets]\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn example_config_parses() {
        let config =
            PriceVaultConfig::from_toml(include_str!("../../pricevault.example.toml")).unwrap();
        assert!(config.assets.contains_key("SPX"));
        assert_eq!(config.data_folder, PathBuf::from("data"));
    }

    #[test]
    fn http_overrides_merge_with_defaults() {
        let toml = r#"
[http]
timeout_secs = 5

[assets.SPX]
ticker = "^GSPC"
start = "1990-01-01"
"#;
        let config = PriceVaultConfig::from_toml(toml).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, HttpConfig::default().user_agent);
    }
}
