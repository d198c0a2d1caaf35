//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over the remote market-data source so the
//! synchronizer can be driven by Yahoo Finance in production and by a canned
//! provider in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Raw daily bar as returned by a data provider.
///
/// When the request asked for adjusted prices, `open/high/low/close` are
/// already adjusted and `adj_close == close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// A full-history request for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest<'a> {
    pub ticker: &'a str,
    pub start: NaiveDate,
    /// Scale OHLC by the split/dividend adjustment factor.
    pub adjusted: bool,
}

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output and log lines.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} while fetching '{ticker}'")]
    HttpStatus { ticker: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("parquet I/O error: {0}")]
    ParquetError(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no snapshot found for '{asset}' (pattern: {pattern})")]
    NoMatchingSnapshot { asset: String, pattern: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Trait for remote price-history sources.
///
/// An empty history is a valid answer (`Ok(vec![])`), not an error. The
/// snapshot layer sits above this trait; providers never touch the disk.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the daily history for `request.ticker` from `request.start` up to now.
    fn fetch(&self, request: &HistoryRequest<'_>) -> Result<Vec<RawBar>, DataError>;
}
