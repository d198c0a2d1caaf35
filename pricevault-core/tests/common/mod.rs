//! Shared helpers for pricevault-core integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use pricevault_core::data::{DataError, DataProvider, HistoryRequest, RawBar};
use pricevault_core::{AssetInfo, AssetMap};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Provider serving one scripted answer per call, per ticker.
///
/// Once a ticker's script runs out it answers with an empty history.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<String, Vec<Result<Vec<RawBar>, String>>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn push_bars(self, ticker: &str, bars: Vec<RawBar>) -> Self {
        self.push(ticker, Ok(bars))
    }

    pub fn push_error(self, ticker: &str, reason: &str) -> Self {
        self.push(ticker, Err(reason.to_string()))
    }

    fn push(self, ticker: &str, answer: Result<Vec<RawBar>, String>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(ticker.to_string())
            .or_default()
            .insert(0, answer);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, request: &HistoryRequest<'_>) -> Result<Vec<RawBar>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(request.ticker)
            .and_then(|script| script.pop());
        match next {
            Some(Ok(bars)) => Ok(bars),
            Some(Err(reason)) => Err(DataError::NetworkUnreachable(reason)),
            None => Ok(Vec::new()),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` consecutive daily bars starting 2024-01-02 with closes from `base`.
pub fn bars(n: usize, base: f64) -> Vec<RawBar> {
    (0..n)
        .map(|i| {
            let close = base + i as f64;
            RawBar {
                date: date(2024, 1, 2) + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                adj_close: close,
                volume: 10_000 + i as u64,
            }
        })
        .collect()
}

pub fn single_asset(name: &str, ticker: &str, start: NaiveDate) -> AssetMap {
    let mut assets = AssetMap::new();
    assets.insert(name.to_string(), AssetInfo::new(ticker, start));
    assets
}

pub fn set_mtime(path: &Path, secs_after_base: u64) {
    let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs_after_base);
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(at)
        .unwrap();
}

/// Sorted file names directly under `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
