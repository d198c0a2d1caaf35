//! Canned provider for unit tests.

use super::provider::{DataError, DataProvider, HistoryRequest, RawBar};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) enum Canned {
    Bars(Vec<RawBar>),
    Fail,
}

/// Serves fixed answers per ticker and counts calls. Unknown tickers get an
/// empty history.
#[derive(Default)]
pub(crate) struct MockProvider {
    answers: HashMap<String, Canned>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn with(mut self, ticker: &str, answer: Canned) -> Self {
        self.answers.insert(ticker.to_string(), answer);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(&self, request: &HistoryRequest<'_>) -> Result<Vec<RawBar>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(request.ticker) {
            Some(Canned::Bars(bars)) => Ok(bars.clone()),
            Some(Canned::Fail) => Err(DataError::NetworkUnreachable("connection reset".into())),
            None => Ok(Vec::new()),
        }
    }
}

pub(crate) fn bars(closes: &[f64]) -> Vec<RawBar> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            date: first + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            adj_close: close,
            volume: 1_000 + i as u64,
        })
        .collect()
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
