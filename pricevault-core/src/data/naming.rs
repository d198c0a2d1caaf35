//! Snapshot file naming.
//!
//! Current snapshots live flat in the data folder as
//! `{name}_day_{start:YYYYMMDD}_{as_of:YYYYMMDD}.parquet`; superseded ones
//! keep the same name under `{data_folder}/old/`.

use chrono::NaiveDate;

/// Subdirectory of the data folder holding superseded snapshots.
pub const ARCHIVE_DIR: &str = "old";

const EXTENSION: &str = ".parquet";
const COMPACT_DATE: &str = "%Y%m%d";

/// Format a date as `YYYYMMDD`.
pub fn compact_date(date: NaiveDate) -> String {
    date.format(COMPACT_DATE).to_string()
}

/// Parse `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, COMPACT_DATE)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Identifies the snapshot series of one asset: all files sharing a name and
/// a history start date, whatever their as-of date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotKey {
    name: String,
    start: NaiveDate,
}

impl SnapshotKey {
    pub fn new(name: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// `{name}_day_{start}_`
    fn prefix(&self) -> String {
        format!("{}_day_{}_", self.name, compact_date(self.start))
    }

    /// File name of the snapshot taken on `as_of`.
    pub fn file_name(&self, as_of: NaiveDate) -> String {
        format!("{}{}{EXTENSION}", self.prefix(), compact_date(as_of))
    }

    /// Glob-style pattern matching every snapshot of this series.
    pub fn pattern(&self) -> String {
        format!("{}*{EXTENSION}", self.prefix())
    }

    /// Whether `file_name` matches [`Self::pattern`].
    pub fn matches(&self, file_name: &str) -> bool {
        self.wildcard(file_name).is_some()
    }

    /// The as-of date embedded in a matching file name, if it is well formed.
    pub fn as_of(&self, file_name: &str) -> Option<NaiveDate> {
        let middle = self.wildcard(file_name)?;
        if middle.len() != 8 {
            return None;
        }
        NaiveDate::parse_from_str(middle, COMPACT_DATE).ok()
    }

    /// The part of `file_name` covered by the `*` of the pattern.
    fn wildcard<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_prefix(self.prefix().as_str())?
            .strip_suffix(EXTENSION)
    }
}
