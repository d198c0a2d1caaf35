use super::provider::{DataError, RawBar};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Column layout of a price snapshot.
pub struct PriceSchema;

impl PriceSchema {
    pub const DATE: &'static str = "date";

    /// Get the canonical snapshot schema
    pub fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new(Self::DATE.into(), DataType::Date),
            Field::new("open".into(), DataType::Float64),
            Field::new("high".into(), DataType::Float64),
            Field::new("low".into(), DataType::Float64),
            Field::new("close".into(), DataType::Float64),
            Field::new("adj_close".into(), DataType::Float64),
            Field::new("volume".into(), DataType::UInt64),
        ])
    }
}

/// Convert provider bars into a date-indexed price table.
pub fn bars_to_frame(bars: &[RawBar]) -> Result<DataFrame, DataError> {
    let dates: Vec<i32> = bars
        .iter()
        .map(|b| b.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let adj_closes: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();
    let volumes: Vec<u64> = bars.iter().map(|b| b.volume).collect();

    DataFrame::new(vec![
        Column::new(PriceSchema::DATE.into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| DataError::ParquetError(format!("date cast: {e}")))?,
        Column::new("open".into(), opens),
        Column::new("high".into(), highs),
        Column::new("low".into(), lows),
        Column::new("close".into(), closes),
        Column::new("adj_close".into(), adj_closes),
        Column::new("volume".into(), volumes),
    ])
    .map_err(|e| DataError::ParquetError(format!("dataframe creation: {e}")))
}

/// First and last date of a snapshot, if it has a readable `date` column.
pub fn date_span(df: &DataFrame) -> Option<(NaiveDate, NaiveDate)> {
    let n = df.height();
    if n == 0 {
        return None;
    }
    let dates = df.column(PriceSchema::DATE).ok()?.date().ok()?;
    let first = dates.get(0)?;
    let last = dates.get(n - 1)?;
    Some((days_to_date(first)?, days_to_date(last)?))
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            adj_close: close,
            volume: 1_000,
        }
    }

    #[test]
    fn frame_matches_schema() {
        let df = bars_to_frame(&[bar(2024, 1, 2, 100.0), bar(2024, 1, 3, 101.0)]).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), PriceSchema::schema().len());
        for field in PriceSchema::schema().iter_fields() {
            let col = df.column(field.name()).unwrap();
            assert_eq!(col.dtype(), field.dtype(), "column {}", field.name());
        }
    }

    #[test]
    fn epoch_is_day_zero() {
        let df = bars_to_frame(&[bar(1970, 1, 1, 1.0)]).unwrap();
        let days = df.column("date").unwrap().date().unwrap().get(0);
        assert_eq!(days, Some(0));
    }

    #[test]
    fn date_span_reads_first_and_last() {
        let df = bars_to_frame(&[bar(2020, 1, 2, 1.0), bar(2024, 6, 28, 2.0)]).unwrap();
        assert_eq!(
            date_span(&df),
            Some((
                NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
            ))
        );
    }

    #[test]
    fn empty_frame_has_no_span() {
        let df = bars_to_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(date_span(&df), None);
    }
}
