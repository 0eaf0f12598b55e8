//! Table and series model for the dashboard pipeline.
//!
//! [`RawTable`] is the full OHLCV table for one ticker and range, backed by a
//! polars `DataFrame` with an explicit `Date` column so the presentation
//! layer can reference dates directly. [`SelectedSeries`] is the single
//! (Date, Value) column every downstream step consumes.

use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use serde::Serialize;

use market_data::{DailyBar, DateRange, MarketDataProvider, Ticker};

use crate::error::{ForecastError, Result};

/// Name of the explicit date column in a [`RawTable`].
pub const DATE_COLUMN: &str = "Date";

/// The selectable value columns, in table order.
pub const VALUE_COLUMNS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Full daily table for one ticker: an explicit `Date` column plus the OHLCV
/// value columns, all sharing the same strictly ascending date axis.
#[derive(Debug, Clone)]
pub struct RawTable {
    dates: Vec<NaiveDate>,
    df: DataFrame,
}

impl RawTable {
    /// Build a table from daily bars.
    ///
    /// Bars are sorted by date and duplicate dates dropped, so the date-axis
    /// invariant (ascending, no duplicates) holds by construction. An empty
    /// bar list is `DataUnavailable`.
    pub fn from_bars(bars: Vec<DailyBar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(ForecastError::DataUnavailable(
                "no trading days in the requested range".to_string(),
            ));
        }

        let mut bars = bars;
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);

        let dates: Vec<NaiveDate> = bars.iter().map(|bar| bar.date).collect();
        let date_strings: Vec<String> = dates.iter().map(|d| d.to_string()).collect();

        let columns = vec![
            Series::new(DATE_COLUMN, date_strings),
            Series::new("Open", bars.iter().map(|b| b.data.open).collect::<Vec<f64>>()),
            Series::new("High", bars.iter().map(|b| b.data.high).collect::<Vec<f64>>()),
            Series::new("Low", bars.iter().map(|b| b.data.low).collect::<Vec<f64>>()),
            Series::new(
                "Close",
                bars.iter().map(|b| b.data.close).collect::<Vec<f64>>(),
            ),
            Series::new(
                "Adj Close",
                bars.iter().map(|b| b.data.adj_close).collect::<Vec<f64>>(),
            ),
            Series::new(
                "Volume",
                bars.iter().map(|b| b.data.volume as f64).collect::<Vec<f64>>(),
            ),
        ];

        let df = DataFrame::new(columns)?;
        Ok(Self { dates, df })
    }

    /// The underlying DataFrame, `Date` column first.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// The typed date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Names of the selectable value columns.
    pub fn value_columns(&self) -> Vec<String> {
        VALUE_COLUMNS.iter().map(|s| s.to_string()).collect()
    }

    /// Number of trading days in the table.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Project the table onto a single value column.
    ///
    /// Pure projection, no recomputation. The `Date` column is the axis and
    /// cannot itself be selected.
    pub fn select(&self, column: &str) -> Result<SelectedSeries> {
        if column == DATE_COLUMN || !VALUE_COLUMNS.contains(&column) {
            return Err(ForecastError::UnknownColumn(column.to_string()));
        }

        let series = self.df.column(column)?;
        let values: Vec<f64> = series.f64()?.into_iter().flatten().collect();

        Ok(SelectedSeries {
            column: column.to_string(),
            dates: self.dates.clone(),
            values,
        })
    }
}

/// A univariate (Date, Value) series projected out of a [`RawTable`].
///
/// Sole input to the stationarity test, the decomposer and the forecaster.
/// Immutable once produced for a render.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedSeries {
    column: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl SelectedSeries {
    /// Build a series directly from parallel date/value vectors.
    pub fn from_parts(column: &str, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "dates ({}) and values ({}) differ in length",
                dates.len(),
                values.len()
            )));
        }
        Ok(Self {
            column: column.to_string(),
            dates,
            values,
        })
    }

    /// Name of the column this series was projected from.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Date of the last observation, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// The sub-series with dates strictly after `boundary`.
    pub fn after(&self, boundary: NaiveDate) -> SelectedSeries {
        let pairs: Vec<(NaiveDate, f64)> = self
            .dates
            .iter()
            .zip(self.values.iter())
            .filter(|(d, _)| **d > boundary)
            .map(|(d, v)| (*d, *v))
            .collect();
        SelectedSeries {
            column: self.column.clone(),
            dates: pairs.iter().map(|(d, _)| *d).collect(),
            values: pairs.iter().map(|(_, v)| *v).collect(),
        }
    }

    /// The sub-series with dates at or before `boundary`.
    pub fn up_to(&self, boundary: NaiveDate) -> SelectedSeries {
        let pairs: Vec<(NaiveDate, f64)> = self
            .dates
            .iter()
            .zip(self.values.iter())
            .filter(|(d, _)| **d <= boundary)
            .map(|(d, v)| (*d, *v))
            .collect();
        SelectedSeries {
            column: self.column.clone(),
            dates: pairs.iter().map(|(d, _)| *d).collect(),
            values: pairs.iter().map(|(_, v)| *v).collect(),
        }
    }
}

/// Retrieve the daily table for `ticker` over the inclusive `[start, end]`
/// range.
///
/// Only trading days present at the source appear; no synthetic gap filling.
/// A range with no trading days is `DataUnavailable`.
pub fn load(
    provider: &dyn MarketDataProvider,
    ticker: Ticker,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RawTable> {
    let range =
        DateRange::new(start, end).map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

    let bars = provider.fetch_daily(ticker, range)?;
    debug!("{}: loaded {} bars for {}..={}", ticker, bars.len(), start, end);

    if bars.is_empty() {
        return Err(ForecastError::DataUnavailable(format!(
            "{}: no rows for {}..={}",
            ticker, start, end
        )));
    }

    RawTable::from_bars(bars)
}
