//! Local CSV files as a market data source.

use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::providers::{normalize_bars, MarketDataProvider};
use crate::{DailyBar, DateRange, OhlcvData, ProviderError, Ticker};

/// Reads daily bars from one CSV file per ticker (`<DIR>/<SYMBOL>.csv`).
///
/// The expected layout matches the common historical-download format:
///
/// ```csv
/// Date,Open,High,Low,Close,Adj Close,Volume
/// 2020-01-02,74.06,75.15,73.80,75.09,73.06,135480400
/// ```
pub struct CsvProvider {
    directory: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Adj Close")]
    adj_close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

impl CsvProvider {
    /// Create a provider rooted at `directory`.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    fn file_for(&self, ticker: Ticker) -> PathBuf {
        self.directory.join(format!("{}.csv", ticker.symbol()))
    }
}

impl MarketDataProvider for CsvProvider {
    fn fetch_daily(&self, ticker: Ticker, range: DateRange) -> Result<Vec<DailyBar>, ProviderError> {
        let path = self.file_for(ticker);
        debug!("reading {} bars from {}", ticker, path.display());

        let mut reader = csv::Reader::from_path(&path)?;
        let mut bars = Vec::new();

        for record in reader.deserialize::<CsvRow>() {
            let row = record?;
            if !range.contains(row.date) {
                continue;
            }
            bars.push(DailyBar {
                date: row.date,
                data: OhlcvData {
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                    adj_close: row.adj_close,
                    volume: row.volume,
                },
            });
        }

        Ok(normalize_bars(bars))
    }
}
