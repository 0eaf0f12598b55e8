//! # Market Data
//!
//! `market_data` provides daily OHLCV (Open, High, Low, Close, Volume) data
//! types and retrieval providers for a fixed allow-list of stock tickers.
//!
//! Retrieval is abstracted behind the [`MarketDataProvider`] trait so the
//! downstream pipeline does not care whether bars come from a remote HTTP
//! endpoint, local CSV files, or an in-memory fixture.
//!
//! ## Usage Example
//!
//! ```no_run
//! use market_data::{DateRange, MarketDataProvider, Ticker};
//! use market_data::providers::YahooProvider;
//! use chrono::NaiveDate;
//!
//! let provider = YahooProvider::new().unwrap();
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
//! ).unwrap();
//!
//! let bars = provider.fetch_daily(Ticker::AAPL, range).unwrap();
//! println!("fetched {} trading days", bars.len());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod providers;
pub mod utils;

pub use providers::MarketDataProvider;

/// Errors that can occur while retrieving market data
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("market data API error: {0}")]
    Api(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed market data: {0}")]
    Malformed(String),
}

/// Represents OHLCV values for a single trading day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvData {
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Close price adjusted for splits and dividends
    pub adj_close: f64,
    /// Volume
    pub volume: u64,
}

/// Daily OHLCV bar with its trading date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date of the bar
    pub date: NaiveDate,
    /// OHLCV values
    pub data: OhlcvData,
}

/// Inclusive date range for a market data request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date of the range
    pub start: NaiveDate,
    /// Last date of the range (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ProviderError> {
        if start > end {
            return Err(ProviderError::InvalidRequest(format!(
                "range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether `date` falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// A new range with the same start and the end pushed out by `days`
    /// calendar days.
    pub fn extended_by_days(&self, days: u32) -> Self {
        Self {
            start: self.start,
            end: self.end + chrono::Duration::days(i64::from(days)),
        }
    }
}

/// Error returned when parsing a ticker symbol outside the allow-list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown ticker symbol: {0}")]
pub struct UnknownTicker(pub String);

/// The fixed allow-list of supported ticker symbols
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ticker {
    AAPL,
    MSFT,
    GOOGL,
    META,
    TSLA,
    NVDA,
    ADBE,
    PYPL,
    INTC,
    CMCSA,
    NFLX,
    PEP,
}

impl Ticker {
    /// Every supported ticker, in menu order.
    pub const ALL: [Ticker; 12] = [
        Ticker::AAPL,
        Ticker::MSFT,
        Ticker::GOOGL,
        Ticker::META,
        Ticker::TSLA,
        Ticker::NVDA,
        Ticker::ADBE,
        Ticker::PYPL,
        Ticker::INTC,
        Ticker::CMCSA,
        Ticker::NFLX,
        Ticker::PEP,
    ];

    /// The exchange symbol for this ticker.
    pub fn symbol(&self) -> &'static str {
        match self {
            Ticker::AAPL => "AAPL",
            Ticker::MSFT => "MSFT",
            Ticker::GOOGL => "GOOGL",
            Ticker::META => "META",
            Ticker::TSLA => "TSLA",
            Ticker::NVDA => "NVDA",
            Ticker::ADBE => "ADBE",
            Ticker::PYPL => "PYPL",
            Ticker::INTC => "INTC",
            Ticker::CMCSA => "CMCSA",
            Ticker::NFLX => "NFLX",
            Ticker::PEP => "PEP",
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Ticker {
    type Err = UnknownTicker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Ticker::ALL
            .into_iter()
            .find(|t| t.symbol() == upper)
            .ok_or_else(|| UnknownTicker(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_round_trip() {
        for ticker in Ticker::ALL {
            let parsed: Ticker = ticker.symbol().parse().unwrap();
            assert_eq!(parsed, ticker);
        }
    }

    #[test]
    fn ticker_parse_is_case_insensitive() {
        let parsed: Ticker = "aapl".parse().unwrap();
        assert_eq!(parsed, Ticker::AAPL);
    }

    #[test]
    fn ticker_outside_allow_list_rejected() {
        let result = "ENRON".parse::<Ticker>();
        assert_eq!(result, Err(UnknownTicker("ENRON".to_string())));
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(DateRange::new(start, end).is_err());
    }

    #[test]
    fn date_range_extension() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        )
        .unwrap();

        let extended = range.extended_by_days(5);
        assert_eq!(extended.start, range.start);
        assert_eq!(extended.end, NaiveDate::from_ymd_opt(2020, 6, 6).unwrap());
        assert!(extended.contains(NaiveDate::from_ymd_opt(2020, 6, 6).unwrap()));
        assert!(!extended.contains(NaiveDate::from_ymd_opt(2020, 6, 7).unwrap()));
    }
}
