//! Provider abstraction for market data sources.
//!
//! [`MarketDataProvider`] is the single seam between the forecasting pipeline
//! and wherever bars actually come from (remote HTTP endpoint, local CSV
//! files, in-memory fixtures). Implementations are blocking: the pipeline is
//! a synchronous request/response run and every fetch completes before any
//! output is produced.
//!
//! The trait supports dynamic dispatch (`&dyn MarketDataProvider`) so the
//! source can be selected at runtime.

mod csv_files;
mod fixture;
mod yahoo;

pub use csv_files::CsvProvider;
pub use fixture::FixtureProvider;
pub use yahoo::YahooProvider;

use crate::{DailyBar, DateRange, ProviderError, Ticker};

/// A blocking source of daily OHLCV bars.
pub trait MarketDataProvider {
    /// Fetch the daily bars for `ticker` whose dates fall inside `range`
    /// (inclusive on both ends).
    ///
    /// Only trading days actually present at the source are returned, in
    /// ascending date order with no duplicates; the result may be empty if
    /// the range contains no trading days.
    fn fetch_daily(&self, ticker: Ticker, range: DateRange) -> Result<Vec<DailyBar>, ProviderError>;
}

/// Sort bars by date and drop duplicate dates, keeping the first occurrence.
///
/// Providers that cannot guarantee ordering at the source run their output
/// through this before returning.
pub(crate) fn normalize_bars(mut bars: Vec<DailyBar>) -> Vec<DailyBar> {
    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    bars
}
