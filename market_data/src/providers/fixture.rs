//! In-memory provider for tests and offline demos.

use std::collections::HashMap;

use crate::providers::{normalize_bars, MarketDataProvider};
use crate::{DailyBar, DateRange, ProviderError, Ticker};

/// Serves pre-loaded bars from memory, filtered by the requested range.
///
/// Unknown tickers yield an empty result, mirroring a remote source that has
/// no rows for the query.
#[derive(Debug, Default, Clone)]
pub struct FixtureProvider {
    series: HashMap<Ticker, Vec<DailyBar>>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the full bar history for `ticker`, replacing any previous
    /// registration. Bars are sorted and de-duplicated on insert.
    pub fn with_series(mut self, ticker: Ticker, bars: Vec<DailyBar>) -> Self {
        self.series.insert(ticker, normalize_bars(bars));
        self
    }
}

impl MarketDataProvider for FixtureProvider {
    fn fetch_daily(&self, ticker: Ticker, range: DateRange) -> Result<Vec<DailyBar>, ProviderError> {
        let bars = self
            .series
            .get(&ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|bar| range.contains(bar.date))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generate_test_data;
    use chrono::NaiveDate;

    #[test]
    fn filters_to_requested_range() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars = generate_test_data(30, start, 100.0, 0.02);
        let first = bars[4].date;
        let last = bars[9].date;

        let provider = FixtureProvider::new().with_series(Ticker::NFLX, bars);
        let fetched = provider
            .fetch_daily(Ticker::NFLX, DateRange::new(first, last).unwrap())
            .unwrap();

        assert_eq!(fetched.len(), 6);
        assert_eq!(fetched.first().unwrap().date, first);
        assert_eq!(fetched.last().unwrap().date, last);
    }

    #[test]
    fn unknown_ticker_returns_no_rows() {
        let provider = FixtureProvider::new();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
        )
        .unwrap();
        assert!(provider.fetch_daily(Ticker::PEP, range).unwrap().is_empty());
    }
}
