//! Forecast-versus-actual comparison overlay.
//!
//! After a forecast has been produced, the overlay re-fetches the same ticker
//! with the range extended by the horizon, so any trading days that have since
//! become available can be drawn on top of the predicted path.

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use market_data::{DateRange, MarketDataProvider, Ticker};

use crate::data::{load, SelectedSeries};
use crate::error::{ForecastError, Result};
use crate::models::{validate_horizon, Forecast};

/// Three aligned layers for one chart: the history the model was fitted on,
/// the predicted path, and whatever actuals exist past the original end.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOverlay {
    pub historical: SelectedSeries,
    pub forecast: Forecast,
    /// Trading days after the original end, possibly empty. An empty layer
    /// renders as an empty overlay, never an error.
    pub observed: SelectedSeries,
}

impl ComparisonOverlay {
    /// Whether any post-forecast actuals were available.
    pub fn has_observed(&self) -> bool {
        !self.observed.is_empty()
    }
}

/// Build the comparison overlay for a forecast made at `original_end`.
///
/// Fetches `[start, original_end + horizon days]` and splits it at
/// `original_end`: rows at or before it are the historical layer, rows after
/// it the observed layer.
pub fn compare(
    provider: &dyn MarketDataProvider,
    ticker: Ticker,
    start: NaiveDate,
    original_end: NaiveDate,
    horizon: usize,
    column: &str,
    forecast: Forecast,
) -> Result<ComparisonOverlay> {
    validate_horizon(horizon)?;

    let extended = DateRange::new(start, original_end)
        .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?
        .extended_by_days(horizon as u32);
    let table = load(provider, ticker, extended.start, extended.end)?;
    let series = table.select(column)?;

    let historical = series.up_to(original_end);
    let observed = series.after(original_end);
    debug!(
        "{} overlay: {} historical, {} observed rows after {}",
        ticker,
        historical.len(),
        observed.len(),
        original_end
    );

    Ok(ComparisonOverlay {
        historical,
        forecast,
        observed,
    })
}
