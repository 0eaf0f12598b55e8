//! One-shot dashboard pipeline: load, select, test, decompose, fit,
//! forecast, and optionally overlay actuals.
//!
//! Every user interaction is a stateless re-run of this pipeline from the
//! current input snapshot. Nothing is cached between runs and nothing in a
//! [`DashboardView`] is shared or mutated after it is returned, so concurrent
//! sessions are isolated for free.

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use market_data::{MarketDataProvider, Ticker};

use crate::compare::{compare, ComparisonOverlay};
use crate::data::{load, RawTable, SelectedSeries};
use crate::decompose::{decompose, Decomposition, DEFAULT_PERIOD};
use crate::error::Result;
use crate::models::sarima::{ModelParams, SarimaModel};
use crate::models::{validate_horizon, FittedModel, Forecast, ForecastModel};
use crate::stationarity::{adf_test, AdfReport};

/// Full input snapshot for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub ticker: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Value column to analyse, e.g. "Close".
    pub column: String,
    pub params: ModelParams,
    /// Forecast horizon in days, [1, 365].
    pub horizon: usize,
    /// Render the raw table and component plots.
    pub show_plots: bool,
    /// Re-fetch through the horizon and overlay observed actuals.
    pub compare_with_actuals: bool,
}

/// What the presentation layer should draw for one run. Derived fresh from
/// the request every time; no toggle state survives between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewFlags {
    pub show_plots: bool,
    pub show_comparison: bool,
}

impl DashboardRequest {
    fn view_flags(&self) -> ViewFlags {
        ViewFlags {
            show_plots: self.show_plots,
            show_comparison: self.compare_with_actuals,
        }
    }
}

/// Everything one render needs, as plain immutable data. No rendering logic
/// lives here.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub flags: ViewFlags,
    pub table: RawTable,
    pub series: SelectedSeries,
    pub stationarity: AdfReport,
    pub decomposition: Decomposition,
    pub model_summary: String,
    pub forecast: Forecast,
    /// Present only when the request asked for a comparison.
    pub comparison: Option<ComparisonOverlay>,
}

impl DashboardView {
    /// The boolean stationarity verdict shown on the dashboard.
    pub fn is_stationary(&self) -> bool {
        self.stationarity.is_stationary()
    }
}

/// Run the full pipeline for one request.
///
/// The horizon is validated before any data is fetched or any model fitted,
/// so an out-of-range horizon fails fast with `InvalidParameter`.
pub fn run_dashboard(
    provider: &dyn MarketDataProvider,
    request: &DashboardRequest,
) -> Result<DashboardView> {
    validate_horizon(request.horizon)?;
    let flags = request.view_flags();

    let table = load(provider, request.ticker, request.start, request.end)?;
    let series = table.select(&request.column)?;
    info!(
        "{} {}..={}: {} trading days of {}",
        request.ticker,
        request.start,
        request.end,
        series.len(),
        request.column
    );

    let stationarity = adf_test(series.values(), None)?;
    let decomposition = decompose(&series, DEFAULT_PERIOD)?;

    let model = SarimaModel::new(request.params);
    let fitted = model.fit(&series)?;
    let model_summary = fitted.summary();
    let forecast = fitted.forecast(request.horizon)?;

    let comparison = if flags.show_comparison {
        Some(compare(
            provider,
            request.ticker,
            request.start,
            request.end,
            request.horizon,
            &request.column,
            forecast.clone(),
        )?)
    } else {
        None
    };

    Ok(DashboardView {
        flags,
        table,
        series,
        stationarity,
        decomposition,
        model_summary,
        forecast,
        comparison,
    })
}
