//! Forecasting models for the dashboard pipeline.
//!
//! The pipeline talks to models only through [`ForecastModel`] /
//! [`FittedModel`], so a different backend can be swapped in without
//! touching the rest of the pipeline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::SelectedSeries;
use crate::error::{ForecastError, Result};

pub(crate) mod diff;
pub mod sarima;

/// Smallest accepted forecast horizon, in days.
pub const MIN_HORIZON_DAYS: usize = 1;

/// Largest accepted forecast horizon, in days.
pub const MAX_HORIZON_DAYS: usize = 365;

/// Check a forecast horizon against the allowed `[1, 365]` range.
///
/// Called before any fitting work is attempted so an out-of-range horizon
/// never pays for an estimation run.
pub fn validate_horizon(horizon: usize) -> Result<()> {
    if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&horizon) {
        return Err(ForecastError::InvalidParameter(format!(
            "forecast horizon must be in [{}, {}] days, got {}",
            MIN_HORIZON_DAYS, MAX_HORIZON_DAYS, horizon
        )));
    }
    Ok(())
}

/// Dated point forecast (predicted mean per future day).
///
/// Dates are consecutive calendar days starting immediately after the fitted
/// series' last date; this deliberately mirrors the original dashboard, whose
/// forecast axis is calendar-continuous even though the fitted axis holds
/// trading days only.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    intervals: Option<Vec<(f64, f64)>>,
}

impl Forecast {
    /// Create a forecast from parallel date/value vectors.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast dates ({}) and values ({}) differ in length",
                dates.len(),
                values.len()
            )));
        }
        Ok(Self {
            dates,
            values,
            intervals: None,
        })
    }

    /// Attach confidence intervals, one (lower, upper) pair per point.
    pub fn with_intervals(mut self, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if intervals.len() != self.values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "interval count ({}) does not match forecast length ({})",
                intervals.len(),
                self.values.len()
            )));
        }
        self.intervals = Some(intervals);
        Ok(self)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The predicted mean per forecast day.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (date, predicted value) pairs.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Forecast model that can be fitted to a selected series
pub trait ForecastModel {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Estimate the model over the full series
    fn fit(&self, series: &SelectedSeries) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Fitted forecast model
pub trait FittedModel {
    /// Produce `horizon + 1` predicted points starting the day after the
    /// fitted series' last date
    fn forecast(&self, horizon: usize) -> Result<Forecast>;

    /// Human-readable fit summary for the dashboard's summary panel
    fn summary(&self) -> String;

    /// Name of the model
    fn name(&self) -> &str;
}
