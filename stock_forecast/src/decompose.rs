//! Classical additive decomposition: value = trend + seasonal + residual.
//!
//! The trend is a centered moving average over one full period, so the first
//! and last half-window positions carry no trend (and hence no residual).
//! Those edges stay missing; they are inherent to the method and are never
//! interpolated.

use serde::Serialize;

use crate::data::SelectedSeries;
use crate::error::{ForecastError, Result};

/// Default periodicity used by the dashboard.
pub const DEFAULT_PERIOD: usize = 12;

/// Trend, seasonal and residual components aligned to the source series'
/// date axis. Trend and residual are `None` at the edges.
#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
    pub period: usize,
}

impl Decomposition {
    /// Number of observations (same as the source series).
    pub fn len(&self) -> usize {
        self.seasonal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasonal.is_empty()
    }
}

/// Additively decompose `series` at the given periodicity.
///
/// Requires at least two full periods of data (`InsufficientData` below
/// that); a period below 2 is `InvalidParameter`.
pub fn decompose(series: &SelectedSeries, period: usize) -> Result<Decomposition> {
    if period < 2 {
        return Err(ForecastError::InvalidParameter(format!(
            "decomposition period must be at least 2, got {}",
            period
        )));
    }

    let values = series.values();
    let n = values.len();
    if n < 2 * period {
        return Err(ForecastError::InsufficientData(format!(
            "decomposition at period {} needs at least {} observations, got {}",
            period,
            2 * period,
            n
        )));
    }

    let trend = centered_moving_average(values, period);

    // Seasonal means over the detrended series, indexed by position within
    // the period, then re-centered so the component sums to zero.
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, t) in trend.iter().enumerate() {
        if let Some(t) = t {
            sums[i % period] += values[i] - t;
            counts[i % period] += 1;
        }
    }

    let mut means: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(s, c)| if *c > 0 { s / *c as f64 } else { 0.0 })
        .collect();
    let grand_mean = means.iter().sum::<f64>() / period as f64;
    for m in &mut means {
        *m -= grand_mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| means[i % period]).collect();

    let residual: Vec<Option<f64>> = trend
        .iter()
        .enumerate()
        .map(|(i, t)| t.map(|t| values[i] - t - seasonal[i]))
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
        period,
    })
}

/// Centered moving average over one period.
///
/// Even periods use the standard 2×m window with half weight on the two
/// outermost points; odd periods use a plain symmetric window.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let mut trend = vec![None; n];

    if period % 2 == 0 {
        // window spans [i - half, i + half] with weights 0.5 at the ends
        for i in half..n.saturating_sub(half) {
            let mut sum = 0.5 * values[i - half] + 0.5 * values[i + half];
            for j in (i - half + 1)..(i + half) {
                sum += values[j];
            }
            trend[i] = Some(sum / period as f64);
        }
    } else {
        for i in half..n.saturating_sub(half) {
            let sum: f64 = values[(i - half)..=(i + half)].iter().sum();
            trend[i] = Some(sum / period as f64);
        }
    }

    trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_from(values: Vec<f64>) -> SelectedSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        SelectedSeries::from_parts("Close", dates, values).unwrap()
    }

    #[test]
    fn short_series_is_insufficient() {
        let series = series_from((0..20).map(|i| i as f64).collect());
        assert!(matches!(
            decompose(&series, 12),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn period_below_two_is_invalid() {
        let series = series_from((0..20).map(|i| i as f64).collect());
        assert!(matches!(
            decompose(&series, 1),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn edges_carry_no_trend_or_residual() {
        let series = series_from((0..48).map(|i| i as f64).collect());
        let result = decompose(&series, 12).unwrap();

        for i in 0..6 {
            assert!(result.trend[i].is_none());
            assert!(result.residual[i].is_none());
        }
        for i in 42..48 {
            assert!(result.trend[i].is_none());
            assert!(result.residual[i].is_none());
        }
        assert!(result.trend[6].is_some());
        assert!(result.trend[41].is_some());
    }

    #[test]
    fn seasonal_component_sums_to_zero_over_a_period() {
        let values: Vec<f64> = (0..60)
            .map(|i| 100.0 + 0.5 * i as f64 + 5.0 * ((i % 12) as f64 / 12.0 * std::f64::consts::TAU).sin())
            .collect();
        let result = decompose(&series_from(values), 12).unwrap();

        let sum: f64 = result.seasonal[..12].iter().sum();
        assert!(sum.abs() < 1e-9);
    }

    #[test]
    fn recovers_linear_trend_and_sinusoidal_seasonal() {
        let period = 12;
        let trend_fn = |i: usize| 10.0 + 0.25 * i as f64;
        let seasonal_fn =
            |i: usize| 3.0 * ((i % period) as f64 / period as f64 * std::f64::consts::TAU).sin();
        let values: Vec<f64> = (0..96).map(|i| trend_fn(i) + seasonal_fn(i)).collect();

        let result = decompose(&series_from(values), period).unwrap();

        // interior trend matches the known line
        for i in period..(96 - period) {
            let trend = result.trend[i].unwrap();
            assert!((trend - trend_fn(i)).abs() < 0.35, "trend off at {}: {}", i, trend);
        }

        // seasonal pattern matches the sinusoid up to its mean offset
        for i in 0..period {
            let expected = seasonal_fn(i);
            assert!(
                (result.seasonal[i] - expected).abs() < 0.35,
                "seasonal off at {}: {} vs {}",
                i,
                result.seasonal[i],
                expected
            );
        }

        // residual near zero away from the edges
        for i in period..(96 - period) {
            assert!(result.residual[i].unwrap().abs() < 0.5);
        }
    }
}
