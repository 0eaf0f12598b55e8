//! Seasonal ARIMA estimated by conditional sum of squares.
//!
//! The dashboard exposes (p, d, q) and a seasonal period; the seasonal order
//! reuses (p, d, q) at that period, i.e. SARIMA(p,d,q)(p,d,q,s), matching
//! the original dashboard's parameterization. Coefficients are found by
//! minimizing the conditional sum of squares with the bounded Nelder-Mead
//! search in [`crate::optimize`].

use log::debug;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use chrono::NaiveDate;

use crate::data::SelectedSeries;
use crate::error::{ForecastError, Result};
use crate::models::diff::{difference, integrate, seasonal_difference, seasonal_integrate};
use crate::models::{validate_horizon, FittedModel, Forecast, ForecastModel};
use crate::optimize::{minimize, SimplexOptions};

/// Largest accepted value for each of p, d, q.
pub const MAX_ORDER: usize = 5;

/// Largest accepted seasonal period.
pub const MAX_SEASONAL_PERIOD: usize = 24;

/// User-supplied model orders, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParams {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// Seasonal period (s); 0 disables the seasonal part
    pub seasonal_period: usize,
}

impl ModelParams {
    /// Validate and build model parameters: p/d/q in [0, 5], period in
    /// [0, 24].
    pub fn new(p: usize, d: usize, q: usize, seasonal_period: usize) -> Result<Self> {
        for (name, value) in [("p", p), ("d", d), ("q", q)] {
            if value > MAX_ORDER {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be in [0, {}], got {}",
                    name, MAX_ORDER, value
                )));
            }
        }
        if seasonal_period > MAX_SEASONAL_PERIOD {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be in [0, {}], got {}",
                MAX_SEASONAL_PERIOD, seasonal_period
            )));
        }
        Ok(Self {
            p,
            d,
            q,
            seasonal_period,
        })
    }

    fn label(&self) -> String {
        format!(
            "SARIMA({},{},{})({},{},{},{})",
            self.p, self.d, self.q, self.p, self.d, self.q, self.seasonal_period
        )
    }
}

/// Unfitted seasonal ARIMA specification.
#[derive(Debug, Clone)]
pub struct SarimaModel {
    name: String,
    params: ModelParams,
}

impl SarimaModel {
    pub fn new(params: ModelParams) -> Self {
        Self {
            name: params.label(),
            params,
        }
    }

    pub fn params(&self) -> ModelParams {
        self.params
    }
}

/// Fitted seasonal ARIMA model, ready to forecast.
#[derive(Debug, Clone)]
pub struct FittedSarima {
    name: String,
    params: ModelParams,
    intercept: f64,
    ar: Vec<f64>,
    seasonal_ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ma: Vec<f64>,
    /// Original observations.
    values: Vec<f64>,
    /// After regular differencing only (base for seasonal integration).
    regular_diffed: Vec<f64>,
    /// Fully differenced series the recursion runs on.
    diffed: Vec<f64>,
    /// Residuals on the differenced scale.
    residuals: Vec<f64>,
    residual_variance: f64,
    aic: f64,
    bic: f64,
    last_date: NaiveDate,
}

/// One conditional-sum-of-squares evaluation.
///
/// `coef` layout: [intercept, ar.., seasonal_ar.., ma.., seasonal_ma..].
fn css(
    z: &[f64],
    start: usize,
    p: usize,
    q: usize,
    sp: usize,
    sq: usize,
    period: usize,
    coef: &[f64],
) -> f64 {
    let n = z.len();
    let c = coef[0];
    let ar = &coef[1..1 + p];
    let sar = &coef[1 + p..1 + p + sp];
    let ma = &coef[1 + p + sp..1 + p + sp + q];
    let sma = &coef[1 + p + sp + q..];

    let mut residuals = vec![0.0; n];
    let mut total = 0.0;

    for t in start..n {
        let mut pred = c;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (z[t - 1 - i] - c);
        }
        for (i, phi) in sar.iter().enumerate() {
            pred += phi * (z[t - period * (i + 1)] - c);
        }
        for (i, theta) in ma.iter().enumerate() {
            pred += theta * residuals[t - 1 - i];
        }
        for (i, theta) in sma.iter().enumerate() {
            pred += theta * residuals[t - period * (i + 1)];
        }

        let error = z[t] - pred;
        residuals[t] = error;
        total += error * error;
    }

    if total.is_finite() {
        total
    } else {
        f64::MAX
    }
}

impl ForecastModel for SarimaModel {
    type Fitted = FittedSarima;

    fn fit(&self, series: &SelectedSeries) -> Result<FittedSarima> {
        let ModelParams {
            p,
            d,
            q,
            seasonal_period: s,
        } = self.params;

        if s == 0 && (p > 0 || d > 0 || q > 0) {
            return Err(ForecastError::ModelFitError(format!(
                "{}: seasonal period 0 with non-zero seasonal orders is degenerate",
                self.name
            )));
        }

        let last_date = series.last_date().ok_or_else(|| {
            ForecastError::ModelFitError("cannot fit on an empty series".to_string())
        })?;
        let values = series.values().to_vec();

        // seasonal order mirrors (p, d, q)
        let (sp, sq) = if s > 0 { (p, q) } else { (0, 0) };

        let regular_diffed = difference(&values, d);
        let diffed = if s > 0 {
            seasonal_difference(&regular_diffed, d, s)
        } else {
            regular_diffed.clone()
        };

        let start = p.max(q).max(s * sp).max(s * sq);
        if diffed.len() < start + 3 {
            return Err(ForecastError::ModelFitError(format!(
                "{}: series too short after differencing ({} points, need {})",
                self.name,
                diffed.len(),
                start + 3
            )));
        }

        let mean = diffed.iter().sum::<f64>() / diffed.len() as f64;
        let n_coef = 1 + p + sp + q + sq;

        let (intercept, coef) = if n_coef == 1 {
            (mean, vec![mean])
        } else {
            let mut initial = vec![0.0; n_coef];
            initial[0] = mean;
            for (i, slot) in initial[1..].iter_mut().enumerate() {
                *slot = 0.1 / (i + 1) as f64;
            }

            let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
            bounds.extend(std::iter::repeat((-0.99, 0.99)).take(n_coef - 1));

            let options = SimplexOptions {
                max_iter: 5000,
                tolerance: 1e-6,
                ..Default::default()
            };
            let outcome = minimize(
                |coef| css(&diffed, start, p, q, sp, sq, s, coef),
                &initial,
                Some(&bounds),
                options,
            );

            if !outcome.value.is_finite() {
                return Err(ForecastError::ModelFitError(format!(
                    "{}: objective diverged during estimation",
                    self.name
                )));
            }
            if !outcome.converged {
                return Err(ForecastError::ModelFitError(format!(
                    "{}: estimation did not converge after {} iterations",
                    self.name, outcome.iterations
                )));
            }
            debug!(
                "{}: converged in {} iterations, css {:.6}",
                self.name, outcome.iterations, outcome.value
            );

            (outcome.point[0], outcome.point)
        };

        let ar = coef[1..1 + p].to_vec();
        let seasonal_ar = coef[1 + p..1 + p + sp].to_vec();
        let ma = coef[1 + p + sp..1 + p + sp + q].to_vec();
        let seasonal_ma = coef[1 + p + sp + q..].to_vec();

        // residual pass with the final coefficients
        let n = diffed.len();
        let mut residuals = vec![0.0; n];
        for t in start..n {
            let mut pred = intercept;
            for (i, phi) in ar.iter().enumerate() {
                pred += phi * (diffed[t - 1 - i] - intercept);
            }
            for (i, phi) in seasonal_ar.iter().enumerate() {
                pred += phi * (diffed[t - s * (i + 1)] - intercept);
            }
            for (i, theta) in ma.iter().enumerate() {
                pred += theta * residuals[t - 1 - i];
            }
            for (i, theta) in seasonal_ma.iter().enumerate() {
                pred += theta * residuals[t - s * (i + 1)];
            }
            residuals[t] = diffed[t] - pred;
        }

        let effective: &[f64] = &residuals[start..];
        let residual_variance =
            effective.iter().map(|r| r * r).sum::<f64>() / effective.len() as f64;
        if !residual_variance.is_finite() {
            return Err(ForecastError::ModelFitError(format!(
                "{}: non-finite residual variance",
                self.name
            )));
        }

        let n_eff = effective.len() as f64;
        let k = n_coef as f64;
        let log_likelihood = -0.5
            * n_eff
            * (1.0 + residual_variance.max(f64::MIN_POSITIVE).ln()
                + (2.0 * std::f64::consts::PI).ln());
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n_eff.ln();

        Ok(FittedSarima {
            name: self.name.clone(),
            params: self.params,
            intercept,
            ar,
            seasonal_ar,
            ma,
            seasonal_ma,
            values,
            regular_diffed,
            diffed,
            residuals,
            residual_variance,
            aic,
            bic,
            last_date,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedSarima {
    pub fn params(&self) -> ModelParams {
        self.params
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Extend the differenced series `steps` points into the future, with
    /// future shocks at zero.
    fn extend_diffed(&self, steps: usize) -> Vec<f64> {
        let s = self.params.seasonal_period;
        let mut z = self.diffed.clone();
        let mut e = self.residuals.clone();

        for _ in 0..steps {
            let t = z.len();
            let mut pred = self.intercept;
            for (i, phi) in self.ar.iter().enumerate() {
                if t > i {
                    pred += phi * (z[t - 1 - i] - self.intercept);
                }
            }
            for (i, phi) in self.seasonal_ar.iter().enumerate() {
                let lag = s * (i + 1);
                if t >= lag {
                    pred += phi * (z[t - lag] - self.intercept);
                }
            }
            for (i, theta) in self.ma.iter().enumerate() {
                if t > i {
                    pred += theta * e[t - 1 - i];
                }
            }
            for (i, theta) in self.seasonal_ma.iter().enumerate() {
                let lag = s * (i + 1);
                if t >= lag {
                    pred += theta * e[t - lag];
                }
            }
            z.push(pred);
            e.push(0.0);
        }

        z.split_off(self.diffed.len())
    }
}

impl FittedModel for FittedSarima {
    fn forecast(&self, horizon: usize) -> Result<Forecast> {
        validate_horizon(horizon)?;

        let ModelParams {
            d,
            seasonal_period: s,
            ..
        } = self.params;

        // horizon + 1 points, as the dashboard has always produced
        let steps = horizon + 1;
        let forecast_diffed = self.extend_diffed(steps);

        let on_regular_scale = if s > 0 && d > 0 {
            seasonal_integrate(&forecast_diffed, &self.regular_diffed, d, s)
        } else {
            forecast_diffed
        };
        let predictions = if d > 0 {
            integrate(&on_regular_scale, &self.values, d)
        } else {
            on_regular_scale
        };

        // calendar-day axis starting the day after the fitted series ends
        let dates: Vec<NaiveDate> = (1..=steps as i64)
            .map(|offset| self.last_date + chrono::Duration::days(offset))
            .collect();

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ModelFitError(e.to_string()))?;
        let z_score = normal.inverse_cdf(0.975);
        let intervals: Vec<(f64, f64)> = predictions
            .iter()
            .enumerate()
            .map(|(h, &value)| {
                let se = (self.residual_variance * (h + 1) as f64).sqrt();
                (value - z_score * se, value + z_score * se)
            })
            .collect();

        Forecast::new(dates, predictions)?.with_intervals(intervals)
    }

    fn summary(&self) -> String {
        let mut lines = vec![
            format!("{} fitted on {} observations", self.name, self.values.len()),
            format!(
                "intercept {:.6}  sigma^2 {:.6}",
                self.intercept, self.residual_variance
            ),
            format!("AIC {:.3}  BIC {:.3}", self.aic, self.bic),
        ];
        for (label, coefs) in [
            ("ar", &self.ar),
            ("seasonal ar", &self.seasonal_ar),
            ("ma", &self.ma),
            ("seasonal ma", &self.seasonal_ma),
        ] {
            if !coefs.is_empty() {
                let rendered: Vec<String> =
                    coefs.iter().map(|c| format!("{:+.4}", c)).collect();
                lines.push(format!("{}: {}", label, rendered.join(", ")));
            }
        }
        lines.join("\n")
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> SelectedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let dates: Vec<NaiveDate> = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        SelectedSeries::from_parts("Close", dates, values).unwrap()
    }

    #[test]
    fn params_bounds_enforced() {
        assert!(ModelParams::new(6, 1, 1, 12).is_err());
        assert!(ModelParams::new(1, 6, 1, 12).is_err());
        assert!(ModelParams::new(1, 1, 6, 12).is_err());
        assert!(ModelParams::new(1, 1, 1, 25).is_err());
        assert!(ModelParams::new(5, 5, 5, 24).is_ok());
        assert!(ModelParams::new(0, 0, 0, 0).is_ok());
    }

    #[test]
    fn degenerate_seasonal_specification_rejected() {
        let params = ModelParams::new(1, 1, 1, 0).unwrap();
        let model = SarimaModel::new(params);
        let data = series((0..40).map(|i| 10.0 + i as f64).collect());
        assert!(matches!(
            model.fit(&data),
            Err(ForecastError::ModelFitError(_))
        ));
    }

    #[test]
    fn too_short_series_fails_fit() {
        let params = ModelParams::new(1, 1, 1, 12).unwrap();
        let model = SarimaModel::new(params);
        let data = series(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(matches!(
            model.fit(&data),
            Err(ForecastError::ModelFitError(_))
        ));
    }

    #[test]
    fn mean_only_model_forecasts_the_mean() {
        let params = ModelParams::new(0, 0, 0, 0).unwrap();
        let model = SarimaModel::new(params);
        let data = series(vec![5.0; 30]);

        let fitted = model.fit(&data).unwrap();
        let forecast = fitted.forecast(3).unwrap();

        assert_eq!(forecast.len(), 4);
        for &value in forecast.values() {
            assert!((value - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn forecast_dates_are_consecutive_calendar_days() {
        let params = ModelParams::new(1, 1, 1, 4).unwrap();
        let model = SarimaModel::new(params);
        let values: Vec<f64> = (0..60)
            .map(|i| 100.0 + 0.3 * i as f64 + ((i % 4) as f64 - 1.5))
            .collect();
        let data = series(values);

        let fitted = model.fit(&data).unwrap();
        let forecast = fitted.forecast(10).unwrap();

        assert_eq!(forecast.len(), 11);
        let expected_start = data.last_date().unwrap() + chrono::Duration::days(1);
        assert_eq!(forecast.dates()[0], expected_start);
        for pair in forecast.dates().windows(2) {
            assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
        }
    }

    #[test]
    fn trend_series_forecast_continues_upward() {
        let params = ModelParams::new(1, 1, 0, 0).unwrap();
        // d=1 with seasonal_period 0 is a degenerate specification
        assert!(SarimaModel::new(params)
            .fit(&series((0..50).map(|i| 10.0 + 2.0 * i as f64).collect()))
            .is_err());

        let params = ModelParams::new(1, 1, 0, 2).unwrap();
        let model = SarimaModel::new(params);
        let data = series((0..50).map(|i| 10.0 + 2.0 * i as f64).collect());
        let fitted = model.fit(&data).unwrap();
        let forecast = fitted.forecast(5).unwrap();

        let last = *data.values().last().unwrap();
        assert!(forecast.values()[0] > last - 5.0);
        assert!(forecast.values().last().unwrap() > &last);
    }

    #[test]
    fn horizon_validated_before_any_work() {
        let params = ModelParams::new(0, 0, 0, 0).unwrap();
        let model = SarimaModel::new(params);
        let fitted = model.fit(&series(vec![1.0; 20])).unwrap();

        assert!(matches!(
            fitted.forecast(0),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            fitted.forecast(400),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn intervals_widen_with_horizon() {
        let params = ModelParams::new(1, 0, 0, 0).unwrap();
        // s=0 requires p=d=q=0; use a seasonal variant instead
        assert!(SarimaModel::new(params)
            .fit(&series((0..40).map(|i| (i as f64 * 0.7).sin()).collect()))
            .is_err());

        let params = ModelParams::new(1, 0, 0, 2).unwrap();
        let model = SarimaModel::new(params);
        let values: Vec<f64> = (0..80).map(|i| 10.0 + (i as f64 * 0.7).sin()).collect();
        let fitted = model.fit(&series(values)).unwrap();
        let forecast = fitted.forecast(5).unwrap();

        let intervals = forecast.intervals().unwrap();
        let first_width = intervals[0].1 - intervals[0].0;
        let last_width = intervals[5].1 - intervals[5].0;
        assert!(last_width >= first_width);
    }

    #[test]
    fn summary_names_the_specification() {
        let params = ModelParams::new(1, 1, 1, 4).unwrap();
        let model = SarimaModel::new(params);
        let values: Vec<f64> = (0..60)
            .map(|i| 50.0 + 0.2 * i as f64 + ((i % 4) as f64))
            .collect();
        let fitted = model.fit(&series(values)).unwrap();

        let summary = fitted.summary();
        assert!(summary.contains("SARIMA(1,1,1)(1,1,1,4)"));
        assert!(summary.contains("AIC"));
        assert!(summary.contains("ar:"));
    }
}
