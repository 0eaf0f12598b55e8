//! Differencing and integration helpers for the SARIMA estimator.

/// Difference a series `order` times at lag 1.
pub(crate) fn difference(series: &[f64], order: usize) -> Vec<f64> {
    let mut out = series.to_vec();
    for _ in 0..order {
        if out.len() <= 1 {
            break;
        }
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Difference a series `order` times at the seasonal lag `period`.
pub(crate) fn seasonal_difference(series: &[f64], order: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut out = series.to_vec();
    for _ in 0..order {
        if out.len() <= period {
            break;
        }
        out = out
            .iter()
            .skip(period)
            .zip(out.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    out
}

/// Undo lag-1 differencing of order `order` for values that continue
/// `original`.
pub(crate) fn integrate(forecast: &[f64], original: &[f64], order: usize) -> Vec<f64> {
    if order == 0 || forecast.is_empty() {
        return forecast.to_vec();
    }

    let mut out = forecast.to_vec();
    for level in (0..order).rev() {
        let base = difference(original, level);
        let mut acc = base.last().copied().unwrap_or(0.0);
        for value in &mut out {
            acc += *value;
            *value = acc;
        }
    }
    out
}

/// Undo seasonal differencing of order `order` at lag `period` for values
/// that continue `original`.
///
/// Each reconstructed point is the differenced value plus the observation
/// one period earlier in the (history + reconstruction) sequence.
pub(crate) fn seasonal_integrate(
    forecast: &[f64],
    original: &[f64],
    order: usize,
    period: usize,
) -> Vec<f64> {
    if order == 0 || period == 0 || forecast.is_empty() {
        return forecast.to_vec();
    }

    let mut out = forecast.to_vec();
    for level in (0..order).rev() {
        let base = seasonal_difference(original, level, period);
        let mut extended = base;
        for value in &out {
            let prev = extended[extended.len() - period];
            extended.push(value + prev);
        }
        let keep = extended.len() - out.len();
        out = extended.split_off(keep);
    }
    out
}
