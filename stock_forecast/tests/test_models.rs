use chrono::{Duration, NaiveDate};
use rstest::rstest;

use stock_forecast::models::sarima::{ModelParams, SarimaModel};
use stock_forecast::models::{FittedModel, ForecastModel};
use stock_forecast::{ForecastError, SelectedSeries};

fn trending_series(n: usize) -> SelectedSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| start + Duration::days(i as i64))
        .collect();
    let values: Vec<f64> = (0..n)
        .map(|i| {
            100.0
                + 0.2 * i as f64
                + 2.0 * ((i % 12) as f64 / 12.0 * std::f64::consts::TAU).sin()
        })
        .collect();
    SelectedSeries::from_parts("Close", dates, values).unwrap()
}

#[test]
fn test_forecast_horizon_ten_gives_eleven_calendar_days() {
    let model = SarimaModel::new(ModelParams::new(1, 1, 1, 12).unwrap());
    let series = trending_series(120);

    let fitted = model.fit(&series).unwrap();
    let forecast = fitted.forecast(10).unwrap();

    assert_eq!(forecast.len(), 11);
    let first = series.last_date().unwrap() + Duration::days(1);
    assert_eq!(forecast.dates()[0], first);
    for pair in forecast.dates().windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(1));
    }
}

#[rstest]
#[case(0)]
#[case(400)]
fn test_out_of_range_horizon_rejected(#[case] horizon: usize) {
    let model = SarimaModel::new(ModelParams::new(1, 1, 1, 12).unwrap());
    let fitted = model.fit(&trending_series(120)).unwrap();

    assert!(matches!(
        fitted.forecast(horizon),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[rstest]
#[case(6, 1, 1, 12)]
#[case(1, 6, 1, 12)]
#[case(1, 1, 6, 12)]
#[case(1, 1, 1, 25)]
fn test_out_of_range_orders_rejected(
    #[case] p: usize,
    #[case] d: usize,
    #[case] q: usize,
    #[case] s: usize,
) {
    assert!(matches!(
        ModelParams::new(p, d, q, s),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_degenerate_seasonal_specification_is_a_fit_error() {
    let model = SarimaModel::new(ModelParams::new(2, 1, 0, 0).unwrap());
    assert!(matches!(
        model.fit(&trending_series(120)),
        Err(ForecastError::ModelFitError(_))
    ));
}

#[test]
fn test_summary_reports_fit_statistics() {
    let model = SarimaModel::new(ModelParams::new(1, 1, 1, 12).unwrap());
    let fitted = model.fit(&trending_series(120)).unwrap();

    let summary = fitted.summary();
    assert!(summary.contains("SARIMA(1,1,1)(1,1,1,12)"));
    assert!(summary.contains("120 observations"));
    assert!(summary.contains("AIC"));
    assert!(fitted.aic().is_finite());
    assert!(fitted.bic() >= fitted.aic());
}

#[test]
fn test_forecast_tracks_a_strong_trend() {
    let model = SarimaModel::new(ModelParams::new(1, 1, 1, 12).unwrap());
    let series = trending_series(120);
    let fitted = model.fit(&series).unwrap();

    let forecast = fitted.forecast(10).unwrap();
    let last = *series.values().last().unwrap();

    // an upward drift of 0.2/day should keep predictions in a sane band
    for &value in forecast.values() {
        assert!(value > last - 10.0 && value < last + 20.0);
    }
}
