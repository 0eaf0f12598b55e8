//! End-to-end pipeline demo on synthetic data.
//!
//! Run with: cargo run --example dashboard_run

use chrono::NaiveDate;
use market_data::providers::FixtureProvider;
use market_data::utils::generate_test_data;
use market_data::Ticker;
use stock_forecast::dashboard::{run_dashboard, DashboardRequest};
use stock_forecast::models::sarima::ModelParams;

fn main() -> stock_forecast::Result<()> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2).expect("valid date");
    let bars = generate_test_data(180, start, 150.0, 0.015);
    let provider = FixtureProvider::new().with_series(Ticker::AAPL, bars);

    let request = DashboardRequest {
        ticker: Ticker::AAPL,
        start,
        end: NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid date"),
        column: "Close".to_string(),
        params: ModelParams::new(1, 1, 1, 12)?,
        horizon: 7,
        show_plots: true,
        compare_with_actuals: true,
    };

    let view = run_dashboard(&provider, &request)?;

    println!("=== {} {} ===", request.ticker, request.column);
    println!("trading days: {}", view.series.len());
    println!(
        "stationary: {} (ADF statistic {:.4}, p-value {:.4})",
        view.is_stationary(),
        view.stationarity.statistic,
        view.stationarity.p_value
    );

    println!("\n--- model ---");
    println!("{}", view.model_summary);

    println!("\n--- forecast ---");
    for (date, value) in view.forecast.points() {
        println!("{date}  {value:>10.2}");
    }

    if let Some(overlay) = &view.comparison {
        println!("\n--- observed after {} ---", request.end);
        if overlay.has_observed() {
            for (date, value) in overlay
                .observed
                .dates()
                .iter()
                .zip(overlay.observed.values())
            {
                println!("{date}  {value:>10.2}");
            }
        } else {
            println!("(no new trading days yet)");
        }
    }

    Ok(())
}
