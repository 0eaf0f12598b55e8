//! Utility helpers for building bar series.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{DailyBar, OhlcvData};

/// Generate synthetic daily OHLCV data for testing purposes
///
/// Prices follow a random walk with the given volatility; dates advance over
/// weekdays only, so the series has the trading-day gaps of real data.
///
/// # Arguments
/// * `num_points` - Number of trading days to generate
/// * `start_date` - Date of the first bar (pushed to the next weekday if it
///   falls on a weekend)
/// * `starting_price` - Close price of the first bar
/// * `volatility` - Daily price volatility factor (0.0-1.0)
pub fn generate_test_data(
    num_points: usize,
    start_date: NaiveDate,
    starting_price: f64,
    volatility: f64,
) -> Vec<DailyBar> {
    use rand::{thread_rng, Rng};

    let mut rng = thread_rng();
    let mut bars = Vec::with_capacity(num_points);
    let mut date = next_weekday(start_date);
    let mut close = starting_price;

    for _ in 0..num_points {
        let drift: f64 = rng.gen_range(-volatility..=volatility);
        let open = close;
        close = (open * (1.0 + drift)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..volatility / 2.0));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..volatility / 2.0));
        let volume = rng.gen_range(500_000..5_000_000);

        bars.push(DailyBar {
            date,
            data: OhlcvData {
                open,
                high,
                low,
                close,
                adj_close: close,
                volume,
            },
        });

        date = next_weekday(date + chrono::Duration::days(1));
    }

    bars
}

fn next_weekday(mut date: NaiveDate) -> NaiveDate {
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += chrono::Duration::days(1);
    }
    date
}
