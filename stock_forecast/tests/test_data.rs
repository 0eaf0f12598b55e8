use std::io::Write;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use market_data::providers::CsvProvider;
use market_data::Ticker;
use stock_forecast::data::load;
use stock_forecast::ForecastError;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_fixture(dir: &std::path::Path) {
    let mut file = std::fs::File::create(dir.join("AAPL.csv")).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    // deliberately out of order with one duplicate date
    writeln!(file, "2020-01-06,73.45,74.99,73.19,74.95,72.93,118387200").unwrap();
    writeln!(file, "2020-01-02,74.06,75.15,73.80,75.09,73.06,135480400").unwrap();
    writeln!(file, "2020-01-03,74.29,75.14,74.12,74.36,72.35,146322800").unwrap();
    writeln!(file, "2020-01-03,74.29,75.14,74.12,74.36,72.35,146322800").unwrap();
}

#[test]
fn test_loaded_table_has_strictly_ascending_unique_dates() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let provider = CsvProvider::new(dir.path());

    let table = load(&provider, Ticker::AAPL, ymd(2020, 1, 1), ymd(2020, 1, 31)).unwrap();

    assert_eq!(table.len(), 3);
    let dates = table.dates();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(dates[0], ymd(2020, 1, 2));
    assert_eq!(dates[2], ymd(2020, 1, 6));
}

#[test]
fn test_selected_column_matches_source_values() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let provider = CsvProvider::new(dir.path());

    let table = load(&provider, Ticker::AAPL, ymd(2020, 1, 1), ymd(2020, 1, 31)).unwrap();
    let series = table.select("Close").unwrap();

    assert_eq!(series.len(), table.len());
    assert_eq!(series.values(), &[75.09, 74.36, 74.95]);
    assert_eq!(series.dates(), table.dates());
}

#[test]
fn test_unknown_column_always_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let provider = CsvProvider::new(dir.path());
    let table = load(&provider, Ticker::AAPL, ymd(2020, 1, 1), ymd(2020, 1, 31)).unwrap();

    for column in ["Date", "close", "Turnover", ""] {
        assert!(matches!(
            table.select(column),
            Err(ForecastError::UnknownColumn(_))
        ));
    }
}

#[test]
fn test_range_without_trading_days_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let provider = CsvProvider::new(dir.path());

    // the 4th/5th were a weekend in this fixture
    let result = load(&provider, Ticker::AAPL, ymd(2020, 1, 4), ymd(2020, 1, 5));
    assert!(matches!(result, Err(ForecastError::DataUnavailable(_))));
}

#[test]
fn test_inverted_range_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let provider = CsvProvider::new(dir.path());

    let result = load(&provider, Ticker::AAPL, ymd(2020, 2, 1), ymd(2020, 1, 1));
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}
