//! Blocking HTTP provider for the Yahoo Finance chart endpoint.

use chrono::{DateTime, NaiveDate};
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::providers::{normalize_bars, MarketDataProvider};
use crate::{DailyBar, DateRange, OhlcvData, ProviderError, Ticker};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Default bound on a single chart request; data retrieval must never block
/// the pipeline indefinitely.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Daily OHLCV bars from the Yahoo Finance v8 chart API.
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    /// Create a provider with the default request timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a provider with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl MarketDataProvider for YahooProvider {
    fn fetch_daily(&self, ticker: Ticker, range: DateRange) -> Result<Vec<DailyBar>, ProviderError> {
        // The chart API takes an exclusive upper bound in epoch seconds, so
        // the inclusive range end is pushed out by one day.
        let period1 = epoch_seconds(range.start);
        let period2 = epoch_seconds(range.end + chrono::Duration::days(1));

        let url = format!("{}/{}", BASE_URL, ticker.symbol());
        debug!("requesting {} bars {}..={}", ticker, range.start, range.end);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .unwrap_or_else(|_| "unknown API error".to_string());
            return Err(ProviderError::Api(format!("{}: {}", status, body)));
        }

        let payload = response.json::<ChartResponse>()?;
        let bars = parse_chart(payload, ticker)?;
        debug!("{}: {} trading days returned", ticker, bars.len());
        Ok(normalize_bars(bars))
    }
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Convert a decoded chart payload into daily bars, dropping rows where the
/// source reports no trade data.
fn parse_chart(payload: ChartResponse, ticker: Ticker) -> Result<Vec<DailyBar>, ProviderError> {
    if let Some(err) = payload.chart.error {
        return Err(ProviderError::Api(format!(
            "{}: {}",
            err.code, err.description
        )));
    }

    let result = match payload.chart.result.into_iter().flatten().next() {
        Some(result) => result,
        None => return Ok(vec![]),
    };

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(vec![]),
    };

    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let date = match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt.date_naive(),
            None => {
                return Err(ProviderError::Malformed(format!(
                    "{}: unrepresentable timestamp {}",
                    ticker, ts
                )))
            }
        };

        let row = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
            value_at(&quote.volume, i),
        );

        let (open, high, low, close, volume) = match row {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => {
                // Half-days and halted sessions come back as nulls.
                warn!("{}: dropping incomplete row at {}", ticker, date);
                continue;
            }
        };

        let adj_close = value_at(&adjclose, i).unwrap_or(close);

        bars.push(DailyBar {
            date,
            data: OhlcvData {
                open,
                high,
                low,
                close,
                adj_close,
                volume: volume as u64,
            },
        });
    }

    Ok(bars)
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
