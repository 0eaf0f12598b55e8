//! # Stock Forecast
//!
//! A Rust library for interactive stock-price forecasting: load a daily
//! OHLCV series, check it for stationarity, decompose it into trend,
//! seasonal and residual components, fit a seasonal ARIMA model, and
//! compare the forecast against actuals as they become available.
//!
//! ## Features
//!
//! - Daily series loading over any [`market_data::MarketDataProvider`]
//! - Column selection backed by polars DataFrames
//! - Augmented Dickey-Fuller stationarity testing
//! - Classical additive decomposition at a configurable period
//! - Seasonal ARIMA estimation with user-tunable (p, d, q, s) orders
//! - Forecast-versus-actual comparison overlays
//! - A single [`dashboard::run_dashboard`] entry point wiring it all up
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use market_data::providers::YahooProvider;
//! use market_data::Ticker;
//! use stock_forecast::dashboard::{run_dashboard, DashboardRequest};
//! use stock_forecast::models::sarima::ModelParams;
//!
//! # fn main() -> stock_forecast::Result<()> {
//! let provider = YahooProvider::new()?;
//! let request = DashboardRequest {
//!     ticker: Ticker::AAPL,
//!     start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!     end: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
//!     column: "Close".to_string(),
//!     params: ModelParams::new(1, 1, 1, 12)?,
//!     horizon: 5,
//!     show_plots: true,
//!     compare_with_actuals: true,
//! };
//!
//! let view = run_dashboard(&provider, &request)?;
//! println!("stationary: {}", view.is_stationary());
//! println!("{}", view.model_summary);
//! for (date, value) in view.forecast.points() {
//!     println!("{date}  {value:.2}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod dashboard;
pub mod data;
pub mod decompose;
pub mod error;
pub mod models;
pub mod optimize;
pub mod stationarity;

// Re-export commonly used types
pub use crate::compare::ComparisonOverlay;
pub use crate::dashboard::{run_dashboard, DashboardRequest, DashboardView, ViewFlags};
pub use crate::data::{load, RawTable, SelectedSeries};
pub use crate::decompose::{decompose, Decomposition};
pub use crate::error::{ForecastError, Result};
pub use crate::models::sarima::{ModelParams, SarimaModel};
pub use crate::models::{FittedModel, Forecast, ForecastModel};
pub use crate::stationarity::{adf_test, is_stationary, AdfReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
