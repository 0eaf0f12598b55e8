//! Error types for the stock_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the stock_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The data source returned no rows for the requested ticker/range
    #[error("no data available: {0}")]
    DataUnavailable(String),

    /// The requested column does not exist in the table
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// The series is too short for the requested test or decomposition
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A model or horizon input is out of its allowed range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The model did not converge or the specification is degenerate
    #[error("model fit error: {0}")]
    ModelFitError(String),

    /// Error from the market data provider
    #[error("provider error: {0}")]
    Provider(#[from] market_data::ProviderError),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
