use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the conversion engine and the currency helper.
///
/// The original behavior of returning a sentinel 0 for unknown units or
/// missing rates is replaced by typed errors so callers cannot mistake
/// "converted to zero" for "conversion failed".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("cannot convert between {from} and {to} (different categories)")]
    CategoryMismatch { from: String, to: String },

    #[error("no exchange rate available for {0}")]
    RateUnavailable(String),
}

/// Errors raised by the exchange rate service.
#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid rates payload: {0}")]
    InvalidPayload(String),

    #[error("exchange rates unavailable")]
    RatesUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for CurrencyError {
    fn from(err: reqwest::Error) -> Self {
        CurrencyError::Network(err.to_string())
    }
}

/// Errors raised by the record stores and the rate persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("favorite already exists")]
    DuplicateFavorite,

    #[error("record not found: {0}")]
    NotFound(Uuid),

    #[error("storage error: {0}")]
    Database(String),
}
