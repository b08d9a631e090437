use thiserror::Error;

/// Errors raised by the currency registry.
///
/// `CurrencyUnavailable` is recovered internally by falling back to the base
/// currency and is never surfaced from display-currency resolution.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Currency '{0}' is unavailable")]
    CurrencyUnavailable(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidExchangeRate(String),

    #[error("Currency cache error: {0}")]
    CacheError(String),
}
