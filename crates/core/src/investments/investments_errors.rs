use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the investment engine. All are expected business
/// outcomes returned to the caller for user-facing messaging.
#[derive(Error, Debug)]
pub enum InvestmentError {
    #[error("Duration of {duration_hours}h is not offered for {symbol}")]
    InvalidDuration { symbol: String, duration_hours: u32 },

    #[error("Minimum investment is {minimum} {currency}")]
    BelowMinimum { minimum: Decimal, currency: String },

    #[error("Maximum investment is {maximum} {currency}")]
    AboveMaximum { maximum: Decimal, currency: String },

    #[error("Investment {id} is not active (status: {status})")]
    NotActive { id: String, status: String },
}
