use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by wallet ledger operations.
///
/// `InsufficientFunds` is an expected business outcome. `InconsistentLedgerState`
/// is an integrity violation: it aborts the enclosing transaction, is logged
/// with full context, and must never be clamped or silently recovered.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: {available} available, {requested} requested")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Ledger integrity violation for wallet {wallet_id}: {details}")]
    InconsistentLedgerState { wallet_id: String, details: String },

    #[error("Invalid transaction status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Transaction {reference} is not a pending withdrawal")]
    NotAPendingWithdrawal { reference: String },
}
