use thiserror::Error;

/// Errors raised by bonus issuance.
#[derive(Error, Debug)]
pub enum BonusError {
    #[error("Bonus {0} has already been claimed")]
    AlreadyClaimed(String),

    #[error("Bonus {0} has expired")]
    Expired(String),
}
