use thiserror::Error;

/// Errors raised by the market asset catalog.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset '{0}' is not open for investment")]
    Inactive(String),

    #[error("Invalid price for asset '{symbol}': {details}")]
    InvalidPrice { symbol: String, details: String },

    #[error("Incomplete asset definition: {0}")]
    Incomplete(String),
}
