/// Ledger base currency. All stored monetary values are denominated in it.
pub const BASE_CURRENCY: &str = "USD";

/// Decimal precision for display-currency amounts
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Age after which an asset price is considered stale, in seconds
pub const PRICE_REFRESH_SECS: i64 = 300;

/// Prefix for ledger transaction references
pub const TRANSACTION_REFERENCE_PREFIX: &str = "TX";
