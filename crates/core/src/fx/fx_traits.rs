//! Currency registry repository and service traits.
//!
//! These traits define the contract for currency operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::fx_model::{Currency, DisplayContext, DisplayPreference};
use crate::errors::Result;

/// Trait defining the contract for currency repository operations.
#[async_trait]
pub trait CurrencyRepositoryTrait: Send + Sync {
    /// Looks a currency up by its code. `Ok(None)` when unknown.
    fn get_by_code(&self, code: &str) -> Result<Option<Currency>>;

    /// Lists all active currencies.
    fn list_active(&self) -> Result<Vec<Currency>>;

    /// Inserts or updates a currency keyed by its code.
    async fn upsert(&self, currency: Currency) -> Result<Currency>;
}

/// Trait defining the contract for the currency registry service.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Loads the active-currency cache from the repository.
    fn initialize(&self) -> Result<()>;

    /// Resolves the display currency for a request. Never fails: unknown or
    /// inactive codes fall back to the base currency.
    fn get_display_currency(&self, preference: &DisplayPreference) -> DisplayContext;

    /// Converts a base-currency amount for display (2 places, half-up).
    fn to_display(&self, amount_base: Decimal, currency: &Currency) -> Decimal;

    /// Converts a display-currency amount to base at full precision.
    fn to_base(&self, amount_display: Decimal, currency: &Currency) -> Decimal;

    /// Lists all active currencies.
    fn list_active_currencies(&self) -> Result<Vec<Currency>>;

    /// Inserts or updates a currency after validation.
    async fn upsert_currency(&self, currency: Currency) -> Result<Currency>;

    /// Seeds the registry with the operator defaults. Idempotent.
    async fn seed_defaults(&self) -> Result<usize>;
}
