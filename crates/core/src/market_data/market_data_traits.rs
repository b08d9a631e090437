//! Price oracle and market data service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::assets::{Asset, AssetCategory};
use crate::errors::Result;

/// External price oracle.
///
/// The ledger core only requires positive prices; it does not validate
/// realism. Failures surface to the caller, which owns retry policy.
pub trait PriceProviderTrait: Send + Sync {
    fn latest_price(
        &self,
        symbol: &str,
        category: AssetCategory,
        last_price: Option<Decimal>,
    ) -> Result<Decimal>;
}

/// Trait defining the contract for the market data refresh service.
#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Refreshes every active asset whose price is stale. Returns the number
    /// of assets updated; per-asset failures are logged and skipped.
    async fn refresh_stale(&self, now: DateTime<Utc>) -> Result<usize>;

    /// Refreshes one asset unconditionally.
    async fn refresh_asset(&self, asset_id: &str, now: DateTime<Utc>) -> Result<Asset>;
}
