//! Asset catalog repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::assets_model::{Asset, NewAsset, PriceUpdate};
use crate::errors::Result;

/// Trait defining the contract for asset repository operations.
#[async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;

    fn get_by_symbol(&self, symbol: &str) -> Result<Asset>;

    /// Lists assets ordered for display.
    fn list(&self, active_only: bool) -> Result<Vec<Asset>>;

    async fn insert(&self, asset: Asset) -> Result<Asset>;

    /// Persists the derived price fields for one asset.
    async fn update_price(&self, asset_id: &str, update: PriceUpdate) -> Result<Asset>;
}

/// Trait defining the contract for the asset catalog service.
#[async_trait]
pub trait AssetServiceTrait: Send + Sync {
    fn get_asset(&self, asset_id: &str) -> Result<Asset>;

    fn get_by_symbol(&self, symbol: &str) -> Result<Asset>;

    fn list_active_assets(&self) -> Result<Vec<Asset>>;

    /// Return rate for a duration; zero for unsupported durations.
    fn get_return_rate(&self, asset: &Asset, duration_hours: u32) -> Decimal;

    /// Expected profit for an amount over a duration.
    fn calculate_profit(&self, asset: &Asset, amount: Decimal, duration_hours: u32) -> Decimal;

    /// Whether the asset's stored price is stale.
    fn needs_refresh(&self, asset: &Asset, now: DateTime<Utc>) -> bool;

    async fn create_asset(&self, new_asset: NewAsset) -> Result<Asset>;

    /// Records an oracle-supplied price, deriving the change fields.
    async fn record_price(
        &self,
        asset_id: &str,
        new_price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Asset>;

    /// Seeds the catalog with the operator defaults. Idempotent.
    async fn seed_defaults(&self) -> Result<usize>;
}
