use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::market_data_traits::{MarketDataServiceTrait, PriceProviderTrait};
use crate::assets::{Asset, AssetServiceTrait};
use crate::errors::Result;

/// Sweeps the asset catalog and records fresh oracle prices.
pub struct MarketDataService {
    provider: Arc<dyn PriceProviderTrait>,
    assets: Arc<dyn AssetServiceTrait>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn PriceProviderTrait>, assets: Arc<dyn AssetServiceTrait>) -> Self {
        Self { provider, assets }
    }

    async fn refresh(&self, asset: &Asset, now: DateTime<Utc>) -> Result<Asset> {
        let price = self.provider.latest_price(
            &asset.symbol,
            asset.category,
            Some(asset.current_price),
        )?;
        let updated = self.assets.record_price(&asset.id, price, now).await?;
        log::debug!("Updated {} to {}", updated.symbol, updated.current_price);
        Ok(updated)
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn refresh_stale(&self, now: DateTime<Utc>) -> Result<usize> {
        let assets = self.assets.list_active_assets()?;
        let mut updated = 0;

        for asset in assets {
            if !asset.needs_refresh(now) {
                continue;
            }
            match self.refresh(&asset, now).await {
                Ok(_) => updated += 1,
                Err(e) => {
                    log::error!("Error updating {}: {}", asset.symbol, e);
                }
            }
        }

        Ok(updated)
    }

    async fn refresh_asset(&self, asset_id: &str, now: DateTime<Utc>) -> Result<Asset> {
        let asset = self.assets.get_asset(asset_id)?;
        self.refresh(&asset, now).await
    }
}
