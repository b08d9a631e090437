//! Asset domain models.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetError;
use crate::constants::PRICE_REFRESH_SECS;
use crate::errors::Result;

/// Tradable asset category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Crypto,
    Forex,
    Futures,
    Stock,
}

impl AssetCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Crypto => "crypto",
            AssetCategory::Forex => "forex",
            AssetCategory::Futures => "futures",
            AssetCategory::Stock => "stock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "crypto" => Some(AssetCategory::Crypto),
            "forex" => Some(AssetCategory::Forex),
            "futures" => Some(AssetCategory::Futures),
            "stock" => Some(AssetCategory::Stock),
            _ => None,
        }
    }
}

/// Advertised risk banding for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "very_high" => Some(RiskLevel::VeryHigh),
            _ => None,
        }
    }
}

/// Domain model representing a tradable asset.
///
/// Assets are fully populated at construction time: every allowed duration
/// carries a return-rate entry and the price is positive. Price fields change
/// only through oracle updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub category: AssetCategory,
    pub current_price: Decimal,
    pub previous_price: Decimal,
    pub change_percentage: Decimal,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
    /// Return rate (percent) keyed by duration in hours.
    pub return_rates: BTreeMap<u32, Decimal>,
    pub allowed_durations: Vec<u32>,
    pub risk_level: RiskLevel,
    pub display_order: i32,
    pub is_active: bool,
    pub last_price_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Return rate for a duration. Unsupported durations yield zero.
    pub fn get_return_rate(&self, duration_hours: u32) -> Decimal {
        self.return_rates
            .get(&duration_hours)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Expected profit for an investment of `invested_amount` over a duration.
    pub fn calculate_profit(&self, invested_amount: Decimal, duration_hours: u32) -> Decimal {
        invested_amount * self.get_return_rate(duration_hours) / Decimal::ONE_HUNDRED
    }

    /// Whether the stored price is older than the refresh threshold.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now - self.last_price_update > Duration::seconds(PRICE_REFRESH_SECS)
    }

    /// Derives the price-change fields for an oracle update.
    ///
    /// The catalog never computes a price itself; it only records what the
    /// oracle supplied and shifts the previous value.
    pub fn price_update(&self, new_price: Decimal, now: DateTime<Utc>) -> Result<PriceUpdate> {
        if new_price <= Decimal::ZERO {
            return Err(AssetError::InvalidPrice {
                symbol: self.symbol.clone(),
                details: format!("oracle supplied non-positive price {}", new_price),
            }
            .into());
        }

        let (previous_price, change_percentage) = if self.current_price > Decimal::ZERO {
            let previous = self.current_price;
            let change = (new_price - previous) / previous * Decimal::ONE_HUNDRED;
            (previous, change)
        } else {
            (self.previous_price, self.change_percentage)
        };

        Ok(PriceUpdate {
            current_price: new_price,
            previous_price,
            change_percentage,
            last_price_update: now,
        })
    }
}

/// Derived price fields persisted on each oracle update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub current_price: Decimal,
    pub previous_price: Decimal,
    pub change_percentage: Decimal,
    pub last_price_update: DateTime<Utc>,
}

/// Input model for creating a new asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub symbol: String,
    pub name: String,
    pub category: AssetCategory,
    pub current_price: Decimal,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
    pub return_rates: BTreeMap<u32, Decimal>,
    pub allowed_durations: Vec<u32>,
    pub risk_level: RiskLevel,
    pub display_order: i32,
}

impl NewAsset {
    /// Construction-time validation. Rejects incomplete assets instead of
    /// tolerating missing fields at use time.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(AssetError::Incomplete("symbol cannot be empty".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(AssetError::Incomplete("name cannot be empty".to_string()).into());
        }
        if self.current_price <= Decimal::ZERO {
            return Err(AssetError::InvalidPrice {
                symbol: self.symbol.clone(),
                details: format!("initial price must be positive, got {}", self.current_price),
            }
            .into());
        }
        if self.min_investment <= Decimal::ZERO {
            return Err(AssetError::Incomplete(format!(
                "{}: minimum investment must be positive",
                self.symbol
            ))
            .into());
        }
        if self.max_investment < self.min_investment {
            return Err(AssetError::Incomplete(format!(
                "{}: maximum investment is below the minimum",
                self.symbol
            ))
            .into());
        }
        if self.allowed_durations.is_empty() {
            return Err(AssetError::Incomplete(format!(
                "{}: at least one duration must be allowed",
                self.symbol
            ))
            .into());
        }
        for duration in &self.allowed_durations {
            if !self.return_rates.contains_key(duration) {
                return Err(AssetError::Incomplete(format!(
                    "{}: no return rate for allowed duration {}h",
                    self.symbol, duration
                ))
                .into());
            }
        }
        Ok(())
    }

    pub fn into_asset(self, now: DateTime<Utc>) -> Asset {
        Asset {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: self.symbol,
            name: self.name,
            category: self.category,
            current_price: self.current_price,
            previous_price: Decimal::ZERO,
            change_percentage: Decimal::ZERO,
            min_investment: self.min_investment,
            max_investment: self.max_investment,
            return_rates: self.return_rates,
            allowed_durations: self.allowed_durations,
            risk_level: self.risk_level,
            display_order: self.display_order,
            is_active: true,
            last_price_update: now,
            created_at: now,
            updated_at: now,
        }
    }
}
