//! Database model for catalog assets.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use primevest_core::assets::{Asset, AssetCategory, RiskLevel};
use primevest_core::errors::{DatabaseError, Error, Result};

use crate::utils::{corrupt_column, parse_decimal, to_naive, to_utc};

/// Database model for assets. The return-rate table and allowed durations
/// are stored as JSON TEXT columns.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub category: String,
    pub current_price: String,
    pub previous_price: String,
    pub change_percentage: String,
    pub min_investment: String,
    pub max_investment: String,
    pub return_rates: String,
    pub allowed_durations: String,
    pub risk_level: String,
    pub display_order: i32,
    pub is_active: bool,
    pub last_price_update: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn corrupt_json(column: &str, err: serde_json::Error) -> Error {
    Error::Database(DatabaseError::Internal(format!(
        "corrupt JSON in column {}: {}",
        column, err
    )))
}

impl AssetDB {
    pub fn into_domain(self) -> Result<Asset> {
        let category = AssetCategory::from_str(&self.category)
            .ok_or_else(|| corrupt_column("assets.category", &self.category))?;
        let risk_level = RiskLevel::from_str(&self.risk_level)
            .ok_or_else(|| corrupt_column("assets.risk_level", &self.risk_level))?;
        let return_rates: BTreeMap<u32, Decimal> = serde_json::from_str(&self.return_rates)
            .map_err(|e| corrupt_json("assets.return_rates", e))?;
        let allowed_durations: Vec<u32> = serde_json::from_str(&self.allowed_durations)
            .map_err(|e| corrupt_json("assets.allowed_durations", e))?;

        Ok(Asset {
            current_price: parse_decimal(&self.current_price, "assets.current_price")?,
            previous_price: parse_decimal(&self.previous_price, "assets.previous_price")?,
            change_percentage: parse_decimal(&self.change_percentage, "assets.change_percentage")?,
            min_investment: parse_decimal(&self.min_investment, "assets.min_investment")?,
            max_investment: parse_decimal(&self.max_investment, "assets.max_investment")?,
            category,
            risk_level,
            return_rates,
            allowed_durations,
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            display_order: self.display_order,
            is_active: self.is_active,
            last_price_update: to_utc(self.last_price_update),
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }

    pub fn try_from_domain(domain: &Asset) -> Result<Self> {
        Ok(Self {
            id: domain.id.clone(),
            symbol: domain.symbol.clone(),
            name: domain.name.clone(),
            category: domain.category.as_str().to_string(),
            current_price: domain.current_price.to_string(),
            previous_price: domain.previous_price.to_string(),
            change_percentage: domain.change_percentage.to_string(),
            min_investment: domain.min_investment.to_string(),
            max_investment: domain.max_investment.to_string(),
            return_rates: serde_json::to_string(&domain.return_rates)?,
            allowed_durations: serde_json::to_string(&domain.allowed_durations)?,
            risk_level: domain.risk_level.as_str().to_string(),
            display_order: domain.display_order,
            is_active: domain.is_active,
            last_price_update: to_naive(domain.last_price_update),
            created_at: to_naive(domain.created_at),
            updated_at: to_naive(domain.updated_at),
        })
    }
}
