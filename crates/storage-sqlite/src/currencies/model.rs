//! Database model for currencies.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use primevest_core::fx::Currency;
use primevest_core::Result;

use crate::utils::parse_decimal;

/// Database model for currencies
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: String,
    pub is_active: bool,
    #[diesel(skip_insertion)]
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CurrencyDB {
    pub fn into_domain(self) -> Result<Currency> {
        Ok(Currency {
            exchange_rate: parse_decimal(&self.exchange_rate, "currencies.exchange_rate")?,
            code: self.code,
            name: self.name,
            symbol: self.symbol,
            is_active: self.is_active,
        })
    }
}

impl From<Currency> for CurrencyDB {
    fn from(domain: Currency) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            code: domain.code,
            name: domain.name,
            symbol: domain.symbol,
            exchange_rate: domain.exchange_rate.to_string(),
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
