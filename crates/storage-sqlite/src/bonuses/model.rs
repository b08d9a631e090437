//! Database model for bonuses.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use primevest_core::bonuses::{Bonus, BonusType};
use primevest_core::errors::Result;

use crate::utils::{corrupt_column, parse_decimal, to_naive, to_utc};

/// Database model for bonuses
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::bonuses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BonusDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub amount: String,
    pub bonus_type: String,
    pub is_claimed: bool,
    pub expires_at: Option<NaiveDateTime>,
    pub claimed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BonusDB {
    pub fn into_domain(self) -> Result<Bonus> {
        let bonus_type = BonusType::from_str(&self.bonus_type)
            .ok_or_else(|| corrupt_column("bonuses.bonus_type", &self.bonus_type))?;

        Ok(Bonus {
            amount: parse_decimal(&self.amount, "bonuses.amount")?,
            bonus_type,
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            is_claimed: self.is_claimed,
            expires_at: self.expires_at.map(to_utc),
            claimed_at: self.claimed_at.map(to_utc),
            created_at: to_utc(self.created_at),
        })
    }
}

impl From<&Bonus> for BonusDB {
    fn from(domain: &Bonus) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            title: domain.title.clone(),
            description: domain.description.clone(),
            amount: domain.amount.to_string(),
            bonus_type: domain.bonus_type.as_str().to_string(),
            is_claimed: domain.is_claimed,
            expires_at: domain.expires_at.map(to_naive),
            claimed_at: domain.claimed_at.map(to_naive),
            created_at: to_naive(domain.created_at),
            updated_at: to_naive(domain.created_at),
        }
    }
}
