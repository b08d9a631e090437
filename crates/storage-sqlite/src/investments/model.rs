//! Database model for investments.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use primevest_core::errors::{DatabaseError, Error, Result};
use primevest_core::investments::{Investment, InvestmentStatus, SettlementReason};

use crate::utils::{corrupt_column, parse_decimal, to_naive, to_utc};

/// Database model for investments
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentDB {
    pub id: String,
    pub user_id: String,
    pub asset_id: String,
    pub invested_amount: String,
    pub entry_price: String,
    pub duration_hours: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: String,
    pub expected_return_rate: String,
    pub profit_loss: String,
    pub settlement_reason: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl InvestmentDB {
    pub fn into_domain(self) -> Result<Investment> {
        let status = InvestmentStatus::from_str(&self.status)
            .ok_or_else(|| corrupt_column("investments.status", &self.status))?;
        let settlement_reason = self
            .settlement_reason
            .as_deref()
            .map(|reason| {
                SettlementReason::from_str(reason)
                    .ok_or_else(|| corrupt_column("investments.settlement_reason", reason))
            })
            .transpose()?;
        let duration_hours = u32::try_from(self.duration_hours).map_err(|_| {
            Error::Database(DatabaseError::Internal(format!(
                "corrupt value in column investments.duration_hours: '{}'",
                self.duration_hours
            )))
        })?;

        Ok(Investment {
            invested_amount: parse_decimal(&self.invested_amount, "investments.invested_amount")?,
            entry_price: parse_decimal(&self.entry_price, "investments.entry_price")?,
            expected_return_rate: parse_decimal(
                &self.expected_return_rate,
                "investments.expected_return_rate",
            )?,
            profit_loss: parse_decimal(&self.profit_loss, "investments.profit_loss")?,
            status,
            settlement_reason,
            duration_hours,
            id: self.id,
            user_id: self.user_id,
            asset_id: self.asset_id,
            start_time: to_utc(self.start_time),
            end_time: to_utc(self.end_time),
            completed_at: self.completed_at.map(to_utc),
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

impl From<&Investment> for InvestmentDB {
    fn from(domain: &Investment) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            asset_id: domain.asset_id.clone(),
            invested_amount: domain.invested_amount.to_string(),
            entry_price: domain.entry_price.to_string(),
            duration_hours: domain.duration_hours as i32,
            start_time: to_naive(domain.start_time),
            end_time: to_naive(domain.end_time),
            status: domain.status.as_str().to_string(),
            expected_return_rate: domain.expected_return_rate.to_string(),
            profit_loss: domain.profit_loss.to_string(),
            settlement_reason: domain.settlement_reason.map(|r| r.as_str().to_string()),
            completed_at: domain.completed_at.map(to_naive),
            created_at: to_naive(domain.created_at),
            updated_at: to_naive(domain.updated_at),
        }
    }
}
