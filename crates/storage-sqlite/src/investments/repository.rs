//! SQLite repository for investments.
//!
//! Settlement claims are conditional single-row updates keyed on the current
//! status, so concurrent sweep workers can race on the same investment and
//! exactly one of them wins the claim.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use rust_decimal::Decimal;

use primevest_core::errors::{DatabaseError, Error, Result};
use primevest_core::investments::{
    Investment, InvestmentRepositoryTrait, InvestmentStatus, SettlementRecord,
};

use super::model::InvestmentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::investments;

/// Repository for managing investment data in the database.
pub struct InvestmentRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn not_found(investment_id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!(
        "Investment with id {} not found",
        investment_id
    )))
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    async fn insert(&self, investment: Investment) -> Result<Investment> {
        let row = InvestmentDB::from(&investment);

        self.writer
            .exec(move |conn| {
                diesel::insert_into(investments::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(investment)
            })
            .await
    }

    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        let mut conn = get_connection(&self.pool)?;

        investments::table
            .find(investment_id)
            .first::<InvestmentDB>(&mut conn)
            .map_err(|e| match e {
                DieselError::NotFound => not_found(investment_id),
                e => StorageError::from(e).into(),
            })?
            .into_domain()
    }

    fn list_by_user(
        &self,
        user_id: &str,
        status: Option<InvestmentStatus>,
    ) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = investments::table
            .filter(investments::user_id.eq(user_id))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(investments::status.eq(status.as_str()));
        }

        let rows = query
            .order(investments::created_at.desc())
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(InvestmentDB::into_domain).collect()
    }

    fn list_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = investments::table
            .filter(investments::status.eq(InvestmentStatus::Active.as_str()))
            .filter(investments::end_time.le(now.naive_utc()))
            .order(investments::end_time.asc())
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(InvestmentDB::into_domain).collect()
    }

    fn sum_open_invested(&self, user_id: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;

        // Amounts are TEXT decimals, so the sum happens here rather than in
        // SQL.
        let rows = investments::table
            .filter(investments::user_id.eq(user_id))
            .filter(investments::status.eq_any([
                InvestmentStatus::Active.as_str(),
                InvestmentStatus::Settling.as_str(),
            ]))
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;

        let mut total = Decimal::ZERO;
        for row in rows {
            total += row.into_domain()?.invested_amount;
        }
        Ok(total)
    }

    async fn claim_for_settlement(&self, investment_id: &str) -> Result<Option<Investment>> {
        let investment_id = investment_id.to_string();

        self.writer
            .exec(move |conn| {
                let claimed = diesel::update(
                    investments::table
                        .find(&investment_id)
                        .filter(investments::status.eq(InvestmentStatus::Active.as_str())),
                )
                .set((
                    investments::status.eq(InvestmentStatus::Settling.as_str()),
                    investments::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;

                if claimed == 0 {
                    return Ok(None);
                }

                investments::table
                    .find(&investment_id)
                    .first::<InvestmentDB>(conn)
                    .into_core()?
                    .into_domain()
                    .map(Some)
            })
            .await
    }

    async fn release_claim(&self, investment_id: &str) -> Result<()> {
        let investment_id = investment_id.to_string();

        self.writer
            .exec(move |conn| {
                let released = diesel::update(
                    investments::table
                        .find(&investment_id)
                        .filter(investments::status.eq(InvestmentStatus::Settling.as_str())),
                )
                .set((
                    investments::status.eq(InvestmentStatus::Active.as_str()),
                    investments::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;

                if released == 0 {
                    return Err(not_found(&investment_id));
                }
                Ok(())
            })
            .await
    }

    async fn mark_settled(
        &self,
        investment_id: &str,
        record: SettlementRecord,
    ) -> Result<Investment> {
        let investment_id = investment_id.to_string();

        self.writer
            .exec(move |conn| {
                let settled = diesel::update(
                    investments::table
                        .find(&investment_id)
                        .filter(investments::status.eq(InvestmentStatus::Settling.as_str())),
                )
                .set((
                    investments::status.eq(InvestmentStatus::Completed.as_str()),
                    investments::profit_loss.eq(record.profit_loss.to_string()),
                    investments::settlement_reason.eq(record.reason.as_str()),
                    investments::completed_at.eq(record.completed_at.naive_utc()),
                    investments::updated_at.eq(record.completed_at.naive_utc()),
                ))
                .execute(conn)
                .into_core()?;

                if settled == 0 {
                    return Err(not_found(&investment_id));
                }

                investments::table
                    .find(&investment_id)
                    .first::<InvestmentDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    async fn mark_cancelled(
        &self,
        investment_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<Investment> {
        let investment_id = investment_id.to_string();

        self.writer
            .exec(move |conn| {
                let cancelled = diesel::update(
                    investments::table
                        .find(&investment_id)
                        .filter(investments::status.eq(InvestmentStatus::Settling.as_str())),
                )
                .set((
                    investments::status.eq(InvestmentStatus::Cancelled.as_str()),
                    investments::completed_at.eq(completed_at.naive_utc()),
                    investments::updated_at.eq(completed_at.naive_utc()),
                ))
                .execute(conn)
                .into_core()?;

                if cancelled == 0 {
                    return Err(not_found(&investment_id));
                }

                investments::table
                    .find(&investment_id)
                    .first::<InvestmentDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }
}
