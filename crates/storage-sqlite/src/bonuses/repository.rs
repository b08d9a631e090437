//! SQLite repository for bonuses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use rust_decimal::Decimal;

use primevest_core::bonuses::{Bonus, BonusRepositoryTrait};
use primevest_core::errors::{DatabaseError, Error, Result};

use super::model::BonusDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::bonuses;

/// Repository for managing bonus data in the database.
pub struct BonusRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl BonusRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn not_found(bonus_id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!(
        "Bonus with id {} not found",
        bonus_id
    )))
}

#[async_trait]
impl BonusRepositoryTrait for BonusRepository {
    async fn insert(&self, bonus: Bonus) -> Result<Bonus> {
        let row = BonusDB::from(&bonus);

        self.writer
            .exec(move |conn| {
                diesel::insert_into(bonuses::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(bonus)
            })
            .await
    }

    fn get_by_id(&self, bonus_id: &str) -> Result<Bonus> {
        let mut conn = get_connection(&self.pool)?;

        bonuses::table
            .find(bonus_id)
            .first::<BonusDB>(&mut conn)
            .map_err(|e| match e {
                DieselError::NotFound => not_found(bonus_id),
                e => StorageError::from(e).into(),
            })?
            .into_domain()
    }

    fn list_unclaimed(&self, user_id: &str) -> Result<Vec<Bonus>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = bonuses::table
            .filter(bonuses::user_id.eq(user_id))
            .filter(bonuses::is_claimed.eq(false))
            .order(bonuses::created_at.desc())
            .load::<BonusDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(BonusDB::into_domain).collect()
    }

    fn total_claimed(&self, user_id: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;

        let rows = bonuses::table
            .filter(bonuses::user_id.eq(user_id))
            .filter(bonuses::is_claimed.eq(true))
            .load::<BonusDB>(&mut conn)
            .into_core()?;

        let mut total = Decimal::ZERO;
        for row in rows {
            total += row.into_domain()?.amount;
        }
        Ok(total)
    }

    async fn claim(
        &self,
        bonus_id: &str,
        user_id: &str,
        claimed_at: DateTime<Utc>,
    ) -> Result<Option<Bonus>> {
        let bonus_id = bonus_id.to_string();
        let user_id = user_id.to_string();

        self.writer
            .exec(move |conn| {
                let claimed = diesel::update(
                    bonuses::table
                        .find(&bonus_id)
                        .filter(bonuses::user_id.eq(&user_id))
                        .filter(bonuses::is_claimed.eq(false)),
                )
                .set((
                    bonuses::is_claimed.eq(true),
                    bonuses::claimed_at.eq(claimed_at.naive_utc()),
                    bonuses::updated_at.eq(claimed_at.naive_utc()),
                ))
                .execute(conn)
                .into_core()?;

                if claimed == 0 {
                    return Ok(None);
                }

                bonuses::table
                    .find(&bonus_id)
                    .first::<BonusDB>(conn)
                    .into_core()?
                    .into_domain()
                    .map(Some)
            })
            .await
    }

    async fn release_claim(&self, bonus_id: &str) -> Result<()> {
        let bonus_id = bonus_id.to_string();

        self.writer
            .exec(move |conn| {
                let released = diesel::update(
                    bonuses::table
                        .find(&bonus_id)
                        .filter(bonuses::is_claimed.eq(true)),
                )
                .set((
                    bonuses::is_claimed.eq(false),
                    bonuses::claimed_at.eq(None::<chrono::NaiveDateTime>),
                    bonuses::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;

                if released == 0 {
                    return Err(not_found(&bonus_id));
                }
                Ok(())
            })
            .await
    }
}
