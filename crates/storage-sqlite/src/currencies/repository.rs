//! SQLite repository for the currency registry.

use async_trait::async_trait;
use diesel::prelude::*;

use primevest_core::errors::Result;
use primevest_core::fx::{Currency, CurrencyRepositoryTrait};

use super::model::CurrencyDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::currencies;

/// Repository for managing currency data in the database.
pub struct CurrencyRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl CurrencyRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for CurrencyRepository {
    fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        let row = currencies::table
            .find(code)
            .first::<CurrencyDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(CurrencyDB::into_domain).transpose()
    }

    fn list_active(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = currencies::table
            .filter(currencies::is_active.eq(true))
            .order(currencies::code.asc())
            .load::<CurrencyDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(CurrencyDB::into_domain).collect()
    }

    async fn upsert(&self, currency: Currency) -> Result<Currency> {
        let row = CurrencyDB::from(currency);

        self.writer
            .exec(move |conn| {
                diesel::insert_into(currencies::table)
                    .values(&row)
                    .on_conflict(currencies::code)
                    .do_update()
                    .set((
                        currencies::name.eq(&row.name),
                        currencies::symbol.eq(&row.symbol),
                        currencies::exchange_rate.eq(&row.exchange_rate),
                        currencies::is_active.eq(row.is_active),
                        currencies::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;

                currencies::table
                    .find(&row.code)
                    .first::<CurrencyDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }
}
