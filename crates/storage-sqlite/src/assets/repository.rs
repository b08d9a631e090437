//! SQLite repository for the asset catalog.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

use primevest_core::assets::{Asset, AssetRepositoryTrait, PriceUpdate};
use primevest_core::errors::{DatabaseError, Error, Result};

use super::model::AssetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::assets;

/// Repository for managing asset data in the database.
pub struct AssetRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl AssetRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AssetRepositoryTrait for AssetRepository {
    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        assets::table
            .find(asset_id)
            .first::<AssetDB>(&mut conn)
            .map_err(|e| match e {
                DieselError::NotFound => Error::Database(DatabaseError::NotFound(format!(
                    "Asset with id {} not found",
                    asset_id
                ))),
                e => StorageError::from(e).into(),
            })?
            .into_domain()
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        assets::table
            .filter(assets::symbol.eq(symbol))
            .first::<AssetDB>(&mut conn)
            .map_err(|e| match e {
                DieselError::NotFound => Error::Database(DatabaseError::NotFound(format!(
                    "Asset with symbol {} not found",
                    symbol
                ))),
                e => StorageError::from(e).into(),
            })?
            .into_domain()
    }

    fn list(&self, active_only: bool) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = assets::table.into_boxed();
        if active_only {
            query = query.filter(assets::is_active.eq(true));
        }

        let rows = query
            .order((assets::display_order.asc(), assets::symbol.asc()))
            .load::<AssetDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(AssetDB::into_domain).collect()
    }

    async fn insert(&self, asset: Asset) -> Result<Asset> {
        let row = AssetDB::try_from_domain(&asset)?;

        self.writer
            .exec(move |conn| {
                diesel::insert_into(assets::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(asset)
            })
            .await
    }

    async fn update_price(&self, asset_id: &str, update: PriceUpdate) -> Result<Asset> {
        let asset_id = asset_id.to_string();

        self.writer
            .exec(move |conn| {
                let affected = diesel::update(assets::table.find(&asset_id))
                    .set((
                        assets::current_price.eq(update.current_price.to_string()),
                        assets::previous_price.eq(update.previous_price.to_string()),
                        assets::change_percentage.eq(update.change_percentage.to_string()),
                        assets::last_price_update.eq(update.last_price_update.naive_utc()),
                        assets::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Asset with id {} not found",
                        asset_id
                    ))));
                }

                assets::table
                    .find(&asset_id)
                    .first::<AssetDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }
}
