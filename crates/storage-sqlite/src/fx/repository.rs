use async_trait::async_trait;
use diesel::prelude::*;

use super::model::ExchangeRateDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::exchange_rates;
use moneta_core::fx::{ExchangeRate, FxRepositoryTrait};
use moneta_core::Result;

/// Repository for stored exchange rates.
pub struct FxRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl FxRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRepository {
    fn get_latest_rate(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>> {
        self.get_latest_rate_by_symbol(&ExchangeRate::make_fx_symbol(from, to))
    }

    fn get_latest_rate_by_symbol(&self, symbol: &str) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let rate_db = exchange_rates::table
            .find(symbol)
            .select(ExchangeRateDB::as_select())
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .into_core()?;
        rate_db.map(ExchangeRate::try_from).transpose()
    }

    fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let results = exchange_rates::table
            .select(ExchangeRateDB::as_select())
            .order(exchange_rates::id.asc())
            .load::<ExchangeRateDB>(&mut conn)
            .into_core()?;
        results.into_iter().map(ExchangeRate::try_from).collect()
    }

    async fn upsert_rate(&self, rate: ExchangeRate) -> Result<ExchangeRate> {
        self.writer
            .exec(move |conn| {
                let rate_db = ExchangeRateDB::from(rate);
                diesel::insert_into(exchange_rates::table)
                    .values(&rate_db)
                    .on_conflict(exchange_rates::id)
                    .do_update()
                    .set(&rate_db)
                    .execute(conn)
                    .into_core()?;
                ExchangeRate::try_from(rate_db)
            })
            .await
    }

    async fn delete_rate(&self, rate_id: &str) -> Result<()> {
        let rate_id = rate_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(exchange_rates::table.find(&rate_id))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
