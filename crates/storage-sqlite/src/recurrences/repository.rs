use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::RecurrenceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::recurrences;
use crate::utils::{decimal_to_text, now};
use moneta_core::recurrences::{
    NewRecurrence, Recurrence, RecurrenceRepositoryTrait, RecurrenceUpdate,
};
use moneta_core::Result;

/// Repository for managing recurrence templates in the database.
pub struct RecurrenceRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl RecurrenceRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RecurrenceRepositoryTrait for RecurrenceRepository {
    fn get_by_id(&self, recurrence_id: &str) -> Result<Recurrence> {
        let mut conn = get_connection(&self.pool)?;
        let recurrence_db = recurrences::table
            .find(recurrence_id)
            .select(RecurrenceDB::as_select())
            .first::<RecurrenceDB>(&mut conn)
            .into_core()?;
        Recurrence::try_from(recurrence_db)
    }

    fn list(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Recurrence>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = recurrences::table
            .filter(recurrences::owner_id.eq(owner_id))
            .into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(recurrences::is_active.eq(active));
        }

        let results = query
            .select(RecurrenceDB::as_select())
            .order(recurrences::start_date.asc())
            .load::<RecurrenceDB>(&mut conn)
            .into_core()?;
        results.into_iter().map(Recurrence::try_from).collect()
    }

    fn list_active(&self, owner_id: Option<&str>) -> Result<Vec<Recurrence>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = recurrences::table
            .filter(recurrences::is_active.eq(true))
            .into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(recurrences::owner_id.eq(owner_id.to_string()));
        }

        let results = query
            .select(RecurrenceDB::as_select())
            .order(recurrences::start_date.asc())
            .load::<RecurrenceDB>(&mut conn)
            .into_core()?;
        results.into_iter().map(Recurrence::try_from).collect()
    }

    async fn create(&self, new_recurrence: NewRecurrence) -> Result<Recurrence> {
        new_recurrence.validate()?;
        let id = new_recurrence
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.writer
            .exec(move |conn| {
                let recurrence_db = RecurrenceDB::from_new(new_recurrence, id);
                diesel::insert_into(recurrences::table)
                    .values(&recurrence_db)
                    .execute(conn)
                    .into_core()?;
                Recurrence::try_from(recurrence_db)
            })
            .await
    }

    async fn update(&self, recurrence_update: RecurrenceUpdate) -> Result<Recurrence> {
        recurrence_update.validate()?;

        self.writer
            .exec(move |conn| {
                diesel::update(recurrences::table.find(&recurrence_update.id))
                    .set((
                        recurrences::amount.eq(decimal_to_text(recurrence_update.amount)),
                        recurrences::category_id.eq(&recurrence_update.category_id),
                        recurrences::frequency.eq(recurrence_update.frequency.as_str()),
                        recurrences::start_date.eq(recurrence_update.start_date),
                        recurrences::end_date.eq(recurrence_update.end_date),
                        recurrences::notes.eq(&recurrence_update.notes),
                        recurrences::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;
                let recurrence_db = recurrences::table
                    .find(&recurrence_update.id)
                    .select(RecurrenceDB::as_select())
                    .first::<RecurrenceDB>(conn)
                    .into_core()?;
                Recurrence::try_from(recurrence_db)
            })
            .await
    }

    async fn set_active(&self, recurrence_id: &str, active: bool) -> Result<Recurrence> {
        let recurrence_id = recurrence_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(recurrences::table.find(&recurrence_id))
                    .set((
                        recurrences::is_active.eq(active),
                        recurrences::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;
                let recurrence_db = recurrences::table
                    .find(&recurrence_id)
                    .select(RecurrenceDB::as_select())
                    .first::<RecurrenceDB>(conn)
                    .into_core()?;
                Recurrence::try_from(recurrence_db)
            })
            .await
    }

    async fn delete(&self, recurrence_id: &str) -> Result<usize> {
        let recurrence_id = recurrence_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(recurrences::table.find(&recurrence_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
