use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::model::GoalDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::goals;
use crate::utils::{decimal_to_text, now};
use moneta_core::goals::{Goal, GoalRepositoryTrait, GoalUpdate, NewGoal};
use moneta_core::Result;

/// Repository for managing goal data in the database.
pub struct GoalRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_by_id(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        let goal_db = goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .into_core()?;
        Goal::try_from(goal_db)
    }

    fn list(&self, owner_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let results = goals::table
            .filter(goals::owner_id.eq(owner_id))
            .select(GoalDB::as_select())
            .order(goals::name.asc())
            .load::<GoalDB>(&mut conn)
            .into_core()?;
        results.into_iter().map(Goal::try_from).collect()
    }

    async fn create(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        let id = new_goal
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.writer
            .exec(move |conn| {
                let goal_db = GoalDB::from_new(new_goal, id);
                diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .execute(conn)
                    .into_core()?;
                Goal::try_from(goal_db)
            })
            .await
    }

    async fn update(&self, goal_update: GoalUpdate) -> Result<Goal> {
        goal_update.validate()?;

        self.writer
            .exec(move |conn| {
                diesel::update(goals::table.find(&goal_update.id))
                    .set((
                        goals::name.eq(&goal_update.name),
                        goals::amount_goal.eq(decimal_to_text(goal_update.amount_goal)),
                        goals::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;
                let goal_db = goals::table
                    .find(&goal_update.id)
                    .select(GoalDB::as_select())
                    .first::<GoalDB>(conn)
                    .into_core()?;
                Goal::try_from(goal_db)
            })
            .await
    }

    async fn set_amount_saved(&self, goal_id: &str, amount_saved: Decimal) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(goals::table.find(&goal_id))
                    .set((
                        goals::amount_saved.eq(decimal_to_text(amount_saved)),
                        goals::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;
                let goal_db = goals::table
                    .find(&goal_id)
                    .select(GoalDB::as_select())
                    .first::<GoalDB>(conn)
                    .into_core()?;
                Goal::try_from(goal_db)
            })
            .await
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(goals::table.find(&goal_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
