//! Database models for goals.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{decimal_to_text, now, parse_decimal};
use moneta_core::goals::{Goal, NewGoal};
use moneta_core::Error;

/// Database model for goals.
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub currency: String,
    pub amount_goal: String,
    pub amount_saved: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl GoalDB {
    pub fn from_new(new_goal: NewGoal, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            owner_id: new_goal.owner_id,
            name: new_goal.name,
            currency: new_goal.currency.to_uppercase(),
            amount_goal: decimal_to_text(new_goal.amount_goal),
            amount_saved: decimal_to_text(rust_decimal::Decimal::ZERO),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl TryFrom<GoalDB> for Goal {
    type Error = Error;

    fn try_from(db: GoalDB) -> Result<Self, Error> {
        Ok(Goal {
            amount_goal: parse_decimal(&db.amount_goal)?,
            amount_saved: parse_decimal(&db.amount_saved)?,
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
