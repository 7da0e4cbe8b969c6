//! Database models for recurrences.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use std::str::FromStr;

use crate::utils::{decimal_to_text, now, parse_decimal};
use moneta_core::recurrences::{Frequency, NewRecurrence, Recurrence, RecurrenceKind};
use moneta_core::Error;

/// Database model for recurrences.
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::recurrences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct RecurrenceDB {
    pub id: String,
    pub owner_id: String,
    pub wallet_id: String,
    pub destination_wallet_id: Option<String>,
    pub kind: String,
    pub amount: String,
    pub category_id: Option<String>,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RecurrenceDB {
    pub fn from_new(new_recurrence: NewRecurrence, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            owner_id: new_recurrence.owner_id,
            wallet_id: new_recurrence.wallet_id,
            destination_wallet_id: new_recurrence.destination_wallet_id,
            kind: new_recurrence.kind.as_str().to_string(),
            amount: decimal_to_text(new_recurrence.amount),
            category_id: new_recurrence.category_id,
            frequency: new_recurrence.frequency.as_str().to_string(),
            start_date: new_recurrence.start_date,
            end_date: new_recurrence.end_date,
            is_active: true,
            notes: new_recurrence.notes,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl TryFrom<RecurrenceDB> for Recurrence {
    type Error = Error;

    fn try_from(db: RecurrenceDB) -> Result<Self, Error> {
        Ok(Recurrence {
            kind: RecurrenceKind::from_str(&db.kind)?,
            frequency: Frequency::from_str(&db.frequency)?,
            amount: parse_decimal(&db.amount)?,
            id: db.id,
            owner_id: db.owner_id,
            wallet_id: db.wallet_id,
            destination_wallet_id: db.destination_wallet_id,
            category_id: db.category_id,
            start_date: db.start_date,
            end_date: db.end_date,
            is_active: db.is_active,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
