//! Database models for exchange rates.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::utils::{decimal_to_text, parse_decimal};
use moneta_core::fx::ExchangeRate;
use moneta_core::Error;

/// Database model for exchange rates, one row per currency pair.
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: String,
    pub timestamp: NaiveDateTime,
}

impl From<ExchangeRate> for ExchangeRateDB {
    fn from(rate: ExchangeRate) -> Self {
        Self {
            id: rate.id,
            from_currency: rate.from_currency,
            to_currency: rate.to_currency,
            rate: decimal_to_text(rate.rate),
            timestamp: rate.timestamp.naive_utc(),
        }
    }
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = Error;

    fn try_from(db: ExchangeRateDB) -> Result<Self, Error> {
        Ok(ExchangeRate {
            rate: parse_decimal(&db.rate)?,
            id: db.id,
            from_currency: db.from_currency,
            to_currency: db.to_currency,
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(db.timestamp, Utc),
        })
    }
}
