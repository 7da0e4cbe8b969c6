//! Database models for wallets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{decimal_to_text, now, parse_decimal, parse_optional_decimal};
use moneta_core::wallets::{NewWallet, Wallet};
use moneta_core::Error;

/// Database model for wallets.
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct WalletDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub currency: String,
    pub balance: Option<String>,
    pub initial_balance: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WalletDB {
    /// Builds the row for a new wallet. The running balance starts unset
    /// and falls back to the initial balance until first adjusted.
    pub fn from_new(new_wallet: NewWallet, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            owner_id: new_wallet.owner_id,
            name: new_wallet.name,
            currency: new_wallet.currency.to_uppercase(),
            balance: None,
            initial_balance: decimal_to_text(new_wallet.initial_balance),
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl TryFrom<WalletDB> for Wallet {
    type Error = Error;

    fn try_from(db: WalletDB) -> Result<Self, Error> {
        Ok(Wallet {
            balance: parse_optional_decimal(db.balance.as_deref())?,
            initial_balance: parse_decimal(&db.initial_balance)?,
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            currency: db.currency,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
