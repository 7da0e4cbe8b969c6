//! Database models for ledger transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use std::str::FromStr;

use crate::utils::{decimal_to_text, now, optional_decimal_to_text, parse_decimal, parse_optional_decimal};
use moneta_core::transactions::{NewTransaction, Transaction, TransactionType};
use moneta_core::Error;

/// Database model for transactions. Decimal amounts are stored as TEXT.
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub owner_id: String,
    pub wallet_id: String,
    pub origin_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub transfer_group_id: Option<String>,
    pub transaction_type: String,
    pub amount: String,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    pub recurrence_id: Option<String>,
    pub goal_id: Option<String>,
    pub notes: Option<String>,
    pub exchange_rate: Option<String>,
    pub original_amount: Option<String>,
    pub original_currency: Option<String>,
    pub converted_amount: Option<String>,
    pub destination_currency: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    /// Builds the row for a freshly inserted transaction.
    pub fn from_new(new_transaction: NewTransaction, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            owner_id: new_transaction.owner_id,
            wallet_id: new_transaction.wallet_id,
            origin_wallet_id: new_transaction.origin_wallet_id,
            destination_wallet_id: new_transaction.destination_wallet_id,
            transfer_group_id: new_transaction.transfer_group_id,
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            amount: decimal_to_text(new_transaction.amount),
            currency: new_transaction.currency,
            transaction_date: new_transaction.transaction_date,
            category_id: new_transaction.category_id,
            recurrence_id: new_transaction.recurrence_id,
            goal_id: new_transaction.goal_id,
            notes: new_transaction.notes,
            exchange_rate: optional_decimal_to_text(new_transaction.exchange_rate),
            original_amount: optional_decimal_to_text(new_transaction.original_amount),
            original_currency: new_transaction.original_currency,
            converted_amount: optional_decimal_to_text(new_transaction.converted_amount),
            destination_currency: new_transaction.destination_currency,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Re-encodes a committed transaction, bumping `updated_at`. Used by
    /// the ledger's update path.
    pub fn from_domain(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            owner_id: transaction.owner_id.clone(),
            wallet_id: transaction.wallet_id.clone(),
            origin_wallet_id: transaction.origin_wallet_id.clone(),
            destination_wallet_id: transaction.destination_wallet_id.clone(),
            transfer_group_id: transaction.transfer_group_id.clone(),
            transaction_type: transaction.transaction_type.as_str().to_string(),
            amount: decimal_to_text(transaction.amount),
            currency: transaction.currency.clone(),
            transaction_date: transaction.transaction_date,
            category_id: transaction.category_id.clone(),
            recurrence_id: transaction.recurrence_id.clone(),
            goal_id: transaction.goal_id.clone(),
            notes: transaction.notes.clone(),
            exchange_rate: optional_decimal_to_text(transaction.exchange_rate),
            original_amount: optional_decimal_to_text(transaction.original_amount),
            original_currency: transaction.original_currency.clone(),
            converted_amount: optional_decimal_to_text(transaction.converted_amount),
            destination_currency: transaction.destination_currency.clone(),
            created_at: transaction.created_at,
            updated_at: now(),
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self, Error> {
        Ok(Transaction {
            transaction_type: TransactionType::from_str(&db.transaction_type)?,
            amount: parse_decimal(&db.amount)?,
            exchange_rate: parse_optional_decimal(db.exchange_rate.as_deref())?,
            original_amount: parse_optional_decimal(db.original_amount.as_deref())?,
            converted_amount: parse_optional_decimal(db.converted_amount.as_deref())?,
            id: db.id,
            owner_id: db.owner_id,
            wallet_id: db.wallet_id,
            origin_wallet_id: db.origin_wallet_id,
            destination_wallet_id: db.destination_wallet_id,
            transfer_group_id: db.transfer_group_id,
            currency: db.currency,
            transaction_date: db.transaction_date,
            category_id: db.category_id,
            recurrence_id: db.recurrence_id,
            goal_id: db.goal_id,
            notes: db.notes,
            original_currency: db.original_currency,
            destination_currency: db.destination_currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
