//! Transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{errors::ValidationError, Error, Result};

/// Kind of ledger entry. `amount` always stores a positive magnitude;
/// direction is carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
    TransferIn,
    TransferOut,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::TransferOut => "TRANSFER_OUT",
        }
    }

    /// Sign of the balance effect on the wallet the entry targets.
    pub fn sign(&self) -> Decimal {
        match self {
            TransactionType::Income | TransactionType::TransferIn => Decimal::ONE,
            TransactionType::Expense | TransactionType::TransferOut => Decimal::NEGATIVE_ONE,
        }
    }

    pub fn is_transfer_leg(&self) -> bool {
        matches!(
            self,
            TransactionType::TransferIn | TransactionType::TransferOut
        )
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "TRANSFER_IN" => Ok(TransactionType::TransferIn),
            "TRANSFER_OUT" => Ok(TransactionType::TransferOut),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction type: {}",
                other
            )))),
        }
    }
}

/// Domain model representing a committed ledger entry.
///
/// `wallet_id` is the wallet whose balance this row affected. Transfer legs
/// additionally carry both endpoint wallets and a shared
/// `transfer_group_id` linking the out/in pair. The conversion audit fields
/// are `None` unless a currency conversion occurred.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub owner_id: String,
    pub wallet_id: String,
    pub origin_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub transfer_group_id: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    pub recurrence_id: Option<String>,
    pub goal_id: Option<String>,
    pub notes: Option<String>,
    pub exchange_rate: Option<Decimal>,
    pub original_amount: Option<Decimal>,
    pub original_currency: Option<String>,
    pub converted_amount: Option<Decimal>,
    pub destination_currency: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// The signed effect this row had on its wallet's balance.
    pub fn signed_effect(&self) -> Decimal {
        self.transaction_type.sign() * self.amount
    }
}

/// Input model for inserting a transaction row.
///
/// Only the ledger mutation protocol constructs these; the `id` is
/// pre-generated there so compensations can reference the row before the
/// insert commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub owner_id: String,
    pub wallet_id: String,
    pub origin_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub transfer_group_id: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    pub recurrence_id: Option<String>,
    pub goal_id: Option<String>,
    pub notes: Option<String>,
    pub exchange_rate: Option<Decimal>,
    pub original_amount: Option<Decimal>,
    pub original_currency: Option<String>,
    pub converted_amount: Option<Decimal>,
    pub destination_currency: Option<String>,
}

impl NewTransaction {
    /// Validates the row before it reaches the store.
    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "ownerId".to_string(),
            )));
        }
        if self.wallet_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "walletId".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Transaction amount must be positive, got {}",
                self.amount
            ))));
        }
        if self.transaction_type.is_transfer_leg()
            && (self.origin_wallet_id.is_none()
                || self.destination_wallet_id.is_none()
                || self.transfer_group_id.is_none())
        {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Transfer legs require origin, destination, and transfer group".to_string(),
            )));
        }
        Ok(())
    }
}

impl From<Transaction> for NewTransaction {
    /// Re-insertable copy of a committed row, keeping its id. Used by the
    /// delete path's compensation.
    fn from(tx: Transaction) -> Self {
        NewTransaction {
            id: Some(tx.id),
            owner_id: tx.owner_id,
            wallet_id: tx.wallet_id,
            origin_wallet_id: tx.origin_wallet_id,
            destination_wallet_id: tx.destination_wallet_id,
            transfer_group_id: tx.transfer_group_id,
            transaction_type: tx.transaction_type,
            amount: tx.amount,
            currency: tx.currency,
            transaction_date: tx.transaction_date,
            category_id: tx.category_id,
            recurrence_id: tx.recurrence_id,
            goal_id: tx.goal_id,
            notes: tx.notes,
            exchange_rate: tx.exchange_rate,
            original_amount: tx.original_amount,
            original_currency: tx.original_currency,
            converted_amount: tx.converted_amount,
            destination_currency: tx.destination_currency,
        }
    }
}

/// Filter for transaction search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub owner_id: String,
    pub wallet_ids: Option<Vec<String>>,
    pub transaction_types: Option<Vec<TransactionType>>,
    pub category_id: Option<String>,
    pub recurrence_id: Option<String>,
    pub goal_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        TransactionFilter {
            owner_id: owner_id.into(),
            ..Default::default()
        }
    }
}
