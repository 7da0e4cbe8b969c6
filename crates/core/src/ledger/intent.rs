//! Ledger mutation intents.
//!
//! A closed tagged union replaces free-form transaction payloads: each
//! variant carries only the fields its flow needs and is validated
//! exhaustively before dispatch.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger_errors::LedgerError;
use crate::transactions::TransactionType;
use crate::Result;

/// Direction of a simple (single-wallet) ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            EntryType::Income => TransactionType::Income,
            EntryType::Expense => TransactionType::Expense,
        }
    }
}

/// Income or expense against one wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleEntryIntent {
    pub owner_id: String,
    pub wallet_id: String,
    pub entry_type: EntryType,
    /// Positive magnitude in `currency` (the wallet currency when `None`).
    pub amount: Decimal,
    pub currency: Option<String>,
    pub date: NaiveDate,
    pub category_id: Option<String>,
    /// Back-reference set when a recurrence materialized this entry.
    pub recurrence_id: Option<String>,
    pub notes: Option<String>,
}

/// Movement between two wallets of the same owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferIntent {
    pub owner_id: String,
    pub origin_wallet_id: String,
    pub destination_wallet_id: String,
    /// Positive magnitude in the origin wallet's currency.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<String>,
    /// Back-reference set when a recurrence materialized this transfer;
    /// both legs carry it.
    pub recurrence_id: Option<String>,
    pub notes: Option<String>,
}

/// Contribution to a savings goal, paid from a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTopUpIntent {
    pub owner_id: String,
    pub goal_id: String,
    pub wallet_id: String,
    /// Positive magnitude in the goal's currency.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// A ledger mutation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Intent {
    SimpleEntry(SimpleEntryIntent),
    Transfer(TransferIntent),
    GoalTopUp(GoalTopUpIntent),
}

impl Intent {
    pub fn owner_id(&self) -> &str {
        match self {
            Intent::SimpleEntry(i) => &i.owner_id,
            Intent::Transfer(i) => &i.owner_id,
            Intent::GoalTopUp(i) => &i.owner_id,
        }
    }

    /// Structural validation, performed before any read or write.
    pub fn validate(&self) -> Result<()> {
        let amount = match self {
            Intent::SimpleEntry(i) => i.amount,
            Intent::Transfer(i) => i.amount,
            Intent::GoalTopUp(i) => i.amount,
        };
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "amount must be positive, got {}",
                amount
            ))
            .into());
        }
        if let Intent::Transfer(i) = self {
            if i.origin_wallet_id == i.destination_wallet_id {
                return Err(LedgerError::InvalidTransfer(
                    "origin and destination wallets must differ".to_string(),
                )
                .into());
            }
        }
        Ok(())
    }
}
