//! Recurrence domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::schedule::{self, Frequency, Occurrences};
use crate::ledger::{EntryType, Intent, SimpleEntryIntent, TransferIntent};
use crate::{errors::ValidationError, Error, Result};

/// What kind of transaction a recurrence materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceKind {
    Income,
    Expense,
    Transfer,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::Income => "INCOME",
            RecurrenceKind::Expense => "EXPENSE",
            RecurrenceKind::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INCOME" => Ok(RecurrenceKind::Income),
            "EXPENSE" => Ok(RecurrenceKind::Expense),
            "TRANSFER" => Ok(RecurrenceKind::Transfer),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown recurrence kind: {}",
                other
            )))),
        }
    }
}

/// Domain model representing a recurrence: a transaction template plus a
/// schedule. Each materialized transaction points back through
/// `recurrence_id`; the recurrence itself never touches wallet balance —
/// that is the materialized transactions' job, through the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub id: String,
    pub owner_id: String,
    pub wallet_id: String,
    /// Destination wallet, required for `Transfer` recurrences.
    pub destination_wallet_id: Option<String>,
    pub kind: RecurrenceKind,
    pub amount: Decimal,
    pub category_id: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    /// Open-ended when `None`.
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Recurrence {
    /// All occurrence dates of this schedule up to `horizon_end`.
    pub fn occurrences_until(&self, horizon_end: NaiveDate) -> Occurrences {
        schedule::occurrences(self.frequency, self.start_date, self.end_date, horizon_end)
    }

    /// The ledger intent this template materializes for one occurrence.
    pub fn to_intent(&self, date: NaiveDate) -> Intent {
        match self.kind {
            RecurrenceKind::Income | RecurrenceKind::Expense => {
                Intent::SimpleEntry(SimpleEntryIntent {
                    owner_id: self.owner_id.clone(),
                    wallet_id: self.wallet_id.clone(),
                    entry_type: match self.kind {
                        RecurrenceKind::Income => EntryType::Income,
                        _ => EntryType::Expense,
                    },
                    amount: self.amount,
                    currency: None,
                    date,
                    category_id: self.category_id.clone(),
                    recurrence_id: Some(self.id.clone()),
                    notes: self.notes.clone(),
                })
            }
            RecurrenceKind::Transfer => Intent::Transfer(TransferIntent {
                owner_id: self.owner_id.clone(),
                origin_wallet_id: self.wallet_id.clone(),
                destination_wallet_id: self
                    .destination_wallet_id
                    .clone()
                    .unwrap_or_default(),
                amount: self.amount,
                date,
                category_id: self.category_id.clone(),
                recurrence_id: Some(self.id.clone()),
                notes: self.notes.clone(),
            }),
        }
    }
}

/// Input model for creating a new recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurrence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub wallet_id: String,
    pub destination_wallet_id: Option<String>,
    pub kind: RecurrenceKind,
    pub amount: Decimal,
    pub category_id: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewRecurrence {
    /// Validates the new recurrence data.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Recurrence amount must be positive, got {}",
                self.amount
            ))));
        }
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Recurrence end date precedes its start date".to_string(),
                )));
            }
        }
        match self.kind {
            RecurrenceKind::Transfer => match &self.destination_wallet_id {
                None => {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "destinationWalletId".to_string(),
                    )))
                }
                Some(destination) if *destination == self.wallet_id => {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "Transfer recurrence wallets must differ".to_string(),
                    )))
                }
                Some(_) => {}
            },
            _ => {
                if self.destination_wallet_id.is_some() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "Only transfer recurrences take a destination wallet".to_string(),
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Input model for updating a recurrence template.
///
/// Changes affect future materializations only; already-generated
/// transactions keep their committed amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceUpdate {
    pub id: String,
    pub amount: Decimal,
    pub category_id: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl RecurrenceUpdate {
    /// Validates the recurrence update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Recurrence ID is required for updates".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Recurrence amount must be positive, got {}",
                self.amount
            ))));
        }
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Recurrence end date precedes its start date".to_string(),
                )));
            }
        }
        Ok(())
    }
}
