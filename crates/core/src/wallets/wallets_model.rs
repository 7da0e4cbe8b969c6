//! Wallet domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a wallet in the system.
///
/// `balance` is the denormalized running balance maintained by the ledger
/// store's `adjust_balance` primitive; when it has never been adjusted it
/// is `None` and falls back to `initial_balance`. Business logic never
/// writes it directly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// ISO 4217 currency code, immutable after creation.
    pub currency: String,
    pub balance: Option<Decimal>,
    pub initial_balance: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Wallet {
    /// The effective balance: the adjusted balance when present, the
    /// initial balance otherwise.
    pub fn current_balance(&self) -> Decimal {
        self.balance.unwrap_or(self.initial_balance)
    }

    /// Ensures the wallet belongs to `owner_id`.
    pub fn ensure_owned_by(&self, owner_id: &str) -> Result<()> {
        if self.owner_id != owner_id {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Wallet '{}' is not owned by the caller",
                self.id
            ))));
        }
        Ok(())
    }
}

/// Input model for creating a new wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub currency: String,
    pub initial_balance: Decimal,
}

impl NewWallet {
    /// Validates the new wallet data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Wallet name cannot be empty".to_string(),
            )));
        }
        validate_currency_code(&self.currency)?;
        Ok(())
    }
}

/// Input model for updating an existing wallet.
///
/// Currency and balances are deliberately absent: currency is immutable and
/// balances only move through `adjust_balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    pub id: String,
    pub name: String,
}

impl WalletUpdate {
    /// Validates the wallet update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Wallet ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Wallet name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Validates a three-letter ISO 4217 currency code.
pub fn validate_currency_code(code: &str) -> Result<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid currency code: {}",
            code
        ))));
    }
    Ok(())
}
