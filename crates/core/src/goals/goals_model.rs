//! Goals domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::wallets::validate_currency_code;
use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a savings goal.
///
/// `amount_saved` only moves through goal top-ups (and their deletion),
/// each backed by a committed wallet-deducting transaction, and is clamped
/// to `amount_goal`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub currency: String,
    pub amount_goal: Decimal,
    pub amount_saved: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    pub fn is_achieved(&self) -> bool {
        self.amount_saved >= self.amount_goal
    }
}

/// Input model for creating a new goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub currency: String,
    pub amount_goal: Decimal,
}

impl NewGoal {
    /// Validates the new goal data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal name cannot be empty".to_string(),
            )));
        }
        validate_currency_code(&self.currency)?;
        if self.amount_goal <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Goal amount must be positive, got {}",
                self.amount_goal
            ))));
        }
        Ok(())
    }
}

/// Input model for updating goal metadata.
///
/// `amount_saved` is deliberately absent: it only moves through top-ups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub id: String,
    pub name: String,
    pub amount_goal: Decimal,
}

impl GoalUpdate {
    /// Validates the goal update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal name cannot be empty".to_string(),
            )));
        }
        if self.amount_goal <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Goal amount must be positive, got {}",
                self.amount_goal
            ))));
        }
        Ok(())
    }
}
