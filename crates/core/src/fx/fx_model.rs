//! FX domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored exchange rate between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Symbol of the pair, e.g. `EURUSD=X`.
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    /// Builds the canonical symbol for a currency pair.
    pub fn make_fx_symbol(from: &str, to: &str) -> String {
        format!("{}{}=X", from, to)
    }
}

/// Input model for registering or updating an exchange rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
}

/// Result of a currency conversion: the rate that was applied and the
/// converted amount. Callers persist both for the audit trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub rate: Decimal,
    pub converted_amount: Decimal,
}

impl Conversion {
    /// The identity conversion used when both sides share a currency.
    pub fn identity(amount: Decimal) -> Self {
        Self {
            rate: Decimal::ONE,
            converted_amount: amount,
        }
    }
}
