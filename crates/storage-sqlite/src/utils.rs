//! Shared helpers for the storage layer.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Canonical TEXT encoding for stored decimal amounts.
pub fn decimal_to_text(value: Decimal) -> String {
    value.to_string()
}

pub fn optional_decimal_to_text(value: Option<Decimal>) -> Option<String> {
    value.map(decimal_to_text)
}

/// Decodes a stored decimal, failing loudly on corrupt data.
pub fn parse_decimal(text: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(text)
        .map_err(|e| StorageError::Decode(format!("invalid decimal '{}': {}", text, e)))
}

pub fn parse_optional_decimal(text: Option<&str>) -> Result<Option<Decimal>, StorageError> {
    text.map(parse_decimal).transpose()
}

/// Current UTC timestamp in the column representation.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
