//! Receipt import models.
//!
//! Rows arrive already extracted (merchant, total, date) from a receipt
//! scan; text extraction itself happens outside this crate. Each row is
//! validated and annotated in place, mirroring how CSV import rows carry
//! their own validity state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::ISO_DATE_FORMAT;

/// One extracted receipt, to become a single expense entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptImport {
    pub id: Option<String>,
    pub merchant: String,
    /// Extracted purchase date, `YYYY-MM-DD`.
    pub date: String,
    pub amount: Decimal,
    /// Receipt currency; the wallet currency when `None`.
    pub currency: Option<String>,
    pub category_id: Option<String>,
    pub notes: Option<String>,
    /// Set by `check_receipts` / `import_receipts`.
    pub is_valid: bool,
    pub error: Option<String>,
    /// Id of the committed expense once imported.
    pub transaction_id: Option<String>,
}

impl ReceiptImport {
    /// Parses the extracted date field.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, ISO_DATE_FORMAT).ok()
    }

    pub(crate) fn mark_invalid(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.error = Some(message.into());
    }
}
