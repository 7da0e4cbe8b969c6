//! Imports module - batch creation of ledger entries from extracted
//! receipt data.

mod receipts_model;
mod receipts_service;


pub use receipts_model::ReceiptImport;
pub use receipts_service::{ReceiptImportService, ReceiptImportServiceTrait};
