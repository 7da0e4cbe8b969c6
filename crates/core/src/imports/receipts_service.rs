use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::receipts_model::ReceiptImport;
use crate::categories::CategoryAccessTrait;
use crate::ledger::{EntryType, Intent, LedgerError, LedgerMutatorTrait, SimpleEntryIntent};
use crate::wallets::{validate_currency_code, WalletRepositoryTrait};
use crate::Result;

/// Trait defining the contract for receipt import operations.
#[async_trait]
pub trait ReceiptImportServiceTrait: Send + Sync {
    /// Validates extracted rows against the target wallet and annotates
    /// each with its validity; nothing is written.
    async fn check_receipts(
        &self,
        owner_id: &str,
        wallet_id: &str,
        receipts: Vec<ReceiptImport>,
    ) -> Result<Vec<ReceiptImport>>;

    /// Imports valid rows as expense entries, one ledger mutation per row.
    /// Row failures are annotated and never abort the rest of the batch; a
    /// failed row leaves no partial trace.
    async fn import_receipts(
        &self,
        owner_id: &str,
        wallet_id: &str,
        receipts: Vec<ReceiptImport>,
    ) -> Result<Vec<ReceiptImport>>;
}

/// Service turning extracted receipts into ledger expenses.
pub struct ReceiptImportService {
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    category_access: Arc<dyn CategoryAccessTrait>,
    ledger: Arc<dyn LedgerMutatorTrait>,
}

impl ReceiptImportService {
    pub fn new(
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        category_access: Arc<dyn CategoryAccessTrait>,
        ledger: Arc<dyn LedgerMutatorTrait>,
    ) -> Self {
        Self {
            wallet_repository,
            category_access,
            ledger,
        }
    }

    fn check_row(&self, receipt: &mut ReceiptImport, owner_id: &str) {
        receipt.is_valid = true;
        receipt.error = None;

        if receipt.amount <= Decimal::ZERO {
            receipt.mark_invalid(format!(
                "Receipt total must be positive, got {}",
                receipt.amount
            ));
            return;
        }
        if receipt.parsed_date().is_none() {
            receipt.mark_invalid(format!("Unparseable receipt date '{}'", receipt.date));
            return;
        }
        if let Some(currency) = &receipt.currency {
            if validate_currency_code(currency).is_err() {
                receipt.mark_invalid(format!("Invalid currency code '{}'", currency));
                return;
            }
        }
        if let Some(category_id) = &receipt.category_id {
            match self.category_access.is_accessible(category_id, owner_id) {
                Ok(true) => {}
                Ok(false) => {
                    receipt.mark_invalid(format!("Category '{}' is not accessible", category_id));
                }
                Err(err) => {
                    receipt.mark_invalid(format!("Category lookup failed: {}", err));
                }
            }
        }
    }

    fn to_intent(receipt: &ReceiptImport, owner_id: &str, wallet_id: &str) -> Intent {
        let notes = match &receipt.notes {
            Some(notes) => Some(notes.clone()),
            None if !receipt.merchant.trim().is_empty() => Some(receipt.merchant.clone()),
            None => None,
        };
        Intent::SimpleEntry(SimpleEntryIntent {
            owner_id: owner_id.to_string(),
            wallet_id: wallet_id.to_string(),
            entry_type: EntryType::Expense,
            amount: receipt.amount,
            currency: receipt.currency.clone(),
            // check_row guarantees the date parses.
            date: receipt.parsed_date().unwrap_or_default(),
            category_id: receipt.category_id.clone(),
            recurrence_id: None,
            notes,
        })
    }
}

#[async_trait]
impl ReceiptImportServiceTrait for ReceiptImportService {
    async fn check_receipts(
        &self,
        owner_id: &str,
        wallet_id: &str,
        receipts: Vec<ReceiptImport>,
    ) -> Result<Vec<ReceiptImport>> {
        let wallet = match self.wallet_repository.get_by_id(wallet_id) {
            Ok(wallet) => wallet,
            Err(err) if err.is_not_found() => {
                return Err(LedgerError::WalletNotFound(wallet_id.to_string()).into())
            }
            Err(err) => return Err(err),
        };
        wallet.ensure_owned_by(owner_id)?;
        if !wallet.is_active {
            return Err(LedgerError::WalletInactive(wallet_id.to_string()).into());
        }

        let mut checked = Vec::with_capacity(receipts.len());
        for mut receipt in receipts {
            if receipt.id.is_none() {
                receipt.id = Some(Uuid::new_v4().to_string());
            }
            self.check_row(&mut receipt, owner_id);
            checked.push(receipt);
        }
        Ok(checked)
    }

    async fn import_receipts(
        &self,
        owner_id: &str,
        wallet_id: &str,
        receipts: Vec<ReceiptImport>,
    ) -> Result<Vec<ReceiptImport>> {
        let mut rows = self.check_receipts(owner_id, wallet_id, receipts).await?;

        let mut imported = 0usize;
        for receipt in rows.iter_mut().filter(|r| r.is_valid) {
            let intent = Self::to_intent(receipt, owner_id, wallet_id);
            match self.ledger.execute(intent).await {
                Ok(entry) => {
                    receipt.transaction_id = Some(entry.primary().id.clone());
                    imported += 1;
                }
                Err(err) => receipt.mark_invalid(err.to_string()),
            }
        }
        debug!(
            "imported {}/{} receipts into wallet {}",
            imported,
            rows.len(),
            wallet_id
        );
        Ok(rows)
    }
}
