use async_trait::async_trait;
use chrono::NaiveDate;

use super::transactions_model::{NewTransaction, Transaction, TransactionFilter};
use crate::Result;

/// Trait defining the contract for transaction repository operations.
///
/// Every write is an independent atomic row operation; multi-row
/// consistency is the ledger mutation protocol's job, not the store's.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    /// Both legs of a transfer, out leg first.
    fn get_by_transfer_group(&self, transfer_group_id: &str) -> Result<Vec<Transaction>>;
    fn search(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    /// Dates for which a generated transaction already exists, used by the
    /// materializer's idempotency check.
    fn get_recurrence_dates(&self, recurrence_id: &str) -> Result<Vec<NaiveDate>>;
    fn count_for_recurrence(&self, recurrence_id: &str) -> Result<i64>;
    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update(&self, transaction: Transaction) -> Result<Transaction>;
    async fn delete(&self, transaction_id: &str) -> Result<()>;
}

/// Trait defining the contract for transaction query operations.
///
/// Mutations go through the ledger mutation protocol
/// (`ledger::LedgerMutatorTrait`), never through this service.
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn search_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    fn list_wallet_transactions(&self, owner_id: &str, wallet_id: &str)
        -> Result<Vec<Transaction>>;
}
