use std::sync::Arc;

use super::transactions_model::{Transaction, TransactionFilter};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::{errors::ValidationError, Error, Result};

/// Read-side service over the transaction log.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
}

impl TransactionService {
    pub fn new(repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<Transaction> {
        let transaction = self.repository.get_by_id(transaction_id)?;
        if transaction.owner_id != owner_id {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Transaction '{}' is not owned by the caller",
                transaction_id
            ))));
        }
        Ok(transaction)
    }

    fn search_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        self.repository.search(filter)
    }

    fn list_wallet_transactions(
        &self,
        owner_id: &str,
        wallet_id: &str,
    ) -> Result<Vec<Transaction>> {
        let mut filter = TransactionFilter::for_owner(owner_id);
        filter.wallet_ids = Some(vec![wallet_id.to_string()]);
        self.repository.search(&filter)
    }
}
