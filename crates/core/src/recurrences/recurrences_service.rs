use async_trait::async_trait;
use std::sync::Arc;

use super::recurrences_errors::RecurrenceError;
use super::recurrences_model::{NewRecurrence, Recurrence, RecurrenceUpdate};
use super::recurrences_traits::{RecurrenceRepositoryTrait, RecurrenceServiceTrait};
use crate::transactions::TransactionRepositoryTrait;
use crate::wallets::WalletRepositoryTrait;
use crate::Result;

/// Service for managing recurrence templates.
pub struct RecurrenceService {
    repository: Arc<dyn RecurrenceRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
}

impl RecurrenceService {
    pub fn new(
        repository: Arc<dyn RecurrenceRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            transaction_repository,
            wallet_repository,
        }
    }

    fn owned_recurrence(&self, recurrence_id: &str, owner_id: &str) -> Result<Recurrence> {
        let recurrence = self.repository.get_by_id(recurrence_id)?;
        if recurrence.owner_id != owner_id {
            return Err(RecurrenceError::NotOwned(recurrence_id.to_string()).into());
        }
        Ok(recurrence)
    }

    fn check_wallet(&self, wallet_id: &str, owner_id: &str) -> Result<()> {
        let wallet = self.wallet_repository.get_by_id(wallet_id)?;
        wallet.ensure_owned_by(owner_id)
    }
}

#[async_trait]
impl RecurrenceServiceTrait for RecurrenceService {
    fn get_recurrence(&self, owner_id: &str, recurrence_id: &str) -> Result<Recurrence> {
        self.owned_recurrence(recurrence_id, owner_id)
    }

    fn list_recurrences(
        &self,
        owner_id: &str,
        is_active_filter: Option<bool>,
    ) -> Result<Vec<Recurrence>> {
        self.repository.list(owner_id, is_active_filter)
    }

    async fn create_recurrence(&self, new_recurrence: NewRecurrence) -> Result<Recurrence> {
        new_recurrence.validate()?;
        self.check_wallet(&new_recurrence.wallet_id, &new_recurrence.owner_id)?;
        if let Some(destination) = &new_recurrence.destination_wallet_id {
            self.check_wallet(destination, &new_recurrence.owner_id)?;
        }
        self.repository.create(new_recurrence).await
    }

    async fn update_recurrence(
        &self,
        owner_id: &str,
        recurrence_update: RecurrenceUpdate,
    ) -> Result<Recurrence> {
        recurrence_update.validate()?;
        self.owned_recurrence(&recurrence_update.id, owner_id)?;
        self.repository.update(recurrence_update).await
    }

    async fn toggle_recurrence(&self, owner_id: &str, recurrence_id: &str) -> Result<Recurrence> {
        let recurrence = self.owned_recurrence(recurrence_id, owner_id)?;
        self.repository
            .set_active(recurrence_id, !recurrence.is_active)
            .await
    }

    async fn delete_recurrence(&self, owner_id: &str, recurrence_id: &str) -> Result<usize> {
        self.owned_recurrence(recurrence_id, owner_id)?;
        // Generated transactions keep their back-reference; deleting the
        // template would orphan them and break the idempotency check.
        let generated = self
            .transaction_repository
            .count_for_recurrence(recurrence_id)?;
        if generated > 0 {
            return Err(RecurrenceError::HasTransactions(recurrence_id.to_string()).into());
        }
        self.repository.delete(recurrence_id).await
    }
}
