use log::debug;
use std::sync::Arc;

use super::wallets_model::{NewWallet, Wallet, WalletUpdate};
use super::wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::Result;

/// Service for managing wallets.
pub struct WalletService {
    repository: Arc<dyn WalletRepositoryTrait>,
}

impl WalletService {
    /// Creates a new WalletService instance.
    pub fn new(repository: Arc<dyn WalletRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl WalletServiceTrait for WalletService {
    /// Retrieves a wallet by its ID.
    fn get_wallet(&self, wallet_id: &str) -> Result<Wallet> {
        self.repository.get_by_id(wallet_id)
    }

    fn get_owned_wallet(&self, wallet_id: &str, owner_id: &str) -> Result<Wallet> {
        let wallet = self.repository.get_by_id(wallet_id)?;
        wallet.ensure_owned_by(owner_id)?;
        Ok(wallet)
    }

    /// Lists wallets of an owner, optionally filtered by active status.
    fn list_wallets(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Wallet>> {
        self.repository.list(owner_id, is_active_filter)
    }

    /// Creates a new wallet.
    async fn create_wallet(&self, new_wallet: NewWallet) -> Result<Wallet> {
        new_wallet.validate()?;
        debug!(
            "Creating wallet '{}' ({})",
            new_wallet.name, new_wallet.currency
        );
        self.repository.create(new_wallet).await
    }

    /// Updates wallet metadata. Currency and balances are not updatable here.
    async fn update_wallet(&self, owner_id: &str, wallet_update: WalletUpdate) -> Result<Wallet> {
        wallet_update.validate()?;
        self.get_owned_wallet(&wallet_update.id, owner_id)?;
        self.repository.update(wallet_update).await
    }

    /// Soft-deletes a wallet. Its transactions remain queryable.
    async fn archive_wallet(&self, owner_id: &str, wallet_id: &str) -> Result<Wallet> {
        self.get_owned_wallet(wallet_id, owner_id)?;
        self.repository.set_active(wallet_id, false).await
    }

    /// Restores a previously archived wallet.
    async fn restore_wallet(&self, owner_id: &str, wallet_id: &str) -> Result<Wallet> {
        self.get_owned_wallet(wallet_id, owner_id)?;
        self.repository.set_active(wallet_id, true).await
    }
}
