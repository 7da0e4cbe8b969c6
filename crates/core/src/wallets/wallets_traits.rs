use async_trait::async_trait;
use rust_decimal::Decimal;

use super::wallets_model::{NewWallet, Wallet, WalletUpdate};
use crate::Result;

/// Trait defining the contract for wallet repository operations.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet>;
    fn list(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Wallet>>;
    async fn create(&self, new_wallet: NewWallet) -> Result<Wallet>;
    async fn update(&self, wallet_update: WalletUpdate) -> Result<Wallet>;
    async fn set_active(&self, wallet_id: &str, active: bool) -> Result<Wallet>;

    /// Atomically increments the wallet balance by `delta` and returns the
    /// wallet as written.
    ///
    /// # Contract
    ///
    /// This is the only write path for `Wallet::balance`, and implementations
    /// MUST make it atomic and serializable with respect to concurrent
    /// `adjust_balance` calls on the same wallet: two concurrent deltas must
    /// both apply in full, never lost or partially applied. The ledger
    /// mutation protocol relies on this primitive instead of cross-call
    /// locking. A wallet whose balance is still `None` adjusts from
    /// `initial_balance`.
    async fn adjust_balance(&self, wallet_id: &str, delta: Decimal) -> Result<Wallet>;
}

/// Trait defining the contract for wallet service operations.
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    fn get_wallet(&self, wallet_id: &str) -> Result<Wallet>;
    /// Fetches a wallet and verifies it belongs to `owner_id`.
    fn get_owned_wallet(&self, wallet_id: &str, owner_id: &str) -> Result<Wallet>;
    fn list_wallets(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Wallet>>;
    async fn create_wallet(&self, new_wallet: NewWallet) -> Result<Wallet>;
    async fn update_wallet(&self, owner_id: &str, wallet_update: WalletUpdate) -> Result<Wallet>;
    async fn archive_wallet(&self, owner_id: &str, wallet_id: &str) -> Result<Wallet>;
    async fn restore_wallet(&self, owner_id: &str, wallet_id: &str) -> Result<Wallet>;
}
