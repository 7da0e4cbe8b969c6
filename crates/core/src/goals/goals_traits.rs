use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::goals_model::{Goal, GoalUpdate, NewGoal};
use crate::ledger::LedgerEntry;
use crate::Result;

/// Trait defining the contract for goal repository operations.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_by_id(&self, goal_id: &str) -> Result<Goal>;
    fn list(&self, owner_id: &str) -> Result<Vec<Goal>>;
    async fn create(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update(&self, goal_update: GoalUpdate) -> Result<Goal>;
    /// Writes `amount_saved` directly. Only the ledger mutation protocol
    /// calls this; it pairs the write with the wallet-deducting transaction
    /// and reverts it when that transaction fails.
    async fn set_amount_saved(&self, goal_id: &str, amount_saved: Decimal) -> Result<Goal>;
    async fn delete(&self, goal_id: &str) -> Result<usize>;
}

/// Trait defining the contract for goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goal(&self, owner_id: &str, goal_id: &str) -> Result<Goal>;
    fn list_goals(&self, owner_id: &str) -> Result<Vec<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, owner_id: &str, goal_update: GoalUpdate) -> Result<Goal>;
    /// Contributes `amount` (in the goal's currency) from a wallet,
    /// clamping `amount_saved` to `amount_goal`.
    async fn top_up(
        &self,
        owner_id: &str,
        goal_id: &str,
        wallet_id: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<LedgerEntry>;
    async fn delete_goal(&self, owner_id: &str, goal_id: &str) -> Result<usize>;
}
