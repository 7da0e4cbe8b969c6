use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::goals_model::{Goal, GoalUpdate, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::ledger::{GoalTopUpIntent, Intent, LedgerEntry, LedgerMutatorTrait};
use crate::{errors::ValidationError, Error, Result};

/// Service for managing goals.
///
/// Top-ups are ledger mutations: the wallet-deducting transaction and the
/// `amount_saved` update commit (or revert) together.
pub struct GoalService {
    repository: Arc<dyn GoalRepositoryTrait>,
    ledger: Arc<dyn LedgerMutatorTrait>,
}

impl GoalService {
    pub fn new(repository: Arc<dyn GoalRepositoryTrait>, ledger: Arc<dyn LedgerMutatorTrait>) -> Self {
        Self { repository, ledger }
    }

    fn owned_goal(&self, goal_id: &str, owner_id: &str) -> Result<Goal> {
        let goal = self.repository.get_by_id(goal_id)?;
        if goal.owner_id != owner_id {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Goal '{}' is not owned by the caller",
                goal_id
            ))));
        }
        Ok(goal)
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goal(&self, owner_id: &str, goal_id: &str) -> Result<Goal> {
        self.owned_goal(goal_id, owner_id)
    }

    fn list_goals(&self, owner_id: &str) -> Result<Vec<Goal>> {
        self.repository.list(owner_id)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        self.repository.create(new_goal).await
    }

    async fn update_goal(&self, owner_id: &str, goal_update: GoalUpdate) -> Result<Goal> {
        goal_update.validate()?;
        self.owned_goal(&goal_update.id, owner_id)?;
        self.repository.update(goal_update).await
    }

    async fn top_up(
        &self,
        owner_id: &str,
        goal_id: &str,
        wallet_id: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<LedgerEntry> {
        self.ledger
            .execute(Intent::GoalTopUp(GoalTopUpIntent {
                owner_id: owner_id.to_string(),
                goal_id: goal_id.to_string(),
                wallet_id: wallet_id.to_string(),
                amount,
                date,
                notes: None,
            }))
            .await
    }

    async fn delete_goal(&self, owner_id: &str, goal_id: &str) -> Result<usize> {
        self.owned_goal(goal_id, owner_id)?;
        self.repository.delete(goal_id).await
    }
}
