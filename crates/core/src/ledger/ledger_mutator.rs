//! The ledger mutation protocol.
//!
//! Every flow that moves money — direct entries, transfers, goal top-ups,
//! recurrence materialization, receipt import — funnels through
//! [`LedgerMutator`]. It validates the intent, resolves currency
//! conversions before any write, then drives an ordered saga of row
//! inserts and atomic balance adjustments so the transaction log and
//! wallet balances never diverge, even on partial failure.

use async_trait::async_trait;
use log::error;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::intent::{GoalTopUpIntent, Intent, SimpleEntryIntent, TransferIntent};
use super::ledger_errors::LedgerError;
use super::ledger_model::{BalanceChange, LedgerEntry};
use super::saga::Saga;
use crate::categories::CategoryAccessTrait;
use crate::fx::{Conversion, CurrencyGatewayTrait};
use crate::goals::GoalRepositoryTrait;
use crate::transactions::{
    NewTransaction, Transaction, TransactionRepositoryTrait, TransactionType,
};
use crate::wallets::{Wallet, WalletRepositoryTrait};
use crate::{Error, Result};

/// Trait defining the contract for ledger mutations.
#[async_trait]
pub trait LedgerMutatorTrait: Send + Sync {
    /// Executes an intent, committing its transaction row(s) and balance
    /// adjustment(s), or leaving no trace on failure.
    async fn execute(&self, intent: Intent) -> Result<LedgerEntry>;

    /// Changes the amount of a committed transaction, re-applying the
    /// balance delta with the same directional rules as creation. For a
    /// transfer leg the amount is the origin-side magnitude; the
    /// destination leg moves by the converted delta.
    async fn update_amount(
        &self,
        owner_id: &str,
        transaction_id: &str,
        new_amount: Decimal,
    ) -> Result<Transaction>;

    /// Removes a committed transaction, applying the exact inverse of its
    /// creation deltas first. Transfer legs are removed pairwise.
    async fn delete(&self, owner_id: &str, transaction_id: &str) -> Result<()>;
}

/// Saga-driven implementation of the ledger mutation protocol.
pub struct LedgerMutator {
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    category_access: Arc<dyn CategoryAccessTrait>,
    currency_gateway: Arc<dyn CurrencyGatewayTrait>,
}

impl LedgerMutator {
    pub fn new(
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        category_access: Arc<dyn CategoryAccessTrait>,
        currency_gateway: Arc<dyn CurrencyGatewayTrait>,
    ) -> Self {
        Self {
            wallet_repository,
            transaction_repository,
            goal_repository,
            category_access,
            currency_gateway,
        }
    }

    /// Resolves a wallet the caller may mutate.
    fn owned_active_wallet(&self, wallet_id: &str, owner_id: &str) -> Result<Wallet> {
        let wallet = match self.wallet_repository.get_by_id(wallet_id) {
            Ok(wallet) => wallet,
            Err(err) if err.is_not_found() => {
                return Err(LedgerError::WalletNotFound(wallet_id.to_string()).into())
            }
            Err(err) => return Err(err),
        };
        if wallet.owner_id != owner_id {
            return Err(LedgerError::NotOwned(wallet_id.to_string()).into());
        }
        if !wallet.is_active {
            return Err(LedgerError::WalletInactive(wallet_id.to_string()).into());
        }
        Ok(wallet)
    }

    fn check_category(&self, category_id: Option<&str>, owner_id: &str) -> Result<()> {
        if let Some(category_id) = category_id {
            if !self.category_access.is_accessible(category_id, owner_id)? {
                return Err(LedgerError::CategoryInvalid(category_id.to_string()).into());
            }
        }
        Ok(())
    }

    /// Resolves a conversion before any write happens; a gateway failure
    /// aborts with `CurrencyConversionFailed` and no partial state.
    fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Conversion> {
        if from == to {
            return Ok(Conversion::identity(amount));
        }
        self.currency_gateway
            .convert(amount, from, to)
            .map_err(|err| LedgerError::CurrencyConversionFailed(err.to_string()).into())
    }

    fn ensure_sufficient(wallet: &Wallet, requested: Decimal) -> Result<()> {
        let available = wallet.current_balance();
        if available < requested {
            return Err(LedgerError::InsufficientBalance {
                wallet_id: wallet.id.clone(),
                requested,
                available,
            }
            .into());
        }
        Ok(())
    }

    // === saga step builders ===

    fn push_insert(
        saga: &mut Saga,
        repository: Arc<dyn TransactionRepositoryTrait>,
        transaction_id: String,
        row: NewTransaction,
    ) {
        let description = format!("insert {} row {}", row.transaction_type, transaction_id);
        let delete_repository = repository.clone();
        saga.step(
            description,
            move || async move { repository.insert(row).await.map(|_| ()) },
            move || async move { delete_repository.delete(&transaction_id).await },
        );
    }

    fn push_adjust(
        saga: &mut Saga,
        repository: Arc<dyn WalletRepositoryTrait>,
        wallet_id: String,
        delta: Decimal,
    ) {
        let description = format!("adjust wallet {} by {}", wallet_id, delta);
        let inverse_repository = repository.clone();
        let inverse_wallet_id = wallet_id.clone();
        saga.step(
            description,
            move || async move {
                repository
                    .adjust_balance(&wallet_id, delta)
                    .await
                    .map(|_| ())
                    .map_err(|err| {
                        error!(
                            "balance adjustment failed for wallet {} (delta {}): {}",
                            wallet_id, delta, err
                        );
                        Error::Ledger(LedgerError::BalanceAdjustmentFailed(format!(
                            "wallet {}: {}",
                            wallet_id, err
                        )))
                    })
            },
            move || async move {
                inverse_repository
                    .adjust_balance(&inverse_wallet_id, -delta)
                    .await
                    .map(|_| ())
            },
        );
    }

    fn push_delete_row(
        saga: &mut Saga,
        repository: Arc<dyn TransactionRepositoryTrait>,
        row: Transaction,
    ) {
        let transaction_id = row.id.clone();
        let description = format!("delete {} row {}", row.transaction_type, transaction_id);
        let reinsert_repository = repository.clone();
        saga.step(
            description,
            move || async move { repository.delete(&transaction_id).await },
            move || async move {
                reinsert_repository
                    .insert(NewTransaction::from(row))
                    .await
                    .map(|_| ())
            },
        );
    }

    fn push_update_row(
        saga: &mut Saga,
        repository: Arc<dyn TransactionRepositoryTrait>,
        updated: Transaction,
        original: Transaction,
    ) {
        let description = format!("update row {}", updated.id);
        let restore_repository = repository.clone();
        saga.step(
            description,
            move || async move { repository.update(updated).await.map(|_| ()) },
            move || async move { restore_repository.update(original).await.map(|_| ()) },
        );
    }

    fn push_set_saved(
        saga: &mut Saga,
        repository: Arc<dyn GoalRepositoryTrait>,
        goal_id: String,
        new_saved: Decimal,
        previous_saved: Decimal,
    ) {
        let description = format!("set goal {} amount_saved to {}", goal_id, new_saved);
        let restore_repository = repository.clone();
        let restore_goal_id = goal_id.clone();
        saga.step(
            description,
            move || async move {
                repository
                    .set_amount_saved(&goal_id, new_saved)
                    .await
                    .map(|_| ())
            },
            move || async move {
                restore_repository
                    .set_amount_saved(&restore_goal_id, previous_saved)
                    .await
                    .map(|_| ())
            },
        );
    }

    // === intent execution ===

    async fn execute_simple(&self, intent: SimpleEntryIntent) -> Result<LedgerEntry> {
        let wallet = self.owned_active_wallet(&intent.wallet_id, &intent.owner_id)?;
        self.check_category(intent.category_id.as_deref(), &intent.owner_id)?;

        let entry_currency = intent
            .currency
            .clone()
            .unwrap_or_else(|| wallet.currency.clone());
        let conversion = self.convert(intent.amount, &entry_currency, &wallet.currency)?;
        let converted = entry_currency != wallet.currency;
        let effective = conversion.converted_amount;

        let transaction_type = intent.entry_type.transaction_type();
        let transaction_id = Uuid::new_v4().to_string();
        let delta = transaction_type.sign() * effective;

        let row = NewTransaction {
            id: Some(transaction_id.clone()),
            owner_id: intent.owner_id.clone(),
            wallet_id: wallet.id.clone(),
            origin_wallet_id: None,
            destination_wallet_id: None,
            transfer_group_id: None,
            transaction_type,
            amount: effective,
            currency: wallet.currency.clone(),
            transaction_date: intent.date,
            category_id: intent.category_id.clone(),
            recurrence_id: intent.recurrence_id.clone(),
            goal_id: None,
            notes: intent.notes.clone(),
            exchange_rate: converted.then_some(conversion.rate),
            original_amount: converted.then_some(intent.amount),
            original_currency: converted.then(|| entry_currency.clone()),
            converted_amount: converted.then_some(effective),
            destination_currency: converted.then(|| wallet.currency.clone()),
        };
        row.validate()?;

        let mut saga = Saga::new(format!("ledger:{}", transaction_type));
        Self::push_insert(
            &mut saga,
            self.transaction_repository.clone(),
            transaction_id.clone(),
            row,
        );
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            wallet.id.clone(),
            delta,
        );
        saga.run_detached().await?;

        let committed = self.transaction_repository.get_by_id(&transaction_id)?;
        Ok(LedgerEntry {
            transactions: vec![committed],
            balance_changes: vec![BalanceChange {
                wallet_id: wallet.id,
                delta,
            }],
        })
    }

    async fn execute_transfer(&self, intent: TransferIntent) -> Result<LedgerEntry> {
        let origin = self.owned_active_wallet(&intent.origin_wallet_id, &intent.owner_id)?;
        let destination =
            self.owned_active_wallet(&intent.destination_wallet_id, &intent.owner_id)?;
        self.check_category(intent.category_id.as_deref(), &intent.owner_id)?;
        Self::ensure_sufficient(&origin, intent.amount)?;

        let conversion = self.convert(intent.amount, &origin.currency, &destination.currency)?;
        let converted = origin.currency != destination.currency;
        let received = conversion.converted_amount;

        let transfer_group_id = Uuid::new_v4().to_string();
        let out_id = Uuid::new_v4().to_string();
        let in_id = Uuid::new_v4().to_string();

        let out_row = NewTransaction {
            id: Some(out_id.clone()),
            owner_id: intent.owner_id.clone(),
            wallet_id: origin.id.clone(),
            origin_wallet_id: Some(origin.id.clone()),
            destination_wallet_id: Some(destination.id.clone()),
            transfer_group_id: Some(transfer_group_id.clone()),
            transaction_type: TransactionType::TransferOut,
            amount: intent.amount,
            currency: origin.currency.clone(),
            transaction_date: intent.date,
            category_id: intent.category_id.clone(),
            recurrence_id: intent.recurrence_id.clone(),
            goal_id: None,
            notes: intent.notes.clone(),
            exchange_rate: None,
            original_amount: None,
            original_currency: None,
            converted_amount: None,
            destination_currency: None,
        };
        // The conversion audit lives on the receiving leg.
        let in_row = NewTransaction {
            id: Some(in_id.clone()),
            wallet_id: destination.id.clone(),
            transaction_type: TransactionType::TransferIn,
            amount: received,
            currency: destination.currency.clone(),
            exchange_rate: converted.then_some(conversion.rate),
            original_amount: converted.then_some(intent.amount),
            original_currency: converted.then(|| origin.currency.clone()),
            converted_amount: converted.then_some(received),
            destination_currency: converted.then(|| destination.currency.clone()),
            ..out_row.clone()
        };
        out_row.validate()?;
        in_row.validate()?;

        let mut saga = Saga::new("ledger:transfer");
        Self::push_insert(
            &mut saga,
            self.transaction_repository.clone(),
            out_id.clone(),
            out_row,
        );
        Self::push_insert(
            &mut saga,
            self.transaction_repository.clone(),
            in_id.clone(),
            in_row,
        );
        // Fixed order: origin loses first, destination gains second.
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            origin.id.clone(),
            -intent.amount,
        );
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            destination.id.clone(),
            received,
        );
        saga.run_detached().await?;

        let out_committed = self.transaction_repository.get_by_id(&out_id)?;
        let in_committed = self.transaction_repository.get_by_id(&in_id)?;
        Ok(LedgerEntry {
            transactions: vec![out_committed, in_committed],
            balance_changes: vec![
                BalanceChange {
                    wallet_id: origin.id,
                    delta: -intent.amount,
                },
                BalanceChange {
                    wallet_id: destination.id,
                    delta: received,
                },
            ],
        })
    }

    async fn execute_goal_top_up(&self, intent: GoalTopUpIntent) -> Result<LedgerEntry> {
        let goal = match self.goal_repository.get_by_id(&intent.goal_id) {
            Ok(goal) => goal,
            Err(err) if err.is_not_found() => {
                return Err(LedgerError::GoalNotFound(intent.goal_id.clone()).into())
            }
            Err(err) => return Err(err),
        };
        if goal.owner_id != intent.owner_id {
            return Err(LedgerError::NotOwned(intent.goal_id.clone()).into());
        }
        let wallet = self.owned_active_wallet(&intent.wallet_id, &intent.owner_id)?;

        let conversion = self.convert(intent.amount, &goal.currency, &wallet.currency)?;
        let converted = goal.currency != wallet.currency;
        let charged = conversion.converted_amount;
        Self::ensure_sufficient(&wallet, charged)?;

        let previous_saved = goal.amount_saved;
        let new_saved = (goal.amount_saved + intent.amount).min(goal.amount_goal);

        let transaction_id = Uuid::new_v4().to_string();
        let row = NewTransaction {
            id: Some(transaction_id.clone()),
            owner_id: intent.owner_id.clone(),
            wallet_id: wallet.id.clone(),
            origin_wallet_id: None,
            destination_wallet_id: None,
            transfer_group_id: None,
            transaction_type: TransactionType::Expense,
            amount: charged,
            currency: wallet.currency.clone(),
            transaction_date: intent.date,
            category_id: None,
            recurrence_id: None,
            goal_id: Some(goal.id.clone()),
            notes: intent.notes.clone(),
            exchange_rate: converted.then_some(conversion.rate),
            original_amount: converted.then_some(intent.amount),
            original_currency: converted.then(|| goal.currency.clone()),
            converted_amount: converted.then_some(charged),
            destination_currency: converted.then(|| wallet.currency.clone()),
        };
        row.validate()?;

        let mut saga = Saga::new("ledger:goal-top-up");
        Self::push_set_saved(
            &mut saga,
            self.goal_repository.clone(),
            goal.id.clone(),
            new_saved,
            previous_saved,
        );
        Self::push_insert(
            &mut saga,
            self.transaction_repository.clone(),
            transaction_id.clone(),
            row,
        );
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            wallet.id.clone(),
            -charged,
        );
        saga.run_detached().await?;

        let committed = self.transaction_repository.get_by_id(&transaction_id)?;
        Ok(LedgerEntry {
            transactions: vec![committed],
            balance_changes: vec![BalanceChange {
                wallet_id: wallet.id,
                delta: -charged,
            }],
        })
    }

    // === update / delete ===

    async fn update_transfer_amount(
        &self,
        leg: Transaction,
        new_amount: Decimal,
    ) -> Result<Transaction> {
        let transfer_group_id = leg.transfer_group_id.clone().ok_or_else(|| {
            Error::Unexpected(format!("transfer leg {} has no transfer group", leg.id))
        })?;
        let legs = self
            .transaction_repository
            .get_by_transfer_group(&transfer_group_id)?;
        let out = legs
            .iter()
            .find(|t| t.transaction_type == TransactionType::TransferOut)
            .cloned()
            .ok_or_else(|| {
                Error::Unexpected(format!("transfer group {} has no out leg", transfer_group_id))
            })?;
        let incoming = legs
            .iter()
            .find(|t| t.transaction_type == TransactionType::TransferIn)
            .cloned()
            .ok_or_else(|| {
                Error::Unexpected(format!("transfer group {} has no in leg", transfer_group_id))
            })?;

        // Reuse the audited rate so the update stays deterministic even if
        // the stored market rate moved since creation.
        let rate = incoming.exchange_rate.unwrap_or(Decimal::ONE);
        let new_received = new_amount * rate;
        let delta_origin = out.amount - new_amount;
        let delta_destination = new_received - incoming.amount;

        if new_amount > out.amount {
            let origin = self.owned_active_wallet(&out.wallet_id, &out.owner_id)?;
            Self::ensure_sufficient(&origin, new_amount - out.amount)?;
        }

        let mut updated_out = out.clone();
        updated_out.amount = new_amount;
        let mut updated_in = incoming.clone();
        updated_in.amount = new_received;
        if updated_in.exchange_rate.is_some() {
            updated_in.original_amount = Some(new_amount);
            updated_in.converted_amount = Some(new_received);
        }

        let mut saga = Saga::new("ledger:update-transfer");
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            out.wallet_id.clone(),
            delta_origin,
        );
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            incoming.wallet_id.clone(),
            delta_destination,
        );
        Self::push_update_row(
            &mut saga,
            self.transaction_repository.clone(),
            updated_out,
            out,
        );
        Self::push_update_row(
            &mut saga,
            self.transaction_repository.clone(),
            updated_in,
            incoming,
        );
        saga.run_detached().await?;

        self.transaction_repository.get_by_id(&leg.id)
    }

    async fn delete_transfer(&self, leg: Transaction) -> Result<()> {
        let transfer_group_id = leg.transfer_group_id.clone().ok_or_else(|| {
            Error::Unexpected(format!("transfer leg {} has no transfer group", leg.id))
        })?;
        let legs = self
            .transaction_repository
            .get_by_transfer_group(&transfer_group_id)?;

        // Inverse of creation order: destination gives back first, then the
        // origin is refunded, then the rows disappear.
        let mut saga = Saga::new("ledger:delete-transfer");
        for leg in legs
            .iter()
            .filter(|t| t.transaction_type == TransactionType::TransferIn)
            .chain(
                legs.iter()
                    .filter(|t| t.transaction_type == TransactionType::TransferOut),
            )
        {
            Self::push_adjust(
                &mut saga,
                self.wallet_repository.clone(),
                leg.wallet_id.clone(),
                -leg.signed_effect(),
            );
        }
        for leg in &legs {
            Self::push_delete_row(
                &mut saga,
                self.transaction_repository.clone(),
                leg.clone(),
            );
        }
        saga.run_detached().await
    }
}

#[async_trait]
impl LedgerMutatorTrait for LedgerMutator {
    async fn execute(&self, intent: Intent) -> Result<LedgerEntry> {
        intent.validate()?;
        match intent {
            Intent::SimpleEntry(intent) => self.execute_simple(intent).await,
            Intent::Transfer(intent) => self.execute_transfer(intent).await,
            Intent::GoalTopUp(intent) => self.execute_goal_top_up(intent).await,
        }
    }

    async fn update_amount(
        &self,
        owner_id: &str,
        transaction_id: &str,
        new_amount: Decimal,
    ) -> Result<Transaction> {
        if new_amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "amount must be positive, got {}",
                new_amount
            ))
            .into());
        }
        let original = self.transaction_repository.get_by_id(transaction_id)?;
        if original.owner_id != owner_id {
            return Err(LedgerError::NotOwned(transaction_id.to_string()).into());
        }
        if original.goal_id.is_some() {
            return Err(LedgerError::UnsupportedUpdate(
                "goal top-ups are adjusted by deleting the top-up and contributing again"
                    .to_string(),
            )
            .into());
        }
        if original.transaction_type.is_transfer_leg() {
            return self.update_transfer_amount(original, new_amount).await;
        }
        if original.amount == new_amount {
            return Ok(original);
        }

        let delta = original.transaction_type.sign() * (new_amount - original.amount);
        let mut updated = original.clone();
        updated.amount = new_amount;

        let mut saga = Saga::new("ledger:update-amount");
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            original.wallet_id.clone(),
            delta,
        );
        Self::push_update_row(
            &mut saga,
            self.transaction_repository.clone(),
            updated,
            original,
        );
        saga.run_detached().await?;

        self.transaction_repository.get_by_id(transaction_id)
    }

    async fn delete(&self, owner_id: &str, transaction_id: &str) -> Result<()> {
        let original = self.transaction_repository.get_by_id(transaction_id)?;
        if original.owner_id != owner_id {
            return Err(LedgerError::NotOwned(transaction_id.to_string()).into());
        }
        if original.transaction_type.is_transfer_leg() {
            return self.delete_transfer(original).await;
        }

        let mut saga = Saga::new("ledger:delete");
        Self::push_adjust(
            &mut saga,
            self.wallet_repository.clone(),
            original.wallet_id.clone(),
            -original.signed_effect(),
        );
        if let Some(goal_id) = original.goal_id.clone() {
            let goal = self.goal_repository.get_by_id(&goal_id)?;
            // The goal was credited in its own currency; refund that amount.
            let refund = original.original_amount.unwrap_or(original.amount);
            let new_saved = (goal.amount_saved - refund).max(Decimal::ZERO);
            Self::push_set_saved(
                &mut saga,
                self.goal_repository.clone(),
                goal_id,
                new_saved,
                goal.amount_saved,
            );
        }
        Self::push_delete_row(&mut saga, self.transaction_repository.clone(), original);
        saga.run_detached().await
    }
}
