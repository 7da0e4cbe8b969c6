//! Tests for the ledger mutation protocol.

#[cfg(test)]
mod tests {
    use crate::categories::CategoryAccessTrait;
    use crate::errors::DatabaseError;
    use crate::fx::{Conversion, CurrencyGatewayTrait, FxError};
    use crate::goals::{Goal, GoalRepositoryTrait, GoalUpdate, NewGoal};
    use crate::ledger::{
        EntryType, GoalTopUpIntent, Intent, LedgerError, LedgerMutator, LedgerMutatorTrait,
        SimpleEntryIntent, TransferIntent,
    };
    use crate::transactions::{
        NewTransaction, Transaction, TransactionFilter, TransactionRepositoryTrait,
        TransactionType,
    };
    use crate::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletUpdate};
    use crate::{Error, Result};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    fn not_found(what: &str) -> Error {
        Error::Database(DatabaseError::NotFound(what.to_string()))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    // --- Mock WalletRepository ---
    #[derive(Default)]
    struct MockWalletRepository {
        wallets: Mutex<HashMap<String, Wallet>>,
        fail_adjust_for: Mutex<HashSet<String>>,
    }

    impl MockWalletRepository {
        fn add(&self, wallet: Wallet) {
            self.wallets.lock().unwrap().insert(wallet.id.clone(), wallet);
        }

        fn fail_adjust(&self, wallet_id: &str) {
            self.fail_adjust_for
                .lock()
                .unwrap()
                .insert(wallet_id.to_string());
        }

        fn allow_adjust(&self, wallet_id: &str) {
            self.fail_adjust_for.lock().unwrap().remove(wallet_id);
        }

        fn balance_of(&self, wallet_id: &str) -> Decimal {
            self.wallets.lock().unwrap()[wallet_id].current_balance()
        }
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
            self.wallets
                .lock()
                .unwrap()
                .get(wallet_id)
                .cloned()
                .ok_or_else(|| not_found(wallet_id))
        }

        fn list(&self, _owner_id: &str, _is_active_filter: Option<bool>) -> Result<Vec<Wallet>> {
            Ok(self.wallets.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, _new_wallet: NewWallet) -> Result<Wallet> {
            unimplemented!()
        }

        async fn update(&self, _wallet_update: WalletUpdate) -> Result<Wallet> {
            unimplemented!()
        }

        async fn set_active(&self, _wallet_id: &str, _active: bool) -> Result<Wallet> {
            unimplemented!()
        }

        async fn adjust_balance(&self, wallet_id: &str, delta: Decimal) -> Result<Wallet> {
            if self.fail_adjust_for.lock().unwrap().contains(wallet_id) {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "injected adjustment failure".to_string(),
                )));
            }
            let mut wallets = self.wallets.lock().unwrap();
            let wallet = wallets
                .get_mut(wallet_id)
                .ok_or_else(|| not_found(wallet_id))?;
            wallet.balance = Some(wallet.current_balance() + delta);
            Ok(wallet.clone())
        }
    }

    // --- Mock TransactionRepository ---
    #[derive(Default)]
    struct MockTransactionRepository {
        rows: Mutex<Vec<Transaction>>,
        fail_delete: AtomicBool,
    }

    impl MockTransactionRepository {
        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn rows_of_type(&self, transaction_type: TransactionType) -> Vec<Transaction> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.transaction_type == transaction_type)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl TransactionRepositoryTrait for MockTransactionRepository {
        fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == transaction_id)
                .cloned()
                .ok_or_else(|| not_found(transaction_id))
        }

        fn get_by_transfer_group(&self, transfer_group_id: &str) -> Result<Vec<Transaction>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.transfer_group_id.as_deref() == Some(transfer_group_id))
                .cloned()
                .collect())
        }

        fn search(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.owner_id == filter.owner_id)
                .cloned()
                .collect())
        }

        fn get_recurrence_dates(&self, recurrence_id: &str) -> Result<Vec<NaiveDate>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.recurrence_id.as_deref() == Some(recurrence_id))
                .map(|t| t.transaction_date)
                .collect())
        }

        fn count_for_recurrence(&self, recurrence_id: &str) -> Result<i64> {
            Ok(self.get_recurrence_dates(recurrence_id)?.len() as i64)
        }

        async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction> {
            let now = Utc::now().naive_utc();
            let row = Transaction {
                id: new_transaction.id.clone().unwrap_or_default(),
                owner_id: new_transaction.owner_id,
                wallet_id: new_transaction.wallet_id,
                origin_wallet_id: new_transaction.origin_wallet_id,
                destination_wallet_id: new_transaction.destination_wallet_id,
                transfer_group_id: new_transaction.transfer_group_id,
                transaction_type: new_transaction.transaction_type,
                amount: new_transaction.amount,
                currency: new_transaction.currency,
                transaction_date: new_transaction.transaction_date,
                category_id: new_transaction.category_id,
                recurrence_id: new_transaction.recurrence_id,
                goal_id: new_transaction.goal_id,
                notes: new_transaction.notes,
                exchange_rate: new_transaction.exchange_rate,
                original_amount: new_transaction.original_amount,
                original_currency: new_transaction.original_currency,
                converted_amount: new_transaction.converted_amount,
                destination_currency: new_transaction.destination_currency,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn update(&self, transaction: Transaction) -> Result<Transaction> {
            let mut rows = self.rows.lock().unwrap();
            let slot = rows
                .iter_mut()
                .find(|t| t.id == transaction.id)
                .ok_or_else(|| not_found(&transaction.id))?;
            *slot = transaction.clone();
            Ok(transaction)
        }

        async fn delete(&self, transaction_id: &str) -> Result<()> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "injected delete failure".to_string(),
                )));
            }
            self.rows.lock().unwrap().retain(|t| t.id != transaction_id);
            Ok(())
        }
    }

    // --- Mock GoalRepository ---
    #[derive(Default)]
    struct MockGoalRepository {
        goals: Mutex<HashMap<String, Goal>>,
    }

    impl MockGoalRepository {
        fn add(&self, goal: Goal) {
            self.goals.lock().unwrap().insert(goal.id.clone(), goal);
        }

        fn saved_of(&self, goal_id: &str) -> Decimal {
            self.goals.lock().unwrap()[goal_id].amount_saved
        }
    }

    #[async_trait]
    impl GoalRepositoryTrait for MockGoalRepository {
        fn get_by_id(&self, goal_id: &str) -> Result<Goal> {
            self.goals
                .lock()
                .unwrap()
                .get(goal_id)
                .cloned()
                .ok_or_else(|| not_found(goal_id))
        }

        fn list(&self, _owner_id: &str) -> Result<Vec<Goal>> {
            Ok(self.goals.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, _new_goal: NewGoal) -> Result<Goal> {
            unimplemented!()
        }

        async fn update(&self, _goal_update: GoalUpdate) -> Result<Goal> {
            unimplemented!()
        }

        async fn set_amount_saved(&self, goal_id: &str, amount_saved: Decimal) -> Result<Goal> {
            let mut goals = self.goals.lock().unwrap();
            let goal = goals.get_mut(goal_id).ok_or_else(|| not_found(goal_id))?;
            goal.amount_saved = amount_saved;
            Ok(goal.clone())
        }

        async fn delete(&self, _goal_id: &str) -> Result<usize> {
            unimplemented!()
        }
    }

    // --- Mock CategoryAccess ---
    struct MockCategoryAccess {
        accessible: Mutex<HashSet<String>>,
    }

    impl MockCategoryAccess {
        fn new() -> Self {
            Self {
                accessible: Mutex::new(HashSet::new()),
            }
        }

        fn allow(&self, category_id: &str) {
            self.accessible
                .lock()
                .unwrap()
                .insert(category_id.to_string());
        }
    }

    impl CategoryAccessTrait for MockCategoryAccess {
        fn is_accessible(&self, category_id: &str, _owner_id: &str) -> Result<bool> {
            Ok(self.accessible.lock().unwrap().contains(category_id))
        }
    }

    // --- Mock CurrencyGateway ---
    #[derive(Default)]
    struct MockCurrencyGateway {
        rates: Mutex<HashMap<(String, String), Decimal>>,
    }

    impl MockCurrencyGateway {
        fn set_rate(&self, from: &str, to: &str, rate: Decimal) {
            self.rates
                .lock()
                .unwrap()
                .insert((from.to_string(), to.to_string()), rate);
        }
    }

    impl CurrencyGatewayTrait for MockCurrencyGateway {
        fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Conversion> {
            match self
                .rates
                .lock()
                .unwrap()
                .get(&(from.to_string(), to.to_string()))
            {
                Some(rate) => Ok(Conversion {
                    rate: *rate,
                    converted_amount: amount * rate,
                }),
                None => Err(FxError::RateNotFound(format!("{}/{}", from, to)).into()),
            }
        }
    }

    // --- Fixture ---
    struct Ctx {
        wallets: Arc<MockWalletRepository>,
        transactions: Arc<MockTransactionRepository>,
        goals: Arc<MockGoalRepository>,
        categories: Arc<MockCategoryAccess>,
        fx: Arc<MockCurrencyGateway>,
        mutator: LedgerMutator,
    }

    fn wallet(id: &str, currency: &str, balance: Decimal) -> Wallet {
        Wallet {
            id: id.to_string(),
            owner_id: "u-1".to_string(),
            name: id.to_string(),
            currency: currency.to_string(),
            balance: Some(balance),
            initial_balance: Decimal::ZERO,
            is_active: true,
            ..Default::default()
        }
    }

    fn ctx() -> Ctx {
        let wallets = Arc::new(MockWalletRepository::default());
        let transactions = Arc::new(MockTransactionRepository::default());
        let goals = Arc::new(MockGoalRepository::default());
        let categories = Arc::new(MockCategoryAccess::new());
        let fx = Arc::new(MockCurrencyGateway::default());

        wallets.add(wallet("w-1", "EUR", dec!(100)));
        wallets.add(wallet("w-2", "EUR", dec!(10)));

        let mutator = LedgerMutator::new(
            wallets.clone(),
            transactions.clone(),
            goals.clone(),
            categories.clone(),
            fx.clone(),
        );
        Ctx {
            wallets,
            transactions,
            goals,
            categories,
            fx,
            mutator,
        }
    }

    fn expense(amount: Decimal) -> Intent {
        Intent::SimpleEntry(SimpleEntryIntent {
            owner_id: "u-1".to_string(),
            wallet_id: "w-1".to_string(),
            entry_type: EntryType::Expense,
            amount,
            currency: None,
            date: date(),
            category_id: None,
            recurrence_id: None,
            notes: None,
        })
    }

    fn income(amount: Decimal) -> Intent {
        Intent::SimpleEntry(SimpleEntryIntent {
            owner_id: "u-1".to_string(),
            wallet_id: "w-1".to_string(),
            entry_type: EntryType::Income,
            amount,
            currency: None,
            date: date(),
            category_id: None,
            recurrence_id: None,
            notes: None,
        })
    }

    fn transfer(amount: Decimal) -> Intent {
        Intent::Transfer(TransferIntent {
            owner_id: "u-1".to_string(),
            origin_wallet_id: "w-1".to_string(),
            destination_wallet_id: "w-2".to_string(),
            amount,
            date: date(),
            category_id: None,
            recurrence_id: None,
            notes: None,
        })
    }

    fn goal(id: &str, currency: &str, amount_goal: Decimal, amount_saved: Decimal) -> Goal {
        Goal {
            id: id.to_string(),
            owner_id: "u-1".to_string(),
            name: id.to_string(),
            currency: currency.to_string(),
            amount_goal,
            amount_saved,
            ..Default::default()
        }
    }

    fn top_up(goal_id: &str, amount: Decimal) -> Intent {
        Intent::GoalTopUp(GoalTopUpIntent {
            owner_id: "u-1".to_string(),
            goal_id: goal_id.to_string(),
            wallet_id: "w-1".to_string(),
            amount,
            date: date(),
            notes: None,
        })
    }

    // === creation ===

    #[tokio::test]
    async fn transfer_conserves_balances_and_writes_both_legs() {
        let ctx = ctx();

        let entry = ctx.mutator.execute(transfer(dec!(40))).await.unwrap();

        // 100/10 -> 60/50.
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(60));
        assert_eq!(ctx.wallets.balance_of("w-2"), dec!(50));

        assert_eq!(entry.transactions.len(), 2);
        let out = &entry.transactions[0];
        let incoming = &entry.transactions[1];
        assert_eq!(out.transaction_type, TransactionType::TransferOut);
        assert_eq!(incoming.transaction_type, TransactionType::TransferIn);
        assert_eq!(out.amount, dec!(40));
        assert_eq!(incoming.amount, dec!(40));
        assert_eq!(out.transfer_group_id, incoming.transfer_group_id);
        assert_eq!(out.wallet_id, "w-1");
        assert_eq!(incoming.wallet_id, "w-2");

        // Reported deltas match the committed rows.
        assert_eq!(entry.balance_changes[0].delta, dec!(-40));
        assert_eq!(entry.balance_changes[1].delta, dec!(40));
    }

    #[tokio::test]
    async fn failed_destination_adjust_leaves_no_trace() {
        let ctx = ctx();
        ctx.wallets.fail_adjust("w-2");

        let err = ctx.mutator.execute(transfer(dec!(40))).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::BalanceAdjustmentFailed(_))
        ));

        // Origin refunded, no rows survive.
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
        assert_eq!(ctx.wallets.balance_of("w-2"), dec!(10));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn failed_expense_adjust_leaves_no_trace() {
        let ctx = ctx();
        ctx.wallets.fail_adjust("w-1");

        // The wallet and the log both come back untouched.
        let err = ctx.mutator.execute(expense(dec!(30))).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::BalanceAdjustmentFailed(_))
        ));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn income_adjusts_up_and_commits_row() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(income(dec!(50))).await.unwrap();

        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(150));
        assert_eq!(entry.primary().transaction_type, TransactionType::Income);
        assert_eq!(entry.primary().amount, dec!(50));
        assert_eq!(ctx.transactions.row_count(), 1);
    }

    #[tokio::test]
    async fn expense_does_not_block_on_balance() {
        let ctx = ctx();
        ctx.mutator.execute(expense(dec!(130))).await.unwrap();
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(-30));
    }

    #[tokio::test]
    async fn transfer_requires_sufficient_origin_balance() {
        let ctx = ctx();
        let err = ctx.mutator.execute(transfer(dec!(200))).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ctx.transactions.row_count(), 0);
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
    }

    #[tokio::test]
    async fn transfer_between_currencies_converts_and_audits() {
        let ctx = ctx();
        ctx.wallets.add(wallet("w-usd", "USD", dec!(10)));
        ctx.fx.set_rate("EUR", "USD", dec!(1.10));

        let entry = ctx
            .mutator
            .execute(Intent::Transfer(TransferIntent {
                owner_id: "u-1".to_string(),
                origin_wallet_id: "w-1".to_string(),
                destination_wallet_id: "w-usd".to_string(),
                amount: dec!(40),
                date: date(),
                category_id: None,
                recurrence_id: None,
                notes: None,
            }))
            .await
            .unwrap();

        // Origin loses the original amount, destination gains the
        // converted amount.
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(60));
        assert_eq!(ctx.wallets.balance_of("w-usd"), dec!(54.00));

        let incoming = &entry.transactions[1];
        assert_eq!(incoming.amount, dec!(44.00));
        assert_eq!(incoming.currency, "USD");
        assert_eq!(incoming.exchange_rate, Some(dec!(1.10)));
        assert_eq!(incoming.original_amount, Some(dec!(40)));
        assert_eq!(incoming.original_currency, Some("EUR".to_string()));
        assert_eq!(incoming.converted_amount, Some(dec!(44.00)));
        assert_eq!(incoming.destination_currency, Some("USD".to_string()));

        let out = &entry.transactions[0];
        assert_eq!(out.amount, dec!(40));
        assert_eq!(out.currency, "EUR");
        assert_eq!(out.exchange_rate, None);
    }

    #[tokio::test]
    async fn conversion_failure_aborts_before_any_write() {
        let ctx = ctx();
        ctx.wallets.add(wallet("w-jpy", "JPY", dec!(0)));

        let err = ctx
            .mutator
            .execute(Intent::Transfer(TransferIntent {
                owner_id: "u-1".to_string(),
                origin_wallet_id: "w-1".to_string(),
                destination_wallet_id: "w-jpy".to_string(),
                amount: dec!(40),
                date: date(),
                category_id: None,
                recurrence_id: None,
                notes: None,
            }))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Ledger(LedgerError::CurrencyConversionFailed(_))
        ));
        assert_eq!(ctx.transactions.row_count(), 0);
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
    }

    #[tokio::test]
    async fn validation_rejects_bad_intents_before_reads() {
        let ctx = ctx();

        let err = ctx.mutator.execute(expense(dec!(0))).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidAmount(_))));

        let err = ctx
            .mutator
            .execute(Intent::Transfer(TransferIntent {
                owner_id: "u-1".to_string(),
                origin_wallet_id: "w-1".to_string(),
                destination_wallet_id: "w-1".to_string(),
                amount: dec!(10),
                date: date(),
                category_id: None,
                recurrence_id: None,
                notes: None,
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidTransfer(_))));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn foreign_and_archived_wallets_are_rejected() {
        let ctx = ctx();
        let mut foreign = wallet("w-other", "EUR", dec!(5));
        foreign.owner_id = "u-2".to_string();
        ctx.wallets.add(foreign);
        let mut archived = wallet("w-archived", "EUR", dec!(5));
        archived.is_active = false;
        ctx.wallets.add(archived);

        let mut intent = expense(dec!(10));
        if let Intent::SimpleEntry(ref mut simple) = intent {
            simple.wallet_id = "w-other".to_string();
        }
        let err = ctx.mutator.execute(intent).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::NotOwned(_))));

        let mut intent = expense(dec!(10));
        if let Intent::SimpleEntry(ref mut simple) = intent {
            simple.wallet_id = "w-archived".to_string();
        }
        let err = ctx.mutator.execute(intent).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::WalletInactive(_))));

        let mut intent = expense(dec!(10));
        if let Intent::SimpleEntry(ref mut simple) = intent {
            simple.wallet_id = "w-missing".to_string();
        }
        let err = ctx.mutator.execute(intent).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn inaccessible_category_is_rejected() {
        let ctx = ctx();
        ctx.categories.allow("cat-food");

        let mut intent = expense(dec!(10));
        if let Intent::SimpleEntry(ref mut simple) = intent {
            simple.category_id = Some("cat-private".to_string());
        }
        let err = ctx.mutator.execute(intent).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::CategoryInvalid(_))));

        let mut intent = expense(dec!(10));
        if let Intent::SimpleEntry(ref mut simple) = intent {
            simple.category_id = Some("cat-food".to_string());
        }
        ctx.mutator.execute(intent).await.unwrap();
    }

    #[tokio::test]
    async fn compensation_failure_surfaces_inconsistent() {
        let ctx = ctx();
        ctx.wallets.fail_adjust("w-1");
        ctx.transactions.fail_delete.store(true, Ordering::SeqCst);

        let err = ctx.mutator.execute(expense(dec!(30))).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::Inconsistent(_))));
    }

    // === goal top-ups ===

    #[tokio::test]
    async fn top_up_clamps_saved_to_goal() {
        let ctx = ctx();
        ctx.goals.add(goal("g-1", "EUR", dec!(100), dec!(90)));

        let entry = ctx.mutator.execute(top_up("g-1", dec!(25))).await.unwrap();

        // saved' = min(90 + 25, 100).
        assert_eq!(ctx.goals.saved_of("g-1"), dec!(100));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(75));

        let row = entry.primary();
        assert_eq!(row.transaction_type, TransactionType::Expense);
        assert_eq!(row.goal_id, Some("g-1".to_string()));
        assert_eq!(row.amount, dec!(25));
    }

    #[tokio::test]
    async fn top_up_reverts_saved_when_wallet_side_fails() {
        let ctx = ctx();
        ctx.goals.add(goal("g-1", "EUR", dec!(100), dec!(90)));
        ctx.wallets.fail_adjust("w-1");

        let err = ctx.mutator.execute(top_up("g-1", dec!(25))).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::BalanceAdjustmentFailed(_))
        ));

        // The saved amount reverts exactly, nothing else committed.
        assert_eq!(ctx.goals.saved_of("g-1"), dec!(90));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn top_up_requires_sufficient_wallet_balance() {
        let ctx = ctx();
        ctx.goals.add(goal("g-1", "EUR", dec!(1000), dec!(0)));

        let err = ctx
            .mutator
            .execute(top_up("g-1", dec!(150)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ctx.goals.saved_of("g-1"), dec!(0));
    }

    #[tokio::test]
    async fn top_up_converts_goal_currency_into_wallet_currency() {
        let ctx = ctx();
        ctx.goals.add(goal("g-usd", "USD", dec!(500), dec!(0)));
        ctx.fx.set_rate("USD", "EUR", dec!(0.90));

        let entry = ctx
            .mutator
            .execute(top_up("g-usd", dec!(50)))
            .await
            .unwrap();

        // Goal credited in USD, wallet charged in EUR.
        assert_eq!(ctx.goals.saved_of("g-usd"), dec!(50));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(55.00));
        let row = entry.primary();
        assert_eq!(row.amount, dec!(45.00));
        assert_eq!(row.original_amount, Some(dec!(50)));
        assert_eq!(row.original_currency, Some("USD".to_string()));
    }

    // === update / delete ===

    #[tokio::test]
    async fn update_amount_reapplies_the_delta() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(expense(dec!(30))).await.unwrap();
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(70));

        let updated = ctx
            .mutator
            .update_amount("u-1", &entry.primary().id, dec!(50))
            .await
            .unwrap();

        assert_eq!(updated.amount, dec!(50));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(50));
        assert_eq!(ctx.transactions.row_count(), 1);
    }

    #[tokio::test]
    async fn update_amount_failure_restores_previous_state() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(income(dec!(30))).await.unwrap();
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(130));

        ctx.wallets.fail_adjust("w-1");
        ctx.mutator
            .update_amount("u-1", &entry.primary().id, dec!(80))
            .await
            .unwrap_err();
        ctx.wallets.allow_adjust("w-1");

        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(130));
        assert_eq!(
            ctx.transactions.get_by_id(&entry.primary().id).unwrap().amount,
            dec!(30)
        );
    }

    #[tokio::test]
    async fn update_transfer_amount_moves_both_legs() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(transfer(dec!(40))).await.unwrap();
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(60));
        assert_eq!(ctx.wallets.balance_of("w-2"), dec!(50));

        ctx.mutator
            .update_amount("u-1", &entry.transactions[0].id, dec!(25))
            .await
            .unwrap();

        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(75));
        assert_eq!(ctx.wallets.balance_of("w-2"), dec!(35));
        let out = ctx.transactions.rows_of_type(TransactionType::TransferOut);
        let incoming = ctx.transactions.rows_of_type(TransactionType::TransferIn);
        assert_eq!(out[0].amount, dec!(25));
        assert_eq!(incoming[0].amount, dec!(25));
    }

    #[tokio::test]
    async fn update_refuses_goal_linked_rows() {
        let ctx = ctx();
        ctx.goals.add(goal("g-1", "EUR", dec!(100), dec!(0)));
        let entry = ctx.mutator.execute(top_up("g-1", dec!(20))).await.unwrap();

        let err = ctx
            .mutator
            .update_amount("u-1", &entry.primary().id, dec!(40))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::UnsupportedUpdate(_))
        ));
    }

    #[tokio::test]
    async fn delete_expense_restores_balance_and_removes_row() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(expense(dec!(30))).await.unwrap();
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(70));

        ctx.mutator
            .delete("u-1", &entry.primary().id)
            .await
            .unwrap();

        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn delete_transfer_removes_both_legs_and_refunds() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(transfer(dec!(40))).await.unwrap();

        ctx.mutator
            .delete("u-1", &entry.transactions[1].id)
            .await
            .unwrap();

        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
        assert_eq!(ctx.wallets.balance_of("w-2"), dec!(10));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn delete_top_up_refunds_goal_and_wallet() {
        let ctx = ctx();
        ctx.goals.add(goal("g-1", "EUR", dec!(100), dec!(10)));
        let entry = ctx.mutator.execute(top_up("g-1", dec!(20))).await.unwrap();
        assert_eq!(ctx.goals.saved_of("g-1"), dec!(30));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(80));

        ctx.mutator
            .delete("u-1", &entry.primary().id)
            .await
            .unwrap();

        assert_eq!(ctx.goals.saved_of("g-1"), dec!(10));
        assert_eq!(ctx.wallets.balance_of("w-1"), dec!(100));
        assert_eq!(ctx.transactions.row_count(), 0);
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let ctx = ctx();
        let entry = ctx.mutator.execute(expense(dec!(30))).await.unwrap();

        let err = ctx
            .mutator
            .delete("u-2", &entry.primary().id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::NotOwned(_))));
        assert_eq!(ctx.transactions.row_count(), 1);
    }
}
