use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::transactions;
use moneta_core::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionRepositoryTrait,
};
use moneta_core::Result;

/// Repository for the transaction log.
///
/// Each method is a single-row (or single-statement) operation; the ledger
/// mutation protocol in `moneta-core` composes them into consistent
/// multi-write operations.
pub struct TransactionRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository instance.
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let transaction_db = transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .into_core()?;
        Transaction::try_from(transaction_db)
    }

    fn get_by_transfer_group(&self, transfer_group_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        // TRANSFER_OUT sorts after TRANSFER_IN; descending puts the out
        // leg first, which is the order callers expect.
        let results = transactions::table
            .filter(transactions::transfer_group_id.eq(transfer_group_id))
            .select(TransactionDB::as_select())
            .order(transactions::transaction_type.desc())
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        results.into_iter().map(Transaction::try_from).collect()
    }

    fn search(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .filter(transactions::owner_id.eq(&filter.owner_id))
            .into_boxed();

        if let Some(ref wallet_ids) = filter.wallet_ids {
            query = query.filter(transactions::wallet_id.eq_any(wallet_ids));
        }
        if let Some(ref types) = filter.transaction_types {
            let type_names: Vec<&'static str> = types.iter().map(|t| t.as_str()).collect();
            query = query.filter(transactions::transaction_type.eq_any(type_names));
        }
        if let Some(ref category_id) = filter.category_id {
            query = query.filter(transactions::category_id.eq(category_id));
        }
        if let Some(ref recurrence_id) = filter.recurrence_id {
            query = query.filter(transactions::recurrence_id.eq(recurrence_id));
        }
        if let Some(ref goal_id) = filter.goal_id {
            query = query.filter(transactions::goal_id.eq(goal_id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::transaction_date.ge(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::transaction_date.le(date_to));
        }

        let results = query
            .select(TransactionDB::as_select())
            .order((
                transactions::transaction_date.desc(),
                transactions::created_at.desc(),
            ))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        results.into_iter().map(Transaction::try_from).collect()
    }

    fn get_recurrence_dates(&self, recurrence_id: &str) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::recurrence_id.eq(recurrence_id))
            .select(transactions::transaction_date)
            .distinct()
            .load::<NaiveDate>(&mut conn)
            .into_core()
    }

    fn count_for_recurrence(&self, recurrence_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::recurrence_id.eq(recurrence_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;
        let id = new_transaction
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.writer
            .exec(move |conn| {
                let transaction_db = TransactionDB::from_new(new_transaction, id);
                diesel::insert_into(transactions::table)
                    .values(&transaction_db)
                    .execute(conn)
                    .into_core()?;
                Transaction::try_from(transaction_db)
            })
            .await
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn| {
                let transaction_db = TransactionDB::from_domain(&transaction);
                diesel::update(transactions::table.find(&transaction_db.id))
                    .set(&transaction_db)
                    .execute(conn)
                    .into_core()?;
                Transaction::try_from(transaction_db)
            })
            .await
    }

    async fn delete(&self, transaction_id: &str) -> Result<()> {
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(transactions::table.find(&transaction_id))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
