use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::model::WalletDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::wallets;
use crate::utils::{decimal_to_text, now, parse_decimal, parse_optional_decimal};
use moneta_core::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletUpdate};
use moneta_core::Result;

/// Repository for managing wallet data in the database.
pub struct WalletRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl WalletRepository {
    /// Creates a new WalletRepository instance.
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    fn get_by_id(&self, wallet_id: &str) -> Result<Wallet> {
        let mut conn = get_connection(&self.pool)?;
        let wallet_db = wallets::table
            .find(wallet_id)
            .select(WalletDB::as_select())
            .first::<WalletDB>(&mut conn)
            .into_core()?;
        Wallet::try_from(wallet_db)
    }

    fn list(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Wallet>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = wallets::table
            .filter(wallets::owner_id.eq(owner_id))
            .into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(wallets::is_active.eq(active));
        }

        let results = query
            .select(WalletDB::as_select())
            .order((wallets::is_active.desc(), wallets::name.asc()))
            .load::<WalletDB>(&mut conn)
            .into_core()?;

        results.into_iter().map(Wallet::try_from).collect()
    }

    async fn create(&self, new_wallet: NewWallet) -> Result<Wallet> {
        new_wallet.validate()?;
        let id = new_wallet
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.writer
            .exec(move |conn| {
                let wallet_db = WalletDB::from_new(new_wallet, id);
                diesel::insert_into(wallets::table)
                    .values(&wallet_db)
                    .execute(conn)
                    .into_core()?;
                Wallet::try_from(wallet_db)
            })
            .await
    }

    async fn update(&self, wallet_update: WalletUpdate) -> Result<Wallet> {
        wallet_update.validate()?;

        self.writer
            .exec(move |conn| {
                diesel::update(wallets::table.find(&wallet_update.id))
                    .set((
                        wallets::name.eq(&wallet_update.name),
                        wallets::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;
                let wallet_db = wallets::table
                    .find(&wallet_update.id)
                    .select(WalletDB::as_select())
                    .first::<WalletDB>(conn)
                    .into_core()?;
                Wallet::try_from(wallet_db)
            })
            .await
    }

    async fn set_active(&self, wallet_id: &str, active: bool) -> Result<Wallet> {
        let wallet_id = wallet_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(wallets::table.find(&wallet_id))
                    .set((
                        wallets::is_active.eq(active),
                        wallets::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;
                let wallet_db = wallets::table
                    .find(&wallet_id)
                    .select(WalletDB::as_select())
                    .first::<WalletDB>(conn)
                    .into_core()?;
                Wallet::try_from(wallet_db)
            })
            .await
    }

    /// Atomic, serialized balance increment.
    ///
    /// The read-compute-update below is safe because the writer actor runs
    /// it inside an immediate transaction on the only writing connection:
    /// no other write can interleave between the read and the update.
    async fn adjust_balance(&self, wallet_id: &str, delta: Decimal) -> Result<Wallet> {
        let wallet_id = wallet_id.to_string();
        self.writer
            .exec(move |conn| {
                let wallet_db = wallets::table
                    .find(&wallet_id)
                    .select(WalletDB::as_select())
                    .first::<WalletDB>(conn)
                    .into_core()?;

                let current = parse_optional_decimal(wallet_db.balance.as_deref())?
                    .unwrap_or(parse_decimal(&wallet_db.initial_balance)?);
                let next = current + delta;

                diesel::update(wallets::table.find(&wallet_id))
                    .set((
                        wallets::balance.eq(decimal_to_text(next)),
                        wallets::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;

                let wallet_db = wallets::table
                    .find(&wallet_id)
                    .select(WalletDB::as_select())
                    .first::<WalletDB>(conn)
                    .into_core()?;
                Wallet::try_from(wallet_db)
            })
            .await
    }
}
