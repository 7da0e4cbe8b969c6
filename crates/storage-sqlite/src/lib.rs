//! SQLite storage implementation for Moneta.
//!
//! This crate is the Ledger Store: it implements the repository traits
//! defined in `moneta-core` with Diesel over SQLite and is the only place
//! in the workspace where Diesel types appear. It provides:
//! - Connection pooling and per-connection pragmas
//! - Embedded Diesel migrations
//! - A single-writer actor that serializes all writes on one connection
//! - Repository implementations for every domain entity
//!
//! # The `adjust_balance` contract
//!
//! The core's ledger mutation protocol assumes `adjust_balance` is atomic
//! and serialized per wallet. Here that holds by construction: every write
//! job runs inside an `immediate_transaction` on the writer actor's sole
//! connection, so a read-compute-update job can never interleave with
//! another write.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod categories;
pub mod fx;
pub mod goals;
pub mod recurrences;
pub mod transactions;
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from moneta-core for convenience
pub use moneta_core::errors::{DatabaseError, Error, Result};
