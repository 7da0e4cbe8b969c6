//! Moneta Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for the Moneta personal
//! finance ledger. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.
//!
//! The two load-bearing pieces are the ledger mutation protocol
//! ([`ledger::LedgerMutator`]), which keeps wallet balances and the
//! transaction log consistent without multi-statement database
//! transactions, and the recurrence scheduler/materializer
//! ([`recurrences`]), which turns recurrence templates into concrete
//! transactions exactly once per occurrence date.

pub mod categories;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod goals;
pub mod imports;
pub mod ledger;
pub mod recurrences;
pub mod transactions;
pub mod wallets;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
