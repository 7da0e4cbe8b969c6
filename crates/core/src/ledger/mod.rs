//! Ledger module - the mutation protocol that keeps wallet balances and
//! the transaction log consistent without multi-statement transactions.

mod intent;
mod ledger_errors;
mod ledger_model;
mod ledger_mutator;
mod saga;

#[cfg(test)]
mod ledger_mutator_tests;

pub use intent::{EntryType, GoalTopUpIntent, Intent, SimpleEntryIntent, TransferIntent};
pub use ledger_errors::LedgerError;
pub use ledger_model::{BalanceChange, LedgerEntry};
pub use ledger_mutator::{LedgerMutator, LedgerMutatorTrait};
pub use saga::Saga;
