//! Transactions module - the ledger's row model and query surface.

mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_model::{
    NewTransaction, Transaction, TransactionFilter, TransactionType,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
