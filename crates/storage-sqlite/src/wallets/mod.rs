//! SQLite storage implementation for wallets.

mod model;
mod repository;

pub use model::WalletDB;
pub use repository::WalletRepository;
