use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the ledger mutation protocol.
///
/// Validation and conversion variants are rejected before any write;
/// `BalanceAdjustmentFailed` is raised after the transaction row exists and
/// triggers compensation; `Inconsistent` means compensation itself failed
/// and the ledger requires manual reconciliation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Wallet '{0}' is not owned by the caller")]
    NotOwned(String),

    #[error("Wallet '{0}' is archived")]
    WalletInactive(String),

    #[error("Insufficient balance in wallet '{wallet_id}': requested {requested}, available {available}")]
    InsufficientBalance {
        wallet_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Category is not accessible: {0}")]
    CategoryInvalid(String),

    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("Currency conversion failed: {0}")]
    CurrencyConversionFailed(String),

    #[error("Balance adjustment failed: {0}")]
    BalanceAdjustmentFailed(String),

    #[error("Unsupported ledger update: {0}")]
    UnsupportedUpdate(String),

    #[error("Ledger inconsistent, manual reconciliation required: {0}")]
    Inconsistent(String),
}
