//! Result types of the ledger mutation protocol.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::Transaction;

/// A signed balance delta applied to one wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    pub wallet_id: String,
    pub delta: Decimal,
}

/// The committed outcome of one executed intent: the transaction row(s)
/// written and the balance deltas applied, in write order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub transactions: Vec<Transaction>,
    pub balance_changes: Vec<BalanceChange>,
}

impl LedgerEntry {
    /// The row a single-transaction intent committed; the out leg for
    /// transfers.
    pub fn primary(&self) -> &Transaction {
        &self.transactions[0]
    }
}
