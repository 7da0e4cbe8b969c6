use async_trait::async_trait;
use rust_decimal::Decimal;

use super::fx_model::{Conversion, ExchangeRate, NewExchangeRate};
use crate::Result;

/// Trait defining the contract for FX repository operations.
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    fn get_latest_rate(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>>;
    fn get_latest_rate_by_symbol(&self, symbol: &str) -> Result<Option<ExchangeRate>>;
    fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>>;
    async fn upsert_rate(&self, rate: ExchangeRate) -> Result<ExchangeRate>;
    async fn delete_rate(&self, rate_id: &str) -> Result<()>;
}

/// The conversion seam the ledger consumes.
///
/// Implementations fail with a descriptive error when a currency is
/// unsupported or no rate can be resolved; the ledger aborts before any
/// write in that case.
pub trait CurrencyGatewayTrait: Send + Sync {
    fn convert(&self, amount: Decimal, from_currency: &str, to_currency: &str)
        -> Result<Conversion>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: CurrencyGatewayTrait {
    fn get_latest_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal>;
    fn list_rates(&self) -> Result<Vec<ExchangeRate>>;
    async fn upsert_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate>;
    async fn delete_rate(&self, rate_id: &str) -> Result<()>;
}
