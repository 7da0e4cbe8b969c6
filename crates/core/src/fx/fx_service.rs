use async_trait::async_trait;
use chrono::Utc;
use log::error;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::fx_errors::FxError;
use super::fx_model::{Conversion, ExchangeRate, NewExchangeRate};
use super::fx_traits::{CurrencyGatewayTrait, FxRepositoryTrait, FxServiceTrait};
use crate::wallets::validate_currency_code;
use crate::Result;

/// Currency gateway backed by the stored exchange-rate table.
///
/// Resolution order: direct pair, then the inverse pair (reciprocal rate).
/// Rate synchronization with an external provider is outside this crate;
/// rates arrive through [`FxServiceTrait::upsert_rate`].
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn load_latest_rate(&self, from: &str, to: &str) -> Result<ExchangeRate> {
        if let Some(rate) = self.repository.get_latest_rate(from, to)? {
            return Ok(rate);
        }

        // Try the inverse pair.
        let inverse_symbol = ExchangeRate::make_fx_symbol(to, from);
        match self.repository.get_latest_rate_by_symbol(&inverse_symbol)? {
            Some(inverse) => {
                if inverse.rate.is_zero() {
                    return Err(FxError::InvalidRate(format!(
                        "Stored rate for {} is zero",
                        inverse_symbol
                    ))
                    .into());
                }
                Ok(ExchangeRate {
                    id: ExchangeRate::make_fx_symbol(from, to),
                    from_currency: from.to_string(),
                    to_currency: to.to_string(),
                    rate: Decimal::ONE / inverse.rate,
                    timestamp: inverse.timestamp,
                })
            }
            None => Err(FxError::RateNotFound(format!(
                "Exchange rate not found for {}/{}",
                from, to
            ))
            .into()),
        }
    }
}

impl CurrencyGatewayTrait for FxService {
    fn convert(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Conversion> {
        validate_currency_code(from_currency)
            .map_err(|_| FxError::InvalidCurrencyCode(from_currency.to_string()))?;
        validate_currency_code(to_currency)
            .map_err(|_| FxError::InvalidCurrencyCode(to_currency.to_string()))?;

        if from_currency == to_currency {
            return Ok(Conversion::identity(amount));
        }

        let rate = match self.load_latest_rate(from_currency, to_currency) {
            Ok(rate) => rate,
            Err(err) => {
                error!(
                    "Exchange rate not available for {}/{}",
                    from_currency, to_currency
                );
                return Err(err);
            }
        };

        Ok(Conversion {
            rate: rate.rate,
            converted_amount: amount * rate.rate,
        })
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn get_latest_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal> {
        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }
        Ok(self.load_latest_rate(from_currency, to_currency)?.rate)
    }

    fn list_rates(&self) -> Result<Vec<ExchangeRate>> {
        self.repository.list_latest_rates()
    }

    async fn upsert_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        validate_currency_code(&new_rate.from_currency)
            .map_err(|_| FxError::InvalidCurrencyCode(new_rate.from_currency.clone()))?;
        validate_currency_code(&new_rate.to_currency)
            .map_err(|_| FxError::InvalidCurrencyCode(new_rate.to_currency.clone()))?;
        if new_rate.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "Rate must be positive, got {}",
                new_rate.rate
            ))
            .into());
        }

        let rate = ExchangeRate {
            id: ExchangeRate::make_fx_symbol(&new_rate.from_currency, &new_rate.to_currency),
            from_currency: new_rate.from_currency,
            to_currency: new_rate.to_currency,
            rate: new_rate.rate,
            timestamp: Utc::now(),
        };
        self.repository.upsert_rate(rate).await
    }

    async fn delete_rate(&self, rate_id: &str) -> Result<()> {
        self.repository.delete_rate(rate_id).await
    }
}
