//! Tests for the stored-rate currency gateway.

#[cfg(test)]
mod tests {
    use crate::fx::{
        CurrencyGatewayTrait, ExchangeRate, FxRepositoryTrait, FxService, FxServiceTrait,
        NewExchangeRate,
    };
    use crate::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockFxRepository {
        rates: Mutex<Vec<ExchangeRate>>,
    }

    impl MockFxRepository {
        fn with_rate(from: &str, to: &str, rate: rust_decimal::Decimal) -> Self {
            let repo = Self::default();
            repo.rates.lock().unwrap().push(ExchangeRate {
                id: ExchangeRate::make_fx_symbol(from, to),
                from_currency: from.to_string(),
                to_currency: to.to_string(),
                rate,
                timestamp: Utc::now(),
            });
            repo
        }
    }

    #[async_trait]
    impl FxRepositoryTrait for MockFxRepository {
        fn get_latest_rate(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>> {
            let symbol = ExchangeRate::make_fx_symbol(from, to);
            self.get_latest_rate_by_symbol(&symbol)
        }

        fn get_latest_rate_by_symbol(&self, symbol: &str) -> Result<Option<ExchangeRate>> {
            Ok(self
                .rates
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == symbol)
                .cloned())
        }

        fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>> {
            Ok(self.rates.lock().unwrap().clone())
        }

        async fn upsert_rate(&self, rate: ExchangeRate) -> Result<ExchangeRate> {
            let mut rates = self.rates.lock().unwrap();
            rates.retain(|r| r.id != rate.id);
            rates.push(rate.clone());
            Ok(rate)
        }

        async fn delete_rate(&self, rate_id: &str) -> Result<()> {
            self.rates.lock().unwrap().retain(|r| r.id != rate_id);
            Ok(())
        }
    }

    #[test]
    fn convert_same_currency_is_identity() {
        let service = FxService::new(Arc::new(MockFxRepository::default()));
        let conversion = service.convert(dec!(25), "EUR", "EUR").unwrap();
        assert_eq!(conversion.rate, dec!(1));
        assert_eq!(conversion.converted_amount, dec!(25));
    }

    #[test]
    fn convert_uses_direct_rate() {
        let repo = MockFxRepository::with_rate("EUR", "USD", dec!(1.10));
        let service = FxService::new(Arc::new(repo));
        let conversion = service.convert(dec!(40), "EUR", "USD").unwrap();
        assert_eq!(conversion.rate, dec!(1.10));
        assert_eq!(conversion.converted_amount, dec!(44.00));
    }

    #[test]
    fn convert_falls_back_to_inverse_rate() {
        let repo = MockFxRepository::with_rate("USD", "EUR", dec!(0.5));
        let service = FxService::new(Arc::new(repo));
        let conversion = service.convert(dec!(10), "EUR", "USD").unwrap();
        assert_eq!(conversion.rate, dec!(2));
        assert_eq!(conversion.converted_amount, dec!(20));
    }

    #[test]
    fn convert_fails_when_no_rate_is_stored() {
        let service = FxService::new(Arc::new(MockFxRepository::default()));
        assert!(service.convert(dec!(10), "EUR", "JPY").is_err());
    }

    #[test]
    fn convert_rejects_malformed_currency_codes() {
        let service = FxService::new(Arc::new(MockFxRepository::default()));
        assert!(service.convert(dec!(10), "EURO", "USD").is_err());
        assert!(service.convert(dec!(10), "EUR", "U$").is_err());
    }

    #[tokio::test]
    async fn upsert_rejects_non_positive_rates() {
        let service = FxService::new(Arc::new(MockFxRepository::default()));
        let result = service
            .upsert_rate(NewExchangeRate {
                from_currency: "EUR".to_string(),
                to_currency: "USD".to_string(),
                rate: dec!(0),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn upsert_then_convert_round_trips() {
        let service = FxService::new(Arc::new(MockFxRepository::default()));
        service
            .upsert_rate(NewExchangeRate {
                from_currency: "EUR".to_string(),
                to_currency: "CHF".to_string(),
                rate: dec!(0.95),
            })
            .await
            .unwrap();
        let conversion = service.convert(dec!(100), "EUR", "CHF").unwrap();
        assert_eq!(conversion.converted_amount, dec!(95.00));
    }
}
