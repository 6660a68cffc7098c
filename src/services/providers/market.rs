/// Static market price provider
///
/// Serves prices from an in-memory table keyed by country, then crop. Any pair
/// missing from the table gets [`MarketQuote::DEFAULT`], so lookups never fail.
use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::MarketQuote,
    services::providers::MarketProvider,
};

const PROVIDER_NAME: &str = "static_market";

/// Country → crop → quote
pub type PriceTable = HashMap<String, HashMap<String, MarketQuote>>;

#[derive(Debug, Clone)]
pub struct StaticMarketProvider {
    prices: PriceTable,
    default_quote: MarketQuote,
}

impl StaticMarketProvider {
    pub fn new(prices: PriceTable) -> Self {
        // Crop keys are matched case-insensitively
        let prices = prices
            .into_iter()
            .map(|(country, crops)| {
                let crops = crops
                    .into_iter()
                    .map(|(crop, quote)| (crop.to_lowercase(), quote))
                    .collect();
                (country, crops)
            })
            .collect();

        Self {
            prices,
            default_quote: MarketQuote::DEFAULT,
        }
    }

    /// Built-in table (USD/ton)
    pub fn builtin() -> Self {
        let table = [
            (
                "India",
                [
                    ("wheat", MarketQuote::new(230.0, 0.12, 0.25)),
                    ("rice", MarketQuote::new(310.0, 0.15, 0.30)),
                ],
            ),
            (
                "Australia",
                [
                    ("wheat", MarketQuote::new(280.0, 0.08, 0.60)),
                    ("rice", MarketQuote::new(350.0, 0.18, 0.20)),
                ],
            ),
        ];

        let prices = table
            .into_iter()
            .map(|(country, crops)| {
                let crops = crops
                    .into_iter()
                    .map(|(crop, quote)| (crop.to_string(), quote))
                    .collect();
                (country.to_string(), crops)
            })
            .collect();

        Self::new(prices)
    }

    /// Loads a price table from a JSON file shaped like `{"India": {"wheat": {"price": 230}}}`
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!(
                "Failed to read price table {}: {}",
                path.display(),
                e
            ))
        })?;
        let prices: PriceTable = serde_json::from_str(&json)
            .map_err(|e| AppError::Internal(format!("Malformed price table: {}", e)))?;

        tracing::info!(
            path = %path.display(),
            countries = prices.len(),
            "Loaded market price table"
        );

        Ok(Self::new(prices))
    }

    /// Synchronous lookup behind [`MarketProvider::get_price`]
    pub fn quote(&self, crop: &str, country: &str) -> MarketQuote {
        self.prices
            .get(country)
            .and_then(|crops| crops.get(&crop.to_lowercase()))
            .copied()
            .unwrap_or(self.default_quote)
    }
}

impl Default for StaticMarketProvider {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait::async_trait]
impl MarketProvider for StaticMarketProvider {
    async fn get_price(&self, crop: &str, country: &str) -> AppResult<MarketQuote> {
        let quote = self.quote(crop, country);
        tracing::debug!(
            crop = %crop,
            country = %country,
            price = quote.price,
            "Market quote resolved"
        );
        Ok(quote)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_known_pair() {
        let provider = StaticMarketProvider::builtin();

        let quote = provider.quote("rice", "Australia");
        assert_eq!(quote.price, 350.0);
        assert_eq!(quote.volatility, 0.18);
        assert_eq!(quote.export_ratio, 0.20);
    }

    #[test]
    fn test_unknown_crop_or_country_gets_default() {
        let provider = StaticMarketProvider::builtin();

        assert_eq!(provider.quote("maize", "India"), MarketQuote::DEFAULT);
        assert_eq!(provider.quote("wheat", "Brazil"), MarketQuote::DEFAULT);
    }

    #[test]
    fn test_crop_lookup_is_case_insensitive() {
        let provider = StaticMarketProvider::builtin();
        assert_eq!(provider.quote("Wheat", "India").price, 230.0);
    }

    #[test]
    fn test_table_from_json_defaults_missing_fields() {
        let prices: PriceTable =
            serde_json::from_str(r#"{"Kenya": {"Maize": {"price": 190.5}}}"#).unwrap();
        let provider = StaticMarketProvider::new(prices);

        let quote = provider.quote("maize", "Kenya");
        assert_eq!(quote.price, 190.5);
        assert_eq!(quote.volatility, 0.0);
    }

    #[tokio::test]
    async fn test_get_price_never_fails() {
        let provider = StaticMarketProvider::default();
        let quote = provider.get_price("barley", "Atlantis").await;
        tokio_test::assert_ok!(quote);
    }
}
