use serde::{Deserialize, Serialize};

/// Market conditions for one crop in one country
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Price per unit mass
    pub price: f64,
    #[serde(default)]
    pub volatility: f64,
    /// Share of production that is exported
    #[serde(default)]
    pub export_ratio: f64,
}

impl MarketQuote {
    /// Quote returned for any crop/country pair missing from the price table
    pub const DEFAULT: MarketQuote = MarketQuote {
        price: 250.0,
        volatility: 0.10,
        export_ratio: 0.20,
    };

    pub fn new(price: f64, volatility: f64, export_ratio: f64) -> Self {
        Self {
            price,
            volatility,
            export_ratio,
        }
    }
}
