use std::sync::Arc;

use crate::{
    error::EngineError,
    models::{CandidateResult, ClimateProfile, FeatureMap, FeatureValue, SoilProfile},
    prediction::YieldModel,
    services::{
        encoder::{FeatureEncoder, CROP_TYPE, SOIL_TYPE},
        providers::MarketProvider,
    },
};

/// Soil type tag sent with every candidate
pub const SOIL_TYPE_TAG: &str = "Loamy";

/// Encoder category for a candidate crop (`wheat` → `Wheat`)
///
/// Each candidate carries its own tag rather than one fixed `Wheat` tag, so the
/// model can predict a different yield per crop.
pub fn crop_type_tag(crop: &str) -> String {
    let mut chars = crop.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Raw model inputs for one candidate
pub fn build_features(crop: &str, soil: SoilProfile, climate: ClimateProfile) -> FeatureMap {
    let mut features = FeatureMap::new();
    features.insert(CROP_TYPE.to_string(), crop_type_tag(crop).into());
    features.insert(SOIL_TYPE.to_string(), SOIL_TYPE_TAG.into());
    features.insert("ph".to_string(), soil.ph.into());
    features.insert("temperature".to_string(), climate.avg_temp.into());
    features.insert("humidity".to_string(), climate.humidity.into());
    features.insert("windspeed".to_string(), climate.windspeed.into());
    features.insert("N".to_string(), soil.nitrogen.into());
    features.insert("P".to_string(), soil.phosphorus.into());
    features.insert("K".to_string(), soil.potassium.into());
    features.insert(
        "soil_quality_index".to_string(),
        soil.soil_quality_index.into(),
    );
    features
}

/// Scores one candidate crop: expected yield times market price
#[derive(Clone)]
pub struct CandidateScorer {
    encoder: Arc<FeatureEncoder>,
    model: Arc<dyn YieldModel>,
    market: Arc<dyn MarketProvider>,
}

impl CandidateScorer {
    pub fn new(
        encoder: Arc<FeatureEncoder>,
        model: Arc<dyn YieldModel>,
        market: Arc<dyn MarketProvider>,
    ) -> Self {
        Self {
            encoder,
            model,
            market,
        }
    }

    /// Computes `revenue = predicted_yield * price` for `crop`
    ///
    /// A non-positive price is not an error; it yields non-positive revenue.
    pub async fn score(
        &self,
        crop: &str,
        country: &str,
        soil: SoilProfile,
        climate: ClimateProfile,
    ) -> Result<CandidateResult, EngineError> {
        let quote = self
            .market
            .get_price(crop, country)
            .await
            .map_err(|e| EngineError::Scoring {
                crop: crop.to_string(),
                reason: format!("market provider {} failed: {}", self.market.name(), e),
            })?;

        let mut details = build_features(crop, soil, climate);

        let vector = self
            .encoder
            .encode(&details)
            .map_err(|source| EngineError::Encoding {
                crop: crop.to_string(),
                source,
            })?;

        let predicted_yield = self
            .model
            .predict(&vector)
            .map_err(|e| EngineError::model(crop, e))?;

        let revenue = predicted_yield * quote.price;

        if quote.price <= 0.0 {
            tracing::warn!(crop = %crop, country = %country, price = quote.price, "Non-positive market price");
        }

        tracing::debug!(
            crop = %crop,
            predicted_yield,
            price = quote.price,
            revenue,
            "Candidate scored"
        );

        details.insert("price".to_string(), FeatureValue::Number(quote.price));

        Ok(CandidateResult {
            crop: crop.to_string(),
            predicted_yield,
            revenue,
            details,
        })
    }
}
