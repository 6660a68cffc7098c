use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

pub mod climate;
pub mod market;
pub mod recommendation;
pub mod soil;

pub use climate::ClimateProfile;
pub use market::MarketQuote;
pub use recommendation::{CandidateResult, Recommendation, RecommendationResponse};
pub use soil::{PartialSoilProfile, SoilProfile};

/// Geographic point in decimal degrees
///
/// Values are forwarded to providers as-is; out-of-range coordinates surface as
/// provider failures, not validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A single raw feature value, either a category label or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

/// Named raw features, keyed by the training column name
pub type FeatureMap = BTreeMap<String, FeatureValue>;

// ============================================================================
// Signal provenance
// ============================================================================

/// Outcome of aggregating one upstream signal
///
/// Aggregation never fails: a provider error is recorded here and the fixed
/// fallback profile is carried instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Aggregated<T> {
    /// Value supplied by the caller (manual soil override)
    Manual { profile: T },
    /// Value obtained from the provider
    Observed { profile: T },
    /// Provider failed; documented constants substituted
    Fallback { profile: T, reason: String },
}

impl<T> Aggregated<T> {
    pub fn profile(&self) -> &T {
        match self {
            Aggregated::Manual { profile }
            | Aggregated::Observed { profile }
            | Aggregated::Fallback { profile, .. } => profile,
        }
    }

    pub fn into_profile(self) -> T {
        match self {
            Aggregated::Manual { profile }
            | Aggregated::Observed { profile }
            | Aggregated::Fallback { profile, .. } => profile,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Aggregated::Fallback { .. })
    }

    pub fn source(&self) -> &'static str {
        match self {
            Aggregated::Manual { .. } => "manual",
            Aggregated::Observed { .. } => "observed",
            Aggregated::Fallback { .. } => "fallback",
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for the recommendation endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub use_custom_soil: bool,
    #[serde(default)]
    pub soil: Option<PartialSoilProfile>,
}

impl RecommendationRequest {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}

/// Query string for the signals endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SignalsQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// Aggregated signals for one location, with provenance
#[derive(Debug, Clone, Serialize)]
pub struct SignalsResponse {
    pub location: Location,
    pub soil: Aggregated<SoilProfile>,
    pub climate: Aggregated<ClimateProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_value_untagged_serialization() {
        let mut map = FeatureMap::new();
        map.insert("Crop_Type".to_string(), "Wheat".into());
        map.insert("ph".to_string(), 6.5.into());

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["Crop_Type"], "Wheat");
        assert_eq!(json["ph"], 6.5);
    }

    #[test]
    fn test_aggregated_serializes_source_tag() {
        let fallback = Aggregated::Fallback {
            profile: ClimateProfile::FALLBACK,
            reason: "timeout".to_string(),
        };

        let json = serde_json::to_value(&fallback).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["reason"], "timeout");
        assert_eq!(json["profile"]["avg_temp"], 25.0);
        assert!(fallback.is_fallback());
    }

    #[test]
    fn test_request_defaults() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"latitude": -6.2, "longitude": 106.8}"#).unwrap();

        assert_eq!(request.country, None);
        assert!(!request.use_custom_soil);
        assert!(request.soil.is_none());
        assert_eq!(request.location(), Location::new(-6.2, 106.8));
    }
}
