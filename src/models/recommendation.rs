use serde::Serialize;

use super::FeatureMap;

/// Outcome of scoring one candidate crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub crop: String,
    pub predicted_yield: f64,
    /// `predicted_yield * price`, never clamped
    pub revenue: f64,
    /// Raw features fed to the encoder, plus `price`
    pub details: FeatureMap,
}

/// The revenue-maximizing candidate for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub recommended_crop: String,
    pub expected_yield: f64,
    pub expected_revenue: f64,
    pub details: FeatureMap,
}

impl From<CandidateResult> for Recommendation {
    fn from(candidate: CandidateResult) -> Self {
        Self {
            recommended_crop: candidate.crop,
            expected_yield: candidate.predicted_yield,
            expected_revenue: candidate.revenue,
            details: candidate.details,
        }
    }
}

/// Wire format returned to HTTP callers
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub recommended_crop: String,
    pub expected_yield_kg_per_m2: f64,
    pub expected_revenue_per_m2: f64,
    pub details: FeatureMap,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            recommended_crop: recommendation.recommended_crop,
            expected_yield_kg_per_m2: round3(recommendation.expected_yield),
            expected_revenue_per_m2: round3(recommendation.expected_revenue),
            details: recommendation.details,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_rounds_to_three_decimals() {
        let recommendation = Recommendation {
            recommended_crop: "rice".to_string(),
            expected_yield: 0.123456,
            expected_revenue: 38.271_36,
            details: FeatureMap::new(),
        };

        let response = RecommendationResponse::from(recommendation);

        assert_eq!(response.recommended_crop, "rice");
        assert_eq!(response.expected_yield_kg_per_m2, 0.123);
        assert_eq!(response.expected_revenue_per_m2, 38.271);
    }
}
