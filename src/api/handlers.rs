use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        Location, RecommendationRequest, RecommendationResponse, SignalsQuery, SignalsResponse,
    },
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommend the revenue-maximizing crop for a location
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let country = state.resolve_country(request.country.as_deref());

    let manual_soil = if request.use_custom_soil {
        let soil = request.soil.as_ref().ok_or_else(|| {
            AppError::InvalidInput("use_custom_soil is set but no soil was supplied".to_string())
        })?;
        Some(soil)
    } else {
        None
    };

    tracing::info!(
        request_id = %request_id,
        location = %request.location(),
        country = %country,
        custom_soil = request.use_custom_soil,
        "Processing recommendation request"
    );

    let recommendation = state
        .engine
        .recommend(request.location(), country, manual_soil)
        .await?;

    Ok(Json(RecommendationResponse::from(recommendation)))
}

/// Aggregated soil and climate signals for a location
pub async fn signals(
    State(state): State<AppState>,
    Query(query): Query<SignalsQuery>,
) -> Json<SignalsResponse> {
    let location = Location::new(query.latitude, query.longitude);
    let (soil, climate) = state.engine.signals(location).await;

    Json(SignalsResponse {
        location,
        soil,
        climate,
    })
}

/// Candidate crops in tie-break order
pub async fn candidates(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.candidates().to_vec())
}
