use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::prediction::ModelError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Engine(EngineError::NoViableCandidate { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::Engine(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Raised when the encoder cannot turn raw features into a model input
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("Unknown category {value:?} for feature {feature}")]
    UnknownCategory { feature: String, value: String },

    #[error("Feature {feature} expects a category label, got a number")]
    ExpectedCategory { feature: String },

    #[error("Feature {feature} expects a number, got {value:?}")]
    ExpectedNumber { feature: String, value: String },
}

/// Errors raised by the recommendation pipeline
///
/// `Encoding` and `Scoring` only ever remove a single candidate from
/// consideration; `NoViableCandidate` fails the request.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Encoding failed for {crop}: {source}")]
    Encoding {
        crop: String,
        #[source]
        source: EncodingError,
    },

    #[error("Scoring failed for {crop}: {reason}")]
    Scoring { crop: String, reason: String },

    #[error("No viable candidate crop: all {attempted} candidates failed to score")]
    NoViableCandidate { attempted: usize },
}

impl EngineError {
    pub fn model(crop: &str, error: ModelError) -> Self {
        EngineError::Scoring {
            crop: crop.to_string(),
            reason: error.to_string(),
        }
    }
}
