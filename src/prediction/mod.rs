/// Yield prediction model and the artifacts it is loaded from
///
/// The model and categorical encoder are trained elsewhere and shipped as JSON
/// artifacts. Both are loaded once at startup, checked against each other, and
/// shared read-only across requests.
use std::path::Path;
use std::sync::Arc;

use crate::services::encoder::{FeatureEncoder, FeatureVector};

pub mod linear;
pub mod schema;

pub use linear::LinearYieldModel;
pub use schema::{FeatureSchema, FEATURE_SCHEMA_VERSION};

/// Trait for yield prediction models
///
/// Implementations must be deterministic for a fixed input vector.
pub trait YieldModel: Send + Sync {
    /// Predicts yield (mass per unit area) for one encoded candidate
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Input layout the model was trained against
    fn schema(&self) -> &FeatureSchema;
}

/// Failure of a single prediction
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Prediction is not a finite number")]
    NonFinite,
}

/// Failure loading or reconciling artifacts; fatal at startup
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("Encoder and model disagree on feature schema: {0}")]
    SchemaMismatch(String),
}

/// Encoder and model, verified to agree on the feature schema
#[derive(Clone)]
pub struct Artifacts {
    pub encoder: Arc<FeatureEncoder>,
    pub model: Arc<dyn YieldModel>,
}

impl Artifacts {
    pub fn new(encoder: FeatureEncoder, model: Arc<dyn YieldModel>) -> Result<Self, ArtifactError> {
        if model.schema().version != FEATURE_SCHEMA_VERSION {
            return Err(ArtifactError::SchemaMismatch(format!(
                "artifacts use schema version {}, this build expects {}",
                model.schema().version,
                FEATURE_SCHEMA_VERSION
            )));
        }
        encoder.schema().ensure_matches(model.schema())?;
        Ok(Self {
            encoder: Arc::new(encoder),
            model,
        })
    }

    /// Loads both artifacts from disk and checks their schemas agree
    pub fn load(
        encoder_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactError> {
        let encoder = FeatureEncoder::load(encoder_path)?;
        let model = LinearYieldModel::load(model_path)?;

        tracing::info!(
            schema_version = model.schema().version,
            features = model.schema().len(),
            "Loaded prediction artifacts"
        );

        Self::new(encoder, Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODER: &str = r#"{
        "schema_version": 1,
        "columns": [
            {"name": "Crop_Type", "categories": ["Wheat"]},
            {"name": "Soil_Type", "categories": ["Loamy"]}
        ]
    }"#;

    fn model_with(names: &[&str]) -> Arc<dyn YieldModel> {
        let schema = FeatureSchema::new(1, names.iter().map(|n| n.to_string()).collect());
        let coefficients = vec![0.0; names.len()];
        Arc::new(LinearYieldModel::new(schema, coefficients, 0.0).unwrap())
    }

    #[test]
    fn test_matching_artifacts_load() {
        let encoder = FeatureEncoder::from_json(ENCODER).unwrap();
        let names: Vec<String> = encoder.schema().feature_names.clone();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        assert!(Artifacts::new(encoder, model_with(&refs)).is_ok());
    }

    #[test]
    fn test_mismatched_artifacts_are_fatal() {
        let encoder = FeatureEncoder::from_json(ENCODER).unwrap();
        let result = Artifacts::new(encoder, model_with(&["ph", "temperature"]));

        assert!(matches!(result, Err(ArtifactError::SchemaMismatch(_))));
    }

    #[test]
    fn test_unsupported_schema_version_is_fatal() {
        let encoder = FeatureEncoder::from_json(
            r#"{
                "schema_version": 7,
                "columns": [
                    {"name": "Crop_Type", "categories": ["Wheat"]},
                    {"name": "Soil_Type", "categories": ["Loamy"]}
                ]
            }"#,
        )
        .unwrap();
        let schema = encoder.schema().clone();
        let coefficients = vec![0.0; schema.len()];
        let model: Arc<dyn YieldModel> =
            Arc::new(LinearYieldModel::new(schema, coefficients, 0.0).unwrap());

        let result = Artifacts::new(encoder, model);

        match result {
            Err(ArtifactError::SchemaMismatch(msg)) => assert!(msg.contains("version 7")),
            _ => panic!("expected schema version mismatch"),
        }
    }

    #[test]
    fn test_bundled_artifacts_agree() {
        let root = env!("CARGO_MANIFEST_DIR");
        let artifacts = Artifacts::load(
            format!("{}/artifacts/encoder.json", root),
            format!("{}/artifacts/yield_model.json", root),
        );

        assert!(artifacts.is_ok());
    }
}
