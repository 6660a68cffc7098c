use serde::Deserialize;
use std::path::Path;

use super::{ArtifactError, FeatureSchema, ModelError, YieldModel};
use crate::services::encoder::FeatureVector;

/// On-disk layout of a linear yield model
#[derive(Debug, Clone, Deserialize)]
struct LinearModelArtifact {
    schema_version: u32,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Linear regression over the encoded feature vector
///
/// Predictions are clamped at zero since yield cannot be negative.
#[derive(Debug, Clone)]
pub struct LinearYieldModel {
    schema: FeatureSchema,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearYieldModel {
    pub fn new(
        schema: FeatureSchema,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ArtifactError> {
        if schema.len() != coefficients.len() {
            return Err(ArtifactError::Invalid(format!(
                "model declares {} features but {} coefficients",
                schema.len(),
                coefficients.len()
            )));
        }

        if let Some(bad) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid(format!(
                "coefficient for {} is not finite",
                schema.feature_names[bad]
            )));
        }

        Ok(Self {
            schema,
            coefficients,
            intercept,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: LinearModelArtifact = serde_json::from_str(json)?;
        Self::new(
            FeatureSchema::new(artifact.schema_version, artifact.feature_names),
            artifact.coefficients,
            artifact.intercept,
        )
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl YieldModel for LinearYieldModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let values = features.as_slice();
        if values.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: values.len(),
            });
        }

        let raw = self
            .coefficients
            .iter()
            .zip(values)
            .fold(self.intercept, |acc, (c, x)| acc + c * x);

        if !raw.is_finite() {
            return Err(ModelError::NonFinite);
        }

        Ok(raw.max(0.0))
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearYieldModel {
        LinearYieldModel::from_json(
            r#"{
                "schema_version": 1,
                "feature_names": ["a", "b"],
                "coefficients": [0.5, -2.0],
                "intercept": 1.0
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_predict_dot_product_plus_intercept() {
        let prediction = model().predict(&FeatureVector::new(vec![2.0, 0.25])).unwrap();
        assert_eq!(prediction, 1.5);
    }

    #[test]
    fn test_negative_prediction_is_clamped() {
        let prediction = model().predict(&FeatureVector::new(vec![0.0, 3.0])).unwrap();
        assert_eq!(prediction, 0.0);
    }

    #[test]
    fn test_wrong_vector_length_fails() {
        let result = model().predict(&FeatureVector::new(vec![1.0]));
        assert!(matches!(
            result,
            Err(ModelError::ShapeMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_non_finite_input_fails() {
        let result = model().predict(&FeatureVector::new(vec![f64::NAN, 1.0]));
        assert!(matches!(result, Err(ModelError::NonFinite)));
    }

    #[test]
    fn test_coefficient_count_must_match_features() {
        let result = LinearYieldModel::from_json(
            r#"{"schema_version": 1, "feature_names": ["a"], "coefficients": [1.0, 2.0], "intercept": 0.0}"#,
        );
        assert!(matches!(result, Err(ArtifactError::Invalid(_))));
    }
}
