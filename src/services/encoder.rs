use serde::Deserialize;
use std::path::Path;

use crate::{
    error::EncodingError,
    models::{FeatureMap, FeatureValue},
    prediction::{ArtifactError, FeatureSchema},
};

pub const CROP_TYPE: &str = "Crop_Type";
pub const SOIL_TYPE: &str = "Soil_Type";

/// Categorical columns, in the order their one-hot blocks are emitted
pub const CATEGORICAL_FEATURES: [&str; 2] = [CROP_TYPE, SOIL_TYPE];

/// Numeric columns, in the order they follow the categorical block
pub const NUMERIC_FEATURE_ORDER: [&str; 8] = [
    "ph",
    "temperature",
    "humidity",
    "windspeed",
    "N",
    "P",
    "K",
    "soil_quality_index",
];

const DEFAULT_CROP_TYPE: &str = "Wheat";
const DEFAULT_SOIL_TYPE: &str = "Loamy";

fn categorical_default(feature: &str) -> &'static str {
    match feature {
        CROP_TYPE => DEFAULT_CROP_TYPE,
        _ => DEFAULT_SOIL_TYPE,
    }
}

fn numeric_default(feature: &str) -> f64 {
    match feature {
        "ph" => 6.5,
        "temperature" => 25.0,
        "humidity" => 60.0,
        "windspeed" => 5.0,
        "N" | "P" | "K" => 50.0,
        "soil_quality_index" => 20.0,
        _ => 0.0,
    }
}

/// Encoded model input, laid out per the encoder's [`FeatureSchema`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How to encode a category the encoder was not fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Emit an all-zero block
    Ignore,
}

#[derive(Debug, Clone, Deserialize)]
struct CategoricalColumn {
    name: String,
    categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EncoderArtifact {
    schema_version: u32,
    columns: Vec<CategoricalColumn>,
    #[serde(default)]
    handle_unknown: HandleUnknown,
}

/// One-hot encoder for categorical columns followed by the fixed numeric block
///
/// The output layout is computed once when the artifact is loaded; every call
/// to [`FeatureEncoder::encode`] produces a vector of the same length and order.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    columns: Vec<CategoricalColumn>,
    handle_unknown: HandleUnknown,
    schema: FeatureSchema,
}

impl FeatureEncoder {
    fn from_artifact(artifact: EncoderArtifact) -> Result<Self, ArtifactError> {
        let names: Vec<&str> = artifact.columns.iter().map(|c| c.name.as_str()).collect();
        if names != CATEGORICAL_FEATURES {
            return Err(ArtifactError::Invalid(format!(
                "encoder columns {:?}, expected {:?}",
                names, CATEGORICAL_FEATURES
            )));
        }

        if let Some(empty) = artifact.columns.iter().find(|c| c.categories.is_empty()) {
            return Err(ArtifactError::Invalid(format!(
                "encoder column {} has no categories",
                empty.name
            )));
        }

        let feature_names = artifact
            .columns
            .iter()
            .flat_map(|column| {
                column
                    .categories
                    .iter()
                    .map(move |category| format!("{}={}", column.name, category))
            })
            .chain(NUMERIC_FEATURE_ORDER.iter().map(|name| name.to_string()))
            .collect();

        Ok(Self {
            columns: artifact.columns,
            handle_unknown: artifact.handle_unknown,
            schema: FeatureSchema::new(artifact.schema_version, feature_names),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: EncoderArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Whether `category` is a fitted value of column `feature`
    pub fn knows(&self, feature: &str, category: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name == feature && c.categories.iter().any(|known| known == category))
    }

    /// Encodes raw features into the model input vector
    ///
    /// Missing fields take their documented defaults; unrecognized keys are
    /// ignored.
    pub fn encode(&self, features: &FeatureMap) -> Result<FeatureVector, EncodingError> {
        let mut values = Vec::with_capacity(self.schema.len());

        for column in &self.columns {
            let category = match features.get(&column.name) {
                Some(FeatureValue::Text(text)) => text.as_str(),
                Some(FeatureValue::Number(_)) => {
                    return Err(EncodingError::ExpectedCategory {
                        feature: column.name.clone(),
                    })
                }
                None => categorical_default(&column.name),
            };

            let hot = column.categories.iter().position(|c| c == category);
            if hot.is_none() && self.handle_unknown == HandleUnknown::Error {
                return Err(EncodingError::UnknownCategory {
                    feature: column.name.clone(),
                    value: category.to_string(),
                });
            }

            values.extend((0..column.categories.len()).map(|i| {
                if Some(i) == hot {
                    1.0
                } else {
                    0.0
                }
            }));
        }

        for name in NUMERIC_FEATURE_ORDER {
            let value = match features.get(name) {
                Some(FeatureValue::Number(n)) => *n,
                Some(FeatureValue::Text(text)) => {
                    return Err(EncodingError::ExpectedNumber {
                        feature: name.to_string(),
                        value: text.clone(),
                    })
                }
                None => numeric_default(name),
            };
            values.push(value);
        }

        Ok(FeatureVector::new(values))
    }
}
