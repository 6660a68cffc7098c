use super::ArtifactError;

/// Current input layout version shared by encoder and model artifacts
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Versioned, ordered list of model input columns
///
/// Encoder and model each declare one; they must be identical or the process
/// refuses to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    pub version: u32,
    pub feature_names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(version: u32, feature_names: Vec<String>) -> Self {
        Self {
            version,
            feature_names,
        }
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// Checks that `other` describes the exact same input layout
    pub fn ensure_matches(&self, other: &FeatureSchema) -> Result<(), ArtifactError> {
        if self.version != other.version {
            return Err(ArtifactError::SchemaMismatch(format!(
                "schema version {} does not match {}",
                self.version, other.version
            )));
        }

        if self.feature_names.len() != other.feature_names.len() {
            return Err(ArtifactError::SchemaMismatch(format!(
                "{} features declared, {} expected",
                self.feature_names.len(),
                other.feature_names.len()
            )));
        }

        if let Some((index, (ours, theirs))) = self
            .feature_names
            .iter()
            .zip(other.feature_names.iter())
            .enumerate()
            .find(|(_, (a, b))| a != b)
        {
            return Err(ArtifactError::SchemaMismatch(format!(
                "feature {} is {:?}, expected {:?}",
                index, ours, theirs
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(1, names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_identical_schemas_match() {
        let a = schema(&["Crop_Type=Wheat", "ph"]);
        assert!(a.ensure_matches(&a.clone()).is_ok());
    }

    #[test]
    fn test_reordered_features_are_rejected() {
        let a = schema(&["ph", "temperature"]);
        let b = schema(&["temperature", "ph"]);

        let err = a.ensure_matches(&b).unwrap_err();
        assert!(err.to_string().contains("feature 0"));
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let a = schema(&["ph"]);
        let mut b = a.clone();
        b.version = 2;

        assert!(matches!(
            a.ensure_matches(&b),
            Err(ArtifactError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let a = schema(&["ph", "temperature"]);
        let b = schema(&["ph"]);

        assert!(a.ensure_matches(&b).is_err());
    }
}
