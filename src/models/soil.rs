use serde::{Deserialize, Serialize};

/// Soil characteristics used as model inputs
///
/// Always fully populated after aggregation: either supplied by the caller,
/// read from the provider, or filled from [`SoilProfile::FALLBACK`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub ph: f64,
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub soil_quality_index: f64,
}

impl SoilProfile {
    /// Substituted wholesale when the soil provider fails, and per field when
    /// the provider or caller leaves a value out
    pub const FALLBACK: SoilProfile = SoilProfile {
        ph: 6.5,
        nitrogen: 50.0,
        phosphorus: 50.0,
        potassium: 50.0,
        soil_quality_index: 20.0,
    };

    /// Fills gaps in a partial profile with the documented constants
    pub fn from_partial(partial: &PartialSoilProfile) -> Self {
        let defaults = Self::FALLBACK;
        Self {
            ph: partial.ph.unwrap_or(defaults.ph),
            nitrogen: partial.nitrogen.unwrap_or(defaults.nitrogen),
            phosphorus: partial.phosphorus.unwrap_or(defaults.phosphorus),
            potassium: partial.potassium.unwrap_or(defaults.potassium),
            soil_quality_index: partial
                .soil_quality_index
                .unwrap_or(defaults.soil_quality_index),
        }
    }
}

impl Default for SoilProfile {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Soil values as supplied by a caller or a provider, any of which may be absent
///
/// Unknown fields (e.g. `clay`, `ocd`) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSoilProfile {
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default, rename = "N")]
    pub nitrogen: Option<f64>,
    #[serde(default, rename = "P")]
    pub phosphorus: Option<f64>,
    #[serde(default, rename = "K")]
    pub potassium: Option<f64>,
    #[serde(default)]
    pub soil_quality_index: Option<f64>,
}
