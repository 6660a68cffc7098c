use serde::{Deserialize, Serialize};

/// Current climate conditions at a location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    /// Average temperature in °C
    pub avg_temp: f64,
    /// Relative humidity in %
    pub humidity: f64,
    pub windspeed: f64,
}

impl ClimateProfile {
    pub const FALLBACK: ClimateProfile = ClimateProfile {
        avg_temp: 25.0,
        humidity: 60.0,
        windspeed: 5.0,
    };
}

impl Default for ClimateProfile {
    fn default() -> Self {
        Self::FALLBACK
    }
}
