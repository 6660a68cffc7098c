/// Open-Meteo forecast provider
///
/// Keyless; reads the `current` block for temperature, relative humidity and
/// 10m wind speed.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{ClimateProfile, Location},
    services::providers::{ensure_success, ClimateProvider},
};

const PROVIDER_NAME: &str = "open_meteo";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";

#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temperature_2m: f64,
    #[serde(default)]
    relative_humidity_2m: Option<f64>,
    wind_speed_10m: f64,
}

impl From<ApiCurrent> for ClimateProfile {
    fn from(current: ApiCurrent) -> Self {
        ClimateProfile {
            avg_temp: current.temperature_2m,
            humidity: current
                .relative_humidity_2m
                .unwrap_or(ClimateProfile::FALLBACK.humidity),
            windspeed: current.wind_speed_10m,
        }
    }
}

#[derive(Clone)]
pub struct OpenMeteoProvider {
    http_client: HttpClient,
    api_url: String,
}

impl OpenMeteoProvider {
    pub fn new(http_client: HttpClient, api_url: String) -> Self {
        Self {
            http_client,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl ClimateProvider for OpenMeteoProvider {
    async fn get_climate(&self, location: Location) -> AppResult<ClimateProfile> {
        let url = format!("{}/forecast", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(PROVIDER_NAME, response).await?;
        let forecast: ApiForecastResponse = response.json().await?;
        let climate = ClimateProfile::from(forecast.current);

        tracing::info!(
            location = %location,
            avg_temp = climate.avg_temp,
            humidity = climate.humidity,
            windspeed = climate.windspeed,
            provider = PROVIDER_NAME,
            "Climate data fetched"
        );

        Ok(climate)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_current_block() {
        let forecast: ApiForecastResponse = serde_json::from_str(
            r#"{
                "latitude": 34.7,
                "longitude": 113.6,
                "current": {
                    "time": "2024-06-01T12:00",
                    "temperature_2m": 28.4,
                    "relative_humidity_2m": 41,
                    "wind_speed_10m": 11.2
                }
            }"#,
        )
        .unwrap();

        let climate = ClimateProfile::from(forecast.current);

        assert_eq!(climate.avg_temp, 28.4);
        assert_eq!(climate.humidity, 41.0);
        assert_eq!(climate.windspeed, 11.2);
    }

    #[test]
    fn test_missing_humidity_defaults() {
        let forecast: ApiForecastResponse = serde_json::from_str(
            r#"{"current": {"temperature_2m": 19.0, "wind_speed_10m": 3.5}}"#,
        )
        .unwrap();

        let climate = ClimateProfile::from(forecast.current);

        assert_eq!(climate.humidity, 60.0);
    }

    #[test]
    fn test_missing_current_block_is_malformed() {
        let result: Result<ApiForecastResponse, _> =
            serde_json::from_str(r#"{"error": true, "reason": "Latitude must be in range"}"#);
        assert!(result.is_err());
    }
}
