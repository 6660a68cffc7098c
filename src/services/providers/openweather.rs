/// OpenWeatherMap current-weather provider
///
/// Used instead of Open-Meteo when an API key is configured.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{ClimateProfile, Location},
    services::providers::{ensure_success, ClimateProvider},
};

const PROVIDER_NAME: &str = "openweather";

#[derive(Debug, Deserialize)]
struct ApiWeatherResponse {
    main: ApiMain,
    wind: ApiWind,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

impl From<ApiWeatherResponse> for ClimateProfile {
    fn from(weather: ApiWeatherResponse) -> Self {
        ClimateProfile {
            avg_temp: weather.main.temp,
            humidity: weather.main.humidity,
            windspeed: weather.wind.speed,
        }
    }
}

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OpenWeatherProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl ClimateProvider for OpenWeatherProvider {
    async fn get_climate(&self, location: Location) -> AppResult<ClimateProfile> {
        let url = format!("{}/weather", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(PROVIDER_NAME, response).await?;
        let weather: ApiWeatherResponse = response.json().await?;
        let climate = ClimateProfile::from(weather);

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
