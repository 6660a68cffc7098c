/// External signal providers
///
/// This module provides a pluggable architecture for the soil, climate and
/// market data sources consumed by the recommendation engine. Soil and climate
/// providers may fail; the aggregator decides what happens then. The market
/// provider is expected to be total but is still allowed to return an error.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ClimateProfile, Location, MarketQuote, PartialSoilProfile},
};

pub mod market;
pub mod open_meteo;
pub mod openweather;
pub mod soilgrids;

pub use market::StaticMarketProvider;
pub use open_meteo::OpenMeteoProvider;
pub use openweather::OpenWeatherProvider;
pub use soilgrids::SoilGridsProvider;

/// Trait for soil data providers
///
/// Returns whatever subset of the soil profile the upstream source knows about;
/// missing fields are filled by the aggregator.
#[async_trait::async_trait]
pub trait SoilProvider: Send + Sync {
    async fn get_soil(&self, location: Location) -> AppResult<PartialSoilProfile>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for climate data providers
#[async_trait::async_trait]
pub trait ClimateProvider: Send + Sync {
    async fn get_climate(&self, location: Location) -> AppResult<ClimateProfile>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for market price providers
#[async_trait::async_trait]
pub trait MarketProvider: Send + Sync {
    /// Price quote for `crop` in `country`, or a default for unknown pairs
    async fn get_price(&self, crop: &str, country: &str) -> AppResult<MarketQuote>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the HTTP client shared by all network providers
///
/// A request exceeding `timeout` fails like any other provider error.
pub fn build_http_client(timeout: Duration) -> AppResult<HttpClient> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(AppError::from)
}

/// Turns a non-2xx response into an `ExternalApi` error
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> AppResult<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ExternalApi(format!(
            "{} returned status {}: {}",
            provider, status, body
        )));
    }

    Ok(response)
}
