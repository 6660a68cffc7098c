/// ISRIC SoilGrids v2 provider
///
/// Queries topsoil pH and nitrogen for a point. SoilGrids stores values as
/// scaled integers; each layer reports the `d_factor` to divide by. Layers
/// with no data (open water, urban cover) come back with null means and are
/// left for the aggregator to default.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Location, PartialSoilProfile},
    services::providers::{ensure_success, SoilProvider},
};

const PROVIDER_NAME: &str = "soilgrids";
const TOPSOIL_DEPTH: &str = "0-5cm";

#[derive(Debug, Deserialize)]
struct ApiSoilResponse {
    properties: ApiProperties,
}

#[derive(Debug, Deserialize)]
struct ApiProperties {
    #[serde(default)]
    layers: Vec<ApiLayer>,
}

#[derive(Debug, Deserialize)]
struct ApiLayer {
    name: String,
    unit_measure: ApiUnitMeasure,
    #[serde(default)]
    depths: Vec<ApiDepth>,
}

#[derive(Debug, Deserialize)]
struct ApiUnitMeasure {
    d_factor: f64,
}

#[derive(Debug, Deserialize)]
struct ApiDepth {
    label: String,
    values: ApiDepthValues,
}

#[derive(Debug, Deserialize)]
struct ApiDepthValues {
    #[serde(default)]
    mean: Option<f64>,
}

#[derive(Clone)]
pub struct SoilGridsProvider {
    http_client: HttpClient,
    api_url: String,
}

impl SoilGridsProvider {
    pub fn new(http_client: HttpClient, api_url: String) -> Self {
        Self {
            http_client,
            api_url,
        }
    }

    /// Converts API response to the provider-neutral soil shape
    fn convert_api_response(&self, response: ApiSoilResponse) -> PartialSoilProfile {
        let layer_value = |property: &str| {
            response
                .properties
                .layers
                .iter()
                .find(|layer| layer.name == property)
                .and_then(|layer| {
                    let depth = layer
                        .depths
                        .iter()
                        .find(|d| d.label == TOPSOIL_DEPTH)
                        .or_else(|| layer.depths.first())?;
                    let mean = depth.values.mean?;
                    if layer.unit_measure.d_factor > 0.0 {
                        Some(mean / layer.unit_measure.d_factor)
                    } else {
                        Some(mean)
                    }
                })
        };

        PartialSoilProfile {
            ph: layer_value("phh2o"),
            nitrogen: layer_value("nitrogen"),
            ..PartialSoilProfile::default()
        }
    }
}

#[async_trait::async_trait]
impl SoilProvider for SoilGridsProvider {
    async fn get_soil(&self, location: Location) -> AppResult<PartialSoilProfile> {
        let url = format!("{}/properties/query", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lon", location.longitude.to_string()),
                ("lat", location.latitude.to_string()),
                ("property", "phh2o".to_string()),
                ("property", "nitrogen".to_string()),
                ("depth", TOPSOIL_DEPTH.to_string()),
                ("value", "mean".to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(PROVIDER_NAME, response).await?;
        let body: ApiSoilResponse = response.json().await?;
        let soil = self.convert_api_response(body);

        tracing::info!(
            location = %location,
            ph = ?soil.ph,
            nitrogen = ?soil.nitrogen,
            provider = PROVIDER_NAME,
            "Soil data fetched"
        );

        Ok(soil)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> SoilGridsProvider {
        SoilGridsProvider::new(reqwest::Client::new(), "http://test.local".to_string())
    }

    fn parse(json: &str) -> ApiSoilResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_convert_api_response_scales_by_d_factor() {
        let response = parse(
            r#"{
                "type": "Feature",
                "properties": {
                    "layers": [
                        {
                            "name": "phh2o",
                            "unit_measure": {"d_factor": 10, "mapped_units": "pH*10"},
                            "depths": [{"label": "0-5cm", "values": {"mean": 65}}]
                        },
                        {
                            "name": "nitrogen",
                            "unit_measure": {"d_factor": 100, "mapped_units": "cg/kg"},
                            "depths": [{"label": "0-5cm", "values": {"mean": 312}}]
                        }
                    ]
                }
            }"#,
        );

        let soil = create_test_provider().convert_api_response(response);

        assert_eq!(soil.ph, Some(6.5));
        assert_eq!(soil.nitrogen, Some(3.12));
        assert_eq!(soil.phosphorus, None);
        assert_eq!(soil.potassium, None);
        assert_eq!(soil.soil_quality_index, None);
    }

    #[test]
    fn test_convert_api_response_null_means_are_missing() {
        let response = parse(
            r#"{
                "properties": {
                    "layers": [
                        {
                            "name": "phh2o",
                            "unit_measure": {"d_factor": 10},
                            "depths": [{"label": "0-5cm", "values": {"mean": null}}]
                        }
                    ]
                }
            }"#,
        );

        let soil = create_test_provider().convert_api_response(response);

        assert_eq!(soil, PartialSoilProfile::default());
    }

    #[test]
    fn test_malformed_body_does_not_parse() {
        let result: Result<ApiSoilResponse, _> = serde_json::from_str(r#"{"detail": "bad"}"#);
        assert!(result.is_err());
    }
}
