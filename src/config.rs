use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Country used when a request omits one
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Trained yield model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Fitted categorical encoder artifact
    #[serde(default = "default_encoder_path")]
    pub encoder_path: String,

    /// ISRIC SoilGrids API base URL
    #[serde(default = "default_soil_api_url")]
    pub soil_api_url: String,

    /// Open-Meteo API base URL
    #[serde(default = "default_open_meteo_api_url")]
    pub open_meteo_api_url: String,

    /// OpenWeatherMap API base URL
    #[serde(default = "default_openweather_api_url")]
    pub openweather_api_url: String,

    /// OpenWeatherMap API key; Open-Meteo is used when unset
    #[serde(default)]
    pub openweather_api_key: Option<String>,

    /// Optional JSON price table replacing the built-in one
    #[serde(default)]
    pub market_prices_path: Option<String>,

    /// Per-call timeout for soil and climate providers
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_country() -> String {
    "India".to_string()
}

fn default_model_path() -> String {
    "artifacts/yield_model.json".to_string()
}

fn default_encoder_path() -> String {
    "artifacts/encoder.json".to_string()
}

fn default_soil_api_url() -> String {
    "https://rest.isric.org/soilgrids/v2.0".to_string()
}

fn default_open_meteo_api_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_openweather_api_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    5
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// API key, ignoring blank values
    pub fn openweather_api_key(&self) -> Option<&str> {
        self.openweather_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.default_country, "India");
        assert_eq!(config.provider_timeout(), Duration::from_secs(5));
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert!(config.openweather_api_key().is_none());
    }

    #[test]
    fn test_overrides_and_blank_api_key() {
        let config: Config = envy::from_iter(vec![
            ("PORT".to_string(), "8080".to_string()),
            ("DEFAULT_COUNTRY".to_string(), "Australia".to_string()),
            ("OPENWEATHER_API_KEY".to_string(), "  ".to_string()),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_country, "Australia");
        assert!(config.openweather_api_key().is_none());
    }
}
