use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_advisor::{
    api::{create_router, AppState},
    config::Config,
    prediction::Artifacts,
    services::{
        providers::{
            build_http_client, ClimateProvider, MarketProvider, OpenMeteoProvider,
            OpenWeatherProvider, SoilGridsProvider, StaticMarketProvider,
        },
        CandidateScorer, RecommendationEngine, SignalAggregator,
    },
};

fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crop_advisor=info,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);

    // Artifacts are loaded once; a schema mismatch stops startup here
    let artifacts = Artifacts::load(&config.encoder_path, &config.model_path)
        .context("Failed to load prediction artifacts")?;

    let http_client = build_http_client(config.provider_timeout())?;

    let soil_provider = Arc::new(SoilGridsProvider::new(
        http_client.clone(),
        config.soil_api_url.clone(),
    ));

    let climate_provider: Arc<dyn ClimateProvider> = match config.openweather_api_key() {
        Some(api_key) => Arc::new(OpenWeatherProvider::new(
            http_client.clone(),
            api_key.to_string(),
            config.openweather_api_url.clone(),
        )),
        None => Arc::new(OpenMeteoProvider::new(
            http_client.clone(),
            config.open_meteo_api_url.clone(),
        )),
    };

    let market_provider: Arc<dyn MarketProvider> = match &config.market_prices_path {
        Some(path) => Arc::new(StaticMarketProvider::from_path(path)?),
        None => Arc::new(StaticMarketProvider::builtin()),
    };

    tracing::info!(
        climate_provider = climate_provider.name(),
        market_provider = market_provider.name(),
        "Providers configured"
    );

    let aggregator = SignalAggregator::new(soil_provider, climate_provider);
    let scorer = CandidateScorer::new(
        artifacts.encoder.clone(),
        artifacts.model.clone(),
        market_provider,
    );
    let engine = RecommendationEngine::new(aggregator, scorer);
    engine.check_candidates(&artifacts);

    let state = AppState::new(engine, config.default_country.as_str());
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
