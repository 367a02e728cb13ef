//! Cropify
//!
//! Crop recommendation from soil and climate inputs:
//! - offline training of four classifier families into artifact slots
//! - an HTTP service that resolves the caller's weather, predicts a crop and
//!   returns localized advice
//! - correlation analysis of uploaded CSV files

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use crate::config::WeatherConfig;
use domain::weather::GeolocationProvider;
use domain::{DomainError, KnowledgeBase, ModelRegistry};
use infrastructure::advisory::load_knowledge_base;
use infrastructure::ml::{load_registry, ArtifactStore};
use infrastructure::services::{PredictionService, SessionService, SessionStoreConfig};
use infrastructure::weather::{
    HttpClient, HttpGeolocationProvider, OpenWeatherProvider, ResolverPolicy, WeatherResolver,
};
use tracing::info;

/// Build the service state from configuration
///
/// Fails before anything is served when the weather key is missing, the
/// knowledge base is invalid or no model artifact can be loaded.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key = config.validate_for_serving()?;

    let knowledge_base = load_knowledge_base(&config.advisory.path)?;
    let registry = load_registry(&ArtifactStore::new(&config.artifacts.dir))?;
    let resolver = build_weather_resolver(&config.weather, api_key)?;

    let sessions = SessionStoreConfig {
        max_capacity: config.sessions.max_capacity,
        time_to_idle: Duration::from_secs(config.sessions.ttl_secs),
    };

    let state = create_app_state(registry, knowledge_base, resolver, sessions)?;

    info!(
        models = ?state.registry.selectable(),
        languages = ?state.knowledge_base.languages(),
        "Application state ready"
    );

    Ok(state)
}

/// Assemble the state from already loaded parts
pub fn create_app_state(
    registry: ModelRegistry,
    knowledge_base: KnowledgeBase,
    resolver: WeatherResolver,
    sessions: SessionStoreConfig,
) -> Result<AppState, DomainError> {
    let registry = Arc::new(registry);
    let knowledge_base = Arc::new(knowledge_base);

    let prediction_service = PredictionService::new(registry.clone(), knowledge_base.clone())?;
    let session_service =
        SessionService::new(Arc::new(resolver), knowledge_base.clone(), sessions);

    Ok(AppState {
        registry,
        knowledge_base,
        prediction_service: Arc::new(prediction_service),
        session_service: Arc::new(session_service),
    })
}

/// HTTP-backed resolver: configured geolocation providers in order, then OpenWeather
pub fn build_weather_resolver(
    config: &WeatherConfig,
    api_key: String,
) -> Result<WeatherResolver, DomainError> {
    let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;

    let geolocation: Vec<Arc<dyn GeolocationProvider>> = config
        .geolocation_providers
        .iter()
        .map(|endpoint| {
            Arc::new(HttpGeolocationProvider::new(
                client.clone(),
                endpoint.name.clone(),
                endpoint.url.clone(),
            )) as Arc<dyn GeolocationProvider>
        })
        .collect();

    let weather = OpenWeatherProvider::with_base_url(client, api_key, config.base_url.clone());

    Ok(WeatherResolver::new(
        geolocation,
        Arc::new(weather),
        ResolverPolicy {
            location_attempts: config.location_attempts,
            weather_attempts: config.weather_attempts,
        },
    ))
}
