//! Layered application configuration

mod app_config;

pub use app_config::{
    AdvisoryConfig, AppConfig, ArtifactsConfig, DatasetConfig, GeolocationEndpoint, LogFormat,
    LoggingConfig, ServerConfig, SessionsConfig, TrainingSettings, WeatherConfig,
    WEATHER_API_KEY_ENV,
};
