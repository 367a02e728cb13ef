use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::ml::TrainingConfig;

/// Environment variable accepted for the weather API key when the config omits it
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub dataset: DatasetConfig,
    pub artifacts: ArtifactsConfig,
    pub training: TrainingSettings,
    pub advisory: AdvisoryConfig,
    pub weather: WeatherConfig,
    pub sessions: SessionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Name of the crop label column; historically `label` or `Crop`
    pub label_column: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub seed: u64,
    pub test_ratio: f64,
    pub rf_trees: u16,
    pub mlp_hidden_layers: Vec<usize>,
    pub mlp_max_iter: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub path: PathBuf,
}

/// One geolocation service; `{ip}` in the URL is replaced by the caller's address
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeolocationEndpoint {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub location_attempts: u32,
    pub weather_attempts: u32,
    pub geolocation_providers: Vec<GeolocationEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/Crop_recommendation.csv"),
            label_column: "label".to_string(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
        }
    }
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            rf_trees: 100,
            mlp_hidden_layers: vec![100, 50],
            mlp_max_iter: 500,
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/advisory.json"),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: crate::infrastructure::weather::DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            timeout_secs: 5,
            location_attempts: 3,
            weather_attempts: 2,
            geolocation_providers: vec![
                GeolocationEndpoint {
                    name: "ipinfo".to_string(),
                    url: "https://ipinfo.io/{ip}/json".to_string(),
                },
                GeolocationEndpoint {
                    name: "ipapi".to_string(),
                    url: "https://ipapi.co/{ip}/json/".to_string(),
                },
                GeolocationEndpoint {
                    name: "ipwhois".to_string(),
                    url: "https://ipwho.is/{ip}".to_string(),
                },
            ],
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl_secs: 3600,
        }
    }
}

impl TrainingSettings {
    pub fn to_training_config(&self) -> TrainingConfig {
        TrainingConfig {
            seed: self.seed,
            test_ratio: self.test_ratio,
            rf_trees: self.rf_trees,
            mlp_hidden_layers: self.mlp_hidden_layers.clone(),
            mlp_max_iter: self.mlp_max_iter,
        }
    }
}

impl WeatherConfig {
    /// Configured key, or the one from `OPENWEATHER_API_KEY`
    pub fn resolved_api_key(&self) -> Result<String, DomainError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(WEATHER_API_KEY_ENV).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "Weather API key missing; set weather.api_key or {}",
                    WEATHER_API_KEY_ENV
                ))
            })
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CROPIFY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Checks shared by every command
    pub fn validate(&self) -> Result<(), DomainError> {
        let training = &self.training;

        if !(training.test_ratio > 0.0 && training.test_ratio < 1.0) {
            return Err(DomainError::configuration(format!(
                "training.test_ratio must be in (0, 1), got {}",
                training.test_ratio
            )));
        }

        if training.rf_trees == 0 || training.mlp_max_iter == 0 {
            return Err(DomainError::configuration(
                "training.rf_trees and training.mlp_max_iter must be positive",
            ));
        }

        if training.mlp_hidden_layers.is_empty() || training.mlp_hidden_layers.contains(&0) {
            return Err(DomainError::configuration(
                "training.mlp_hidden_layers must list positive layer sizes",
            ));
        }

        if self.dataset.label_column.trim().is_empty() {
            return Err(DomainError::configuration("dataset.label_column is empty"));
        }

        Ok(())
    }

    /// Checks needed before the service starts; returns the weather API key
    pub fn validate_for_serving(&self) -> Result<String, DomainError> {
        self.validate()?;

        let weather = &self.weather;

        if weather.geolocation_providers.is_empty() {
            return Err(DomainError::configuration(
                "weather.geolocation_providers must not be empty",
            ));
        }

        if weather.location_attempts == 0 || weather.weather_attempts == 0 {
            return Err(DomainError::configuration(
                "weather attempt budgets must be positive",
            ));
        }

        if weather.timeout_secs == 0 {
            return Err(DomainError::configuration("weather.timeout_secs must be positive"));
        }

        if self.sessions.max_capacity == 0 || self.sessions.ttl_secs == 0 {
            return Err(DomainError::configuration(
                "sessions.max_capacity and sessions.ttl_secs must be positive",
            ));
        }

        weather.resolved_api_key()
    }
}
