//! Session request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Feature, FeatureVector, Session, WeatherSnapshot};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLanguageRequest {
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshWeatherRequest {
    #[serde(default)]
    pub city: String,
}

/// Accepted range and pre-filled value for one form input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub language: String,
    pub weather: WeatherSnapshot,
    pub created_at: DateTime<Utc>,
    pub inputs: Vec<FieldSpec>,
}

impl SessionResponse {
    pub fn from_session(session: &Session) -> Self {
        let weather = session.weather();
        let defaults = FeatureVector::defaults_with_weather(weather.temperature, weather.humidity);

        let inputs = Feature::ALL
            .iter()
            .map(|feature| {
                let (min, max) = feature.range();
                FieldSpec {
                    name: feature.field_name().to_string(),
                    min,
                    max,
                    default: defaults.get(*feature),
                }
            })
            .collect();

        Self {
            id: session.id().to_string(),
            language: session.language().to_string(),
            weather: weather.clone(),
            created_at: session.created_at(),
            inputs,
        }
    }
}
