//! Session context - one user's language and weather snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::weather::WeatherSnapshot;
use crate::domain::DomainError;

/// Session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_field("session_id", format!("Invalid session id '{}'", value)))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's interaction context
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: SessionId,
    language: String,
    weather: WeatherSnapshot,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(language: impl Into<String>, weather: WeatherSnapshot) -> Self {
        Self {
            id: SessionId::generate(),
            language: language.into(),
            weather,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Replace the whole snapshot at once
    pub fn replace_weather(&mut self, weather: WeatherSnapshot) {
        self.weather = weather;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()).unwrap(), id);
        assert!(SessionId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_replace_weather() {
        let mut session = Session::new("English", WeatherSnapshot::fallback(None));
        let mut snapshot = WeatherSnapshot::fallback(Some("Pune".to_string()));
        snapshot.temperature = 31.0;

        session.replace_weather(snapshot.clone());
        assert_eq!(session.weather(), &snapshot);
    }
}
