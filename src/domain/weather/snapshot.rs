//! Current weather as shown to, and pre-filled for, the user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature used when no live reading is available (°C)
pub const FALLBACK_TEMPERATURE: f64 = 24.0;

/// Humidity used when no live reading is available (%)
pub const FALLBACK_HUMIDITY: f64 = 60.0;

/// Condition used when no live reading is available
pub const FALLBACK_CONDITION: &str = "Clear";

/// Where the values of a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    /// Populated from a successful provider response
    Live,
    /// Fixed defaults after resolution failed
    Fallback,
}

/// Resolved {city, temperature, humidity, condition}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
    pub condition: String,
    pub source: SnapshotSource,
    pub updated_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Fallback triple, keeping whatever city was resolved
    pub fn fallback(city: Option<String>) -> Self {
        Self {
            city,
            temperature: FALLBACK_TEMPERATURE,
            humidity: FALLBACK_HUMIDITY,
            condition: FALLBACK_CONDITION.to_string(),
            source: SnapshotSource::Fallback,
            updated_at: Utc::now(),
        }
    }

    /// Snapshot built from a complete live reading
    pub fn live(city: impl Into<String>, reading: LiveWeather) -> Self {
        Self {
            city: Some(city.into()),
            temperature: reading.temperature,
            humidity: reading.humidity,
            condition: reading.condition,
            source: SnapshotSource::Live,
            updated_at: Utc::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.source == SnapshotSource::Live
    }

    /// True when the three weather fields equal the fallback triple
    pub fn has_fallback_values(&self) -> bool {
        self.temperature == FALLBACK_TEMPERATURE
            && self.humidity == FALLBACK_HUMIDITY
            && self.condition == FALLBACK_CONDITION
    }
}

/// Raw provider reading; temperature and humidity may be absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub condition: Option<String>,
}

impl WeatherReading {
    /// Complete reading, if both temperature and humidity are present
    pub fn complete(self) -> Option<LiveWeather> {
        Some(LiveWeather {
            temperature: self.temperature?,
            humidity: self.humidity?,
            condition: self
                .condition
                .unwrap_or_else(|| FALLBACK_CONDITION.to_string()),
        })
    }
}

/// Reading with every field present
#[derive(Debug, Clone, PartialEq)]
pub struct LiveWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub condition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_triple() {
        let snapshot = WeatherSnapshot::fallback(None);
        assert_eq!(snapshot.temperature, 24.0);
        assert_eq!(snapshot.humidity, 60.0);
        assert_eq!(snapshot.condition, "Clear");
        assert!(snapshot.city.is_none());
        assert!(snapshot.has_fallback_values());
        assert!(!snapshot.is_live());
    }

    #[test]
    fn test_incomplete_reading() {
        let reading = WeatherReading {
            temperature: Some(30.0),
            humidity: None,
            condition: Some("Rain".to_string()),
        };
        assert!(reading.complete().is_none());
    }

    #[test]
    fn test_complete_reading_defaults_condition() {
        let reading = WeatherReading {
            temperature: Some(30.0),
            humidity: Some(70.0),
            condition: None,
        };
        let live = reading.complete().unwrap();
        assert_eq!(live.condition, "Clear");
    }

    #[test]
    fn test_snapshot_serialization_omits_unset_city() {
        let json = serde_json::to_string(&WeatherSnapshot::fallback(None)).unwrap();
        assert!(!json.contains("city"));
        assert!(json.contains("\"source\":\"fallback\""));
    }
}
