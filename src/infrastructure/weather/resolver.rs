//! Location and weather resolution with retry budgets and a fixed fallback

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::weather::{GeolocationProvider, LiveWeather, WeatherProvider, WeatherSnapshot};

/// How many times the provider list and the weather call are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    /// Passes over the whole geolocation provider list
    pub location_attempts: u32,
    pub weather_attempts: u32,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            location_attempts: 3,
            weather_attempts: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    geolocation: Vec<Arc<dyn GeolocationProvider>>,
    weather: Arc<dyn WeatherProvider>,
    policy: ResolverPolicy,
}

impl WeatherResolver {
    pub fn new(
        geolocation: Vec<Arc<dyn GeolocationProvider>>,
        weather: Arc<dyn WeatherProvider>,
        policy: ResolverPolicy,
    ) -> Self {
        Self {
            geolocation,
            weather,
            policy,
        }
    }

    pub fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    /// Walk the provider list, restarting it up to `location_attempts` times
    pub async fn resolve_location(&self, client_ip: Option<IpAddr>) -> Option<String> {
        for attempt in 1..=self.policy.location_attempts {
            for provider in &self.geolocation {
                match provider.locate(client_ip).await {
                    Ok(Some(city)) => {
                        info!(provider = %provider.name(), city = %city, attempt, "Location resolved");
                        return Some(city);
                    }
                    Ok(None) => {
                        warn!(provider = %provider.name(), attempt, "Geolocation response had no place name")
                    }
                    Err(e) => {
                        warn!(provider = %provider.name(), attempt, error = %e, "Geolocation provider failed")
                    }
                }
            }
        }

        warn!(
            attempts = self.policy.location_attempts,
            providers = self.geolocation.len(),
            "Location unresolved"
        );
        None
    }

    /// Ask the weather provider until a reading carries temperature and humidity
    pub async fn fetch_weather(&self, city: &str) -> Option<LiveWeather> {
        for attempt in 1..=self.policy.weather_attempts {
            match self.weather.current(city).await {
                Ok(reading) => match reading.complete() {
                    Some(live) => {
                        debug!(city, attempt, "Weather reading received");
                        return Some(live);
                    }
                    None => warn!(city, attempt, "Weather reading incomplete"),
                },
                Err(e) => warn!(city, attempt, error = %e, "Weather provider failed"),
            }
        }

        None
    }

    /// Initial snapshot for a new session
    pub async fn resolve(&self, client_ip: Option<IpAddr>) -> WeatherSnapshot {
        let Some(city) = self.resolve_location(client_ip).await else {
            warn!("Using fallback weather, no city resolved");
            return WeatherSnapshot::fallback(None);
        };

        match self.fetch_weather(&city).await {
            Some(live) => WeatherSnapshot::live(city, live),
            None => {
                warn!(city = %city, "Using fallback weather");
                WeatherSnapshot::fallback(Some(city))
            }
        }
    }

    /// Manual re-fetch for a user-supplied city
    ///
    /// Success replaces the whole snapshot. An empty city changes nothing. A
    /// failure keeps a previous live snapshot and otherwise applies the fallback.
    pub async fn refresh(&self, previous: &WeatherSnapshot, city: &str) -> WeatherSnapshot {
        let city = city.trim();

        if city.is_empty() {
            warn!("Manual weather refresh requested without a city, snapshot unchanged");
            return previous.clone();
        }

        match self.fetch_weather(city).await {
            Some(live) => {
                info!(city, "Weather refreshed");
                WeatherSnapshot::live(city, live)
            }
            None if previous.is_live() => {
                warn!(city, "Weather refresh failed, keeping previous reading");
                previous.clone()
            }
            None => {
                warn!(city, "Weather refresh failed, using fallback weather");
                WeatherSnapshot::fallback(previous.city.clone())
            }
        }
    }
}
