//! Weather domain - snapshot and provider seams

mod provider;
mod snapshot;

pub use provider::{GeolocationProvider, WeatherProvider};
pub use snapshot::{
    LiveWeather, SnapshotSource, WeatherReading, WeatherSnapshot, FALLBACK_CONDITION,
    FALLBACK_HUMIDITY, FALLBACK_TEMPERATURE,
};

#[cfg(test)]
pub use provider::{MockGeolocationProvider, MockWeatherProvider};
