//! Geolocation and weather adapters

pub mod geolocation;
pub mod http_client;
pub mod openweather;
pub mod resolver;

pub use geolocation::HttpGeolocationProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openweather::{OpenWeatherProvider, DEFAULT_OPENWEATHER_BASE_URL};
pub use resolver::{ResolverPolicy, WeatherResolver};
