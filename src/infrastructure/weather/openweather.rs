use async_trait::async_trait;

use super::http_client::HttpClientTrait;
use crate::domain::weather::{WeatherProvider, WeatherReading};
use crate::domain::DomainError;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const PROVIDER_NAME: &str = "openweather";

/// OpenWeather current-conditions endpoint, metric units
#[derive(Debug)]
pub struct OpenWeatherProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenWeatherProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENWEATHER_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn weather_url(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url)
    }
}

fn parse_reading(body: &serde_json::Value) -> WeatherReading {
    WeatherReading {
        temperature: body["main"]["temp"].as_f64(),
        humidity: body["main"]["humidity"].as_f64(),
        condition: body["weather"][0]["main"].as_str().map(str::to_string),
    }
}

#[async_trait]
impl<C: HttpClientTrait> WeatherProvider for OpenWeatherProvider<C> {
    async fn current(&self, city: &str) -> Result<WeatherReading, DomainError> {
        let query = [
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];

        let body = self
            .client
            .get_json(PROVIDER_NAME, &self.weather_url(), &query)
            .await?;

        Ok(parse_reading(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::weather::http_client::mock::MockHttpClient;
    use crate::infrastructure::weather::HttpClient;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london() -> serde_json::Value {
        serde_json::json!({
            "name": "London",
            "main": {"temp": 11.5, "humidity": 87},
            "weather": [{"main": "Rain", "description": "light rain"}]
        })
    }

    #[test]
    fn test_parse_reading() {
        let reading = parse_reading(&london());
        assert_eq!(reading.temperature, Some(11.5));
        assert_eq!(reading.humidity, Some(87.0));
        assert_eq!(reading.condition.as_deref(), Some("Rain"));
    }

    #[test]
    fn test_parse_reading_missing_fields() {
        let reading = parse_reading(&serde_json::json!({"main": {"temp": null}}));
        assert!(reading.complete().is_none());
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let client = MockHttpClient::new()
            .with_response("https://weather.test/data/2.5/weather", london());
        let provider = OpenWeatherProvider::with_base_url(client, "secret", "https://weather.test/");

        provider.current("London").await.unwrap();

        let queries = provider.client.recorded_queries();
        assert_eq!(
            queries[0],
            vec![
                ("q".to_string(), "London".to_string()),
                ("appid".to_string(), "secret".to_string()),
                ("units".to_string(), "metric".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_current_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let provider = OpenWeatherProvider::with_base_url(client, "key", server.uri());

        let live = provider.current("London").await.unwrap().complete().unwrap();
        assert_eq!(live.temperature, 11.5);
        assert_eq!(live.condition, "Rain");
    }

    #[tokio::test]
    async fn test_unknown_city_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let provider = OpenWeatherProvider::with_base_url(client, "key", server.uri());

        let err = provider.current("Atlantis").await.unwrap_err();
        assert!(err.to_string().contains("city not found"));
    }
}
