use std::net::IpAddr;

use async_trait::async_trait;

use super::http_client::HttpClientTrait;
use crate::domain::weather::GeolocationProvider;
use crate::domain::DomainError;

/// Response fields tried in order when looking for a place name
const PLACE_FIELDS: [&str; 4] = ["city", "town", "region", "district"];

const IP_PLACEHOLDER: &str = "{ip}";

/// IP geolocation service reached over HTTP
///
/// The URL may contain `{ip}`, replaced by the caller's public address. When the
/// address is unknown or private the placeholder is dropped and the service
/// locates the server itself.
#[derive(Debug)]
pub struct HttpGeolocationProvider<C: HttpClientTrait> {
    client: C,
    name: String,
    url_template: String,
}

impl<C: HttpClientTrait> HttpGeolocationProvider<C> {
    pub fn new(client: C, name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            url_template: url_template.into(),
        }
    }

    fn url_for(&self, client_ip: Option<IpAddr>) -> String {
        match client_ip.filter(is_public) {
            Some(ip) => self.url_template.replace(IP_PLACEHOLDER, &ip.to_string()),
            None => self
                .url_template
                .replace(&format!("/{}", IP_PLACEHOLDER), "")
                .replace(IP_PLACEHOLDER, ""),
        }
    }
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_public(&IpAddr::V4(mapped));
            }
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local())
        }
    }
}

/// First non-empty place field of a geolocation response
fn place_name(body: &serde_json::Value) -> Option<String> {
    PLACE_FIELDS.iter().find_map(|field| {
        body.get(field)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

#[async_trait]
impl<C: HttpClientTrait> GeolocationProvider for HttpGeolocationProvider<C> {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn locate(&self, client_ip: Option<IpAddr>) -> Result<Option<String>, DomainError> {
        let url = self.url_for(client_ip);
        let body = self.client.get_json(&self.name, &url, &[]).await?;
        Ok(place_name(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::weather::http_client::mock::MockHttpClient;
    use crate::infrastructure::weather::HttpClient;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_place_name_field_priority() {
        let body = serde_json::json!({"region": "Tamil Nadu", "town": "Vellore"});
        assert_eq!(place_name(&body).as_deref(), Some("Vellore"));

        let body = serde_json::json!({"city": "  ", "district": "Kutch"});
        assert_eq!(place_name(&body).as_deref(), Some("Kutch"));

        assert_eq!(place_name(&serde_json::json!({"ip": "1.2.3.4"})), None);
    }

    #[test]
    fn test_url_substitution() {
        let provider =
            HttpGeolocationProvider::new(MockHttpClient::new(), "ipinfo", "https://ipinfo.io/{ip}/json");

        assert_eq!(
            provider.url_for(Some("8.8.8.8".parse().unwrap())),
            "https://ipinfo.io/8.8.8.8/json"
        );
        assert_eq!(provider.url_for(None), "https://ipinfo.io/json");
        assert_eq!(
            provider.url_for(Some("192.168.1.20".parse().unwrap())),
            "https://ipinfo.io/json"
        );
    }

    #[test]
    fn test_private_ipv6_is_not_substituted() {
        let provider =
            HttpGeolocationProvider::new(MockHttpClient::new(), "ipinfo", "https://ipinfo.io/{ip}/json");

        for private in ["fd12:3456:789a::1", "fe80::1ff:fe23:4567:890a", "::1", "::ffff:10.0.0.7"] {
            assert_eq!(
                provider.url_for(Some(private.parse().unwrap())),
                "https://ipinfo.io/json",
                "{private}"
            );
        }

        assert_eq!(
            provider.url_for(Some("2001:4860:4860::8888".parse().unwrap())),
            "https://ipinfo.io/2001:4860:4860::8888/json"
        );
    }

    #[tokio::test]
    async fn test_locate_with_mock_client() {
        let client = MockHttpClient::new()
            .with_response("https://geo.test/json", serde_json::json!({"city": "Chennai"}));
        let provider = HttpGeolocationProvider::new(client, "geo", "https://geo.test/json");

        assert_eq!(provider.locate(None).await.unwrap().as_deref(), Some("Chennai"));
    }

    #[tokio::test]
    async fn test_locate_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/8.8.4.4/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"city": "Mountain View"})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let provider =
            HttpGeolocationProvider::new(client, "ipinfo", format!("{}/{{ip}}/json", server.uri()));

        let city = provider.locate(Some("8.8.4.4".parse().unwrap())).await.unwrap();
        assert_eq!(city.as_deref(), Some("Mountain View"));
    }

    #[tokio::test]
    async fn test_error_status_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let provider = HttpGeolocationProvider::new(client, "ipapi", server.uri());

        let err = provider.locate(None).await.unwrap_err();
        assert!(err.to_string().contains("ipapi"));
    }
}
