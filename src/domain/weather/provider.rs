use std::fmt::Debug;
use std::net::IpAddr;

use async_trait::async_trait;

use super::WeatherReading;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Resolves an approximate city from a network address
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync + Debug {
    /// Provider name for logs
    fn name(&self) -> String;

    /// Look up the caller's place name
    ///
    /// `Ok(None)` means the provider answered but exposed no usable place field.
    async fn locate(&self, client_ip: Option<IpAddr>) -> Result<Option<String>, DomainError>;
}

/// Current conditions for a city
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherReading, DomainError>;
}
