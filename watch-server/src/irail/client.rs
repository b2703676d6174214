//! iRail HTTP client.
//!
//! Thin read-only wrapper over the public iRail API. Every call is a
//! single GET with the fixed `format` and active `lang` parameters
//! appended; a non-success status is classified into a `FetchError`
//! carrying the code. No retries, no caching.

use serde::de::DeserializeOwned;

use crate::config::Language;
use crate::domain::{TrainId, Vehicle};

use super::FetchVehicle;
use super::convert::{Connection, convert_connection, convert_vehicle};
use super::error::FetchError;
use super::types::{ConnectionsResponse, StationsResponse, TimeSelector, VehicleResponse};

/// Default base URL for the iRail API.
const DEFAULT_BASE_URL: &str = "https://api.irail.be";

/// Fixed response format appended to every call.
const RESPONSE_FORMAT: &str = "json";

/// Configuration for the iRail client.
#[derive(Debug, Clone)]
pub struct IrailConfig {
    /// Base URL for the API (defaults to the public endpoint).
    pub base_url: String,
    /// Language appended to every call, governs localized station names.
    pub language: Language,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl IrailConfig {
    /// Create a new config for the given language.
    pub fn new(language: Language) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// iRail API client.
#[derive(Debug, Clone)]
pub struct IrailClient {
    http: reqwest::Client,
    base_url: String,
    language: Language,
}

impl IrailClient {
    /// Create a new iRail client with the given configuration.
    pub fn new(config: IrailConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            language: config.language,
        })
    }

    /// Issue one GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[
                ("format", RESPONSE_FORMAT),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            message: e.to_string(),
        })
    }

    /// Get all station names, sorted.
    pub async fn get_stations(&self) -> Result<Vec<String>, FetchError> {
        let response: StationsResponse = self.get_json("/stations/", &[]).await?;

        let mut names: Vec<String> = response.station.into_iter().map(|s| s.name).collect();
        names.sort();
        Ok(names)
    }

    /// Get a vehicle's live itinerary by train identifier.
    pub async fn get_vehicle(&self, train: &TrainId) -> Result<Vehicle, FetchError> {
        let response: VehicleResponse = self
            .get_json("/vehicle/", &[("id", train.qualified())])
            .await?;

        Ok(convert_vehicle(&response)?)
    }

    /// Get connection options between two stations.
    ///
    /// `time` is `hh:mm` or `hhmm`; the colon is stripped before the
    /// request, as the API expects.
    pub async fn get_connections(
        &self,
        from_station: &str,
        to_station: &str,
        timesel: TimeSelector,
        time: &str,
    ) -> Result<Vec<Connection>, FetchError> {
        let time = time.replace(':', "");

        let response: ConnectionsResponse = self
            .get_json(
                "/connections/",
                &[
                    ("from", from_station.to_string()),
                    ("to", to_station.to_string()),
                    ("timesel", timesel.as_str().to_string()),
                    ("time", time),
                ],
            )
            .await?;

        let connections = response
            .connection
            .iter()
            .map(convert_connection)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(connections)
    }
}

impl FetchVehicle for IrailClient {
    async fn fetch_vehicle(&self, train: &TrainId) -> Result<Vehicle, FetchError> {
        self.get_vehicle(train).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = IrailConfig::new(Language::En);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builder() {
        let config = IrailConfig::new(Language::Fr)
            .with_base_url("http://localhost:8080")
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.language, Language::Fr);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn client_creation() {
        let client = IrailClient::new(IrailConfig::new(Language::Nl));
        assert!(client.is_ok());
    }

    // Integration tests against the live API would make real HTTP
    // requests; card behavior is covered with MockVehicleSource instead.
}
