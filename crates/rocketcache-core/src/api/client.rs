//! API client for the public rocket catalog.
//!
//! The catalog is read-only and unauthenticated, so the client is a thin
//! wrapper around two GET endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, RocketSource};
use crate::models::Rocket;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the public catalog API
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v4";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Path segment of the rocket collection
const ROCKETS_PATH: &str = "rockets";

/// API client for the rocket catalog.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the default public endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client for a custom endpoint (mirrors, test servers)
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/rockets[/{id}]`, percent-encoding the identifier.
    fn rockets_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in the constructor
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(ROCKETS_PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl RocketSource for ApiClient {
    async fn fetch_rockets(&self) -> Result<Vec<Rocket>, ApiError> {
        let rockets: Vec<Rocket> = self.get(self.rockets_url(None)).await?;
        debug!(count = rockets.len(), "Fetched remote rockets");
        Ok(rockets)
    }

    async fn fetch_rocket(&self, id: &str) -> Result<Rocket, ApiError> {
        self.get(self.rockets_url(Some(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const FALCON_9: &str = r#"{
        "id": "5e9d0d95eda69973a809d1ec",
        "name": "Falcon 9",
        "country": "United States",
        "cost_per_launch": 50000000,
        "active": true,
        "stages": 2
    }"#;

    #[test]
    fn test_rockets_url() {
        let client = ApiClient::with_base_url("https://example.com/v4").unwrap();
        assert_eq!(
            client.rockets_url(None).as_str(),
            "https://example.com/v4/rockets"
        );
        assert_eq!(
            client.rockets_url(Some("abc")).as_str(),
            "https://example.com/v4/rockets/abc"
        );

        // Trailing slash on the base and unsafe characters in the id
        let client = ApiClient::with_base_url("https://example.com/v4/").unwrap();
        assert_eq!(
            client.rockets_url(Some("a/b")).as_str(),
            "https://example.com/v4/rockets/a%2Fb"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::with_base_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::with_base_url("mailto:someone@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_rockets() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rockets")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{}]", FALCON_9))
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let rockets = client.fetch_rockets().await.unwrap();

        assert_eq!(rockets.len(), 1);
        assert_eq!(rockets[0].name, "Falcon 9");
        assert!(!rockets[0].is_local);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rocket_by_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rockets/5e9d0d95eda69973a809d1ec")
            .with_status(200)
            .with_body(FALCON_9)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let rocket = client.fetch_rocket("5e9d0d95eda69973a809d1ec").await.unwrap();

        assert_eq!(rocket.id, "5e9d0d95eda69973a809d1ec");
        assert_eq!(rocket.cost_per_launch, 50_000_000.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rockets/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let err = client.fetch_rocket("missing").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Status { status, ref body } if status == reqwest::StatusCode::NOT_FOUND && body == "Not Found"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rockets")
            .with_status(200)
            .with_body("{\"not\": \"an array\"}")
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let err = client.fetch_rockets().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
