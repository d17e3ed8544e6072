//! GraphQL client for the forge API.
//!
//! A thin wrapper over reqwest that applies authentication, routes to
//! the right endpoint per hostname, and surfaces GraphQL errors as
//! [`ApiError`]. Tokens are stored as [`SecretString`] to keep them out
//! of `Debug` output and logs.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::errors::{ApiError, GraphQLErrorEntry};
use repoctx_core::instance;

/// Forge API client for a single hostname.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    hostname: String,
    token: Option<SecretString>,
    /// Base URL override for testing (e.g., `"http://127.0.0.1:PORT/"`).
    api_url_override: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("hostname", &self.hostname)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url_override", &self.api_url_override)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new API client for a specific hostname.
    pub fn new(http: reqwest::Client, hostname: &str, token: Option<SecretString>) -> Self {
        Self {
            http,
            hostname: instance::normalize_hostname(hostname),
            token,
            api_url_override: None,
        }
    }

    /// Route all requests to this base URL instead of the real API.
    ///
    /// The URL should include the trailing slash, e.g.
    /// `"http://127.0.0.1:8080/"`.
    #[must_use]
    pub fn with_url_override(mut self, url: String) -> Self {
        self.api_url_override = Some(url);
        self
    }

    /// The hostname this client is configured for.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Execute a GraphQL query and deserialize the `data` payload.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success HTTP status,
    /// or GraphQL errors without usable data.
    #[instrument(skip(self, query, variables))]
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &HashMap<String, Value>,
    ) -> Result<T, ApiError> {
        let url = match self.api_url_override {
            Some(ref base) => format!("{base}graphql"),
            None => instance::graphql_url(&self.hostname),
        };

        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let mut req = self.http.post(&url).json(&body);
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("token {}", token.expose_secret()));
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: Value = resp.json().await?;

        if let Some(errors) = body.get("errors") {
            let entries: Vec<GraphQLErrorEntry> =
                serde_json::from_value(errors.clone()).unwrap_or_default();
            if !entries.is_empty() {
                // Partial responses still carry data; prefer it when it
                // deserializes cleanly.
                if let Some(data) = body.get("data")
                    && let Ok(result) = serde_json::from_value::<T>(data.clone())
                {
                    return Ok(result);
                }
                return Err(ApiError::GraphQL(entries));
            }
        }

        let data = body.get("data").ok_or_else(|| ApiError::Http {
            status: 200,
            message: "no data in GraphQL response".to_string(),
        })?;

        Ok(serde_json::from_value(data.clone())?)
    }
}


#[cfg(test)]
mod wiremock_tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn setup_client(server: &MockServer) -> Client {
        Client::new(reqwest::Client::new(), "github.com", Some("test-token".into()))
            .with_url_override(format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn test_should_deserialize_graphql_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("Authorization", "token test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "viewer": { "login": "octo" } }
            })))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let data: Value = client.graphql("query { viewer { login } }", &HashMap::new())
            .await
            .unwrap();

        assert_eq!(data["viewer"]["login"], "octo");
    }

    #[tokio::test]
    async fn test_should_surface_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client
            .graphql::<Value>("query { viewer { login } }", &HashMap::new())
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[tokio::test]
    async fn test_should_surface_graphql_errors_without_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{ "message": "Something went wrong", "type": "INTERNAL" }]
            })))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client
            .graphql::<Value>("query { viewer { login } }", &HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::GraphQL(ref entries) if entries.len() == 1));
    }

    #[tokio::test]
    async fn test_should_prefer_partial_data_over_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "repo_000": null },
                "errors": [{ "message": "Could not resolve to a Repository", "type": "NOT_FOUND" }]
            })))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let data: Value = client.graphql("query { ... }", &HashMap::new()).await.unwrap();
        assert!(data["repo_000"].is_null());
    }
}
