//! API error types.

/// Errors from the forge API.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// GraphQL errors returned in the response body.
    #[error("GraphQL: {0:?}")]
    GraphQL(Vec<GraphQLErrorEntry>),

    /// Network/transport error.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse API response: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// A single GraphQL error entry.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GraphQLErrorEntry {
    /// Error message.
    pub message: String,
    /// Error type (if provided).
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    /// Path to the field that caused the error.
    pub path: Option<Vec<serde_json::Value>>,
}

impl ApiError {
    /// Whether this is a 404 Not Found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Whether this is a 401 Unauthorized error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }
}
