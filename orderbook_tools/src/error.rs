use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderbookApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    InvalidRequest(String),
    #[error("The orderbook API is unreachable: {0}")]
    Unavailable(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
}

impl OrderbookApiError {
    /// The HTTP status returned by the orderbook, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::QueryError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport failures, rate limiting (429) and server-side (5xx) errors may succeed if tried again later.
    /// Client errors (4xx) and malformed responses will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::QueryError { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Initialization(_) | Self::InvalidRequest(_) | Self::JsonError(_) => false,
        }
    }
}

/// Pulls a human-readable message out of an error response body.
///
/// The orderbook replies with JSON such as `{"statusCode":400,"message":"...","error":"Bad Request"}`, where
/// `message` is sometimes a list of validation failures. If none of the known fields are present, the raw body text is
/// used.
pub fn error_message_from_body(body: &str) -> String {
    let body = body.trim();
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    ["message", "description", "error"]
        .iter()
        .find_map(|key| match &json[*key] {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) if !items.is_empty() => {
                let parts = items
                    .iter()
                    .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<String>>();
                Some(parts.join(", "))
            },
            _ => None,
        })
        .unwrap_or_else(|| body.to_string())
}
