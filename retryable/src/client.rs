//! Errors from HTTP calls made through an operation.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::OperationError;

/// JSON pointers searched, in order, for a human readable message in an
/// error response body.
const MESSAGE_POINTERS: [&str; 3] =
    ["/message", "/response/data/message", "/data/message"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(_) => None,
        }
    }
}

impl OperationError for ClientError {
    fn response_message(&self) -> Option<String> {
        match self {
            Self::APIError(_, body) => extract_message(body),
            Self::Network(_) => None,
        }
    }
}

/// Pull the message out of an error body.
///
/// JSON bodies yield their `message` field (also looked up under
/// `response.data` and `data`); plain text bodies are returned as they are.
pub fn extract_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => MESSAGE_POINTERS
            .iter()
            .find_map(|pointer| value.pointer(pointer).and_then(Value::as_str))
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
