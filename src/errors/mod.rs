//! Error handling module for the admin console.
//!
//! Every failure is reduced to a `ClientError` with a stable code and a display message,
//! which is what the store slices keep in their `error` field.

use serde::Deserialize;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const API_ERROR: &str = "API_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

/// Console error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The API answered 401; the session has been cleared
    Unauthorized(String),
    /// Any other non-success response from the API
    Api { status: u16, message: String },
    /// Connection-level failure before a response arrived
    Network(String),
    /// Response body did not match the expected shape
    Decode(String),
    /// Persisted token storage could not be read or written
    Storage(String),
    /// Client-side form validation failed; no request was issued
    Validation(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::Api { .. } => codes::API_ERROR,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Storage(_) => codes::STORAGE_ERROR,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized(msg) => msg.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(msg) => msg.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Storage(msg) => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
        }
    }

    /// HTTP status carried by the error, if the API produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an API error from a non-success response body.
    ///
    /// Prefers the message supplied by the API and falls back to a generic one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = api_message(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        if status == 401 {
            ClientError::Unauthorized(message)
        } else {
            ClientError::Api { status, message }
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        if err.is_decode() {
            ClientError::Decode(format!("Invalid response body: {}", err))
        } else {
            ClientError::Network(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ClientError::Storage(format!("Storage error: {}", err))
    }
}

/// Error body shapes the API is known to send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { error: ErrorDetails },
    Flat { message: String },
    Text { error: String },
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: String,
}

fn api_message(body: &str) -> Option<String> {
    let message = match serde_json::from_str::<ErrorBody>(body).ok()? {
        ErrorBody::Nested { error } => error.message,
        ErrorBody::Flat { message } => message,
        ErrorBody::Text { error } => error,
    };

    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}
