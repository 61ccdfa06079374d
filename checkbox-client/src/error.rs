//! Client error types

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a 5xx status
    #[error("Failed to make request [status={status}, text={body:?}]")]
    Server { status: u16, body: String },

    /// Server rejected the request payload (422)
    #[error("API validation error [status={status}]: {content}")]
    ApiValidation { status: u16, content: Value },

    /// Server answered with any other 4xx status
    #[error("API error [status={status}]: {content}")]
    Api { status: u16, content: Value },

    /// Response body does not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request input is malformed; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Polled field never reached one of the expected values
    #[error(
        "Object did not change field {field:?} to one of expected values {expected:?} (actually {actual}) in {:.3} seconds",
        .elapsed.as_secs_f64()
    )]
    StatusTimeout {
        field: String,
        expected: Vec<String>,
        actual: Value,
        elapsed: Duration,
    },

    /// Polled entity settled in its failure state
    #[error(transparent)]
    TerminalStatus(#[from] StatusFailure),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure details copied from the transaction attached to a settled entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{operation} in due to transaction status moved to {:?}: {:?} {:?}",
    dash(.status),
    dash(.response_status),
    dash(.response_error_message)
)]
pub struct StatusFailure {
    /// Which operation was being waited on, e.g. "Shift can not be opened"
    pub operation: &'static str,
    pub status: Option<String>,
    pub response_status: Option<String>,
    pub response_error_message: Option<String>,
}

impl StatusFailure {
    /// Builds the failure from a transaction object. A missing transaction
    /// yields a failure with every field empty.
    pub fn from_transaction(operation: &'static str, transaction: Option<&Value>) -> Self {
        let field = |name: &str| {
            transaction
                .and_then(|t| t.get(name))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };
        Self {
            operation,
            status: field("status"),
            response_status: field("response_status"),
            response_error_message: field("response_error_message"),
        }
    }
}

fn dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Maps a non-success HTTP status onto the transport error variants.
pub(crate) fn error_for_status(status: u16, body: &[u8]) -> Option<ClientError> {
    if status < 400 {
        return None;
    }
    let text = String::from_utf8_lossy(body).into_owned();
    if status >= 500 {
        return Some(ClientError::Server { status, body: text });
    }
    let content = serde_json::from_slice(body).unwrap_or(Value::String(text));
    if status == 422 {
        Some(ClientError::ApiValidation { status, content })
    } else {
        Some(ClientError::Api { status, content })
    }
}
