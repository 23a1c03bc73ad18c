use std::time::Duration;

use thiserror::Error;

/// Opaque error produced by a hook or transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single request dispatched through a [`crate::RequestBuilder`].
///
/// Sources are forwarded unchanged so callers can downcast them.
#[derive(Error, Debug)]
pub enum RestError {
    /// The `OnSend` hook rejected the request; nothing was sent
    #[error("request rejected by send hook: {0}")]
    Hook(#[source] BoxError),

    /// The transport failed to deliver the request or read its response
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

/// Errors raised by the bundled [`crate::HttpTransport`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpTransportError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUri { url: String, reason: String },

    /// Only plain `http` is supported
    #[error("URL scheme '{0}' not supported")]
    UnsupportedScheme(String),

    #[error("failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("connection error: {0}")]
    Connection(#[source] BoxError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<hyper::Error> for HttpTransportError {
    fn from(err: hyper::Error) -> Self {
        HttpTransportError::Connection(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpTransportError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        HttpTransportError::Connection(Box::new(err))
    }
}
