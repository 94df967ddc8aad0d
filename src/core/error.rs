use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by sessions, transports and resource clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The remote API answered 401. The response body is discarded.
    #[error("Authentication failure")]
    Authentication {
        /// Request path relative to the surface base URL.
        endpoint: Option<String>,
        /// HTTP method of the rejected request.
        method: Option<String>,
    },

    /// The remote API answered 500.
    #[error("Internal server error: {body}")]
    Server {
        /// Raw response body.
        body: String,
        /// Request path relative to the surface base URL.
        endpoint: Option<String>,
        /// HTTP method of the failed request.
        method: Option<String>,
    },

    /// Any other non-2xx answer, a malformed 2xx body or a network failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The underlying HTTP client failed before a response was received.
    ///
    /// Only returned by [`Transport::request`](super::Transport::request);
    /// resource clients convert it into an [`ApiError`] with status code 0.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request log file could not be opened for appending.
    #[error("cannot open request log {}: {source}", .path.display())]
    RequestLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid base URL, header or client option.
    #[error("configuration error: {0}")]
    Config(String),

    /// A request body could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status code associated with this error, `0` when none was received.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Authentication { .. } => 401,
            Self::Server { .. } => 500,
            Self::Api(e) => e.status_code,
            _ => 0,
        }
    }

    /// Request path of the failed call, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Authentication { endpoint, .. } | Self::Server { endpoint, .. } => {
                endpoint.as_deref()
            }
            Self::Api(e) => e.endpoint.as_deref(),
            _ => None,
        }
    }

    /// HTTP method of the failed call, when known.
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Authentication { method, .. } | Self::Server { method, .. } => method.as_deref(),
            Self::Api(e) => e.method.as_deref(),
            _ => None,
        }
    }

    /// Returns the inner [`ApiError`], if any.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Whether retrying the same request later could succeed.
    ///
    /// The crate never retries by itself; this is a hint for caller policies.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Server { .. } | Self::Http(_) => true,
            Self::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Classification of an [`ApiError`], derived from its status code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No HTTP response was received (status code 0).
    Network,
    /// 4xx.
    Client,
    /// 5xx.
    Server,
    /// Anything else, e.g. a 2xx with an unparseable body.
    Other,
}

impl ErrorKind {
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            0 => Self::Network,
            400..=499 => Self::Client,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

/// An API call failed with a classified message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Human-readable message including the category prefix,
    /// e.g. `"Not Found: 404 - Document not found"`.
    pub message: String,
    /// HTTP status code; `0` for network-level failures.
    pub status_code: u16,
    /// Request path relative to the surface base URL.
    pub endpoint: Option<String>,
    /// HTTP method.
    pub method: Option<String>,
    /// Decoded response body, or the raw body as a JSON string when it
    /// was not valid JSON. `Value::Null` when there was no body.
    pub body: Value,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
            endpoint: None,
            method: None,
            body: Value::Null,
        }
    }

    /// Attach the request that produced this error.
    pub fn with_request(mut self, method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Attach the response body snapshot.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_status(self.status_code)
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.kind() == ErrorKind::Server
    }

    /// Network failures, 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Server) || self.status_code == 429
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
