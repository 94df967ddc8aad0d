//! Request execution and response classification shared by all resource clients.

use std::borrow::Cow;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{ApiError, Error};
use super::session::Session;
use super::transport::RawResponse;

/// Fields checked, in order, for a human-readable error message.
///
/// Applied to the decoded body first, then to a nested `error` object.
pub const ERROR_MESSAGE_FIELDS: [&str; 5] =
    ["message", "error", "error_description", "detail", "title"];

/// Content type used by the XML document endpoints.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Query, headers and body of a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) basic_auth: Option<(String, String)>,
}

#[derive(Debug, Clone)]
pub(crate) enum RequestBody {
    Json(Vec<u8>),
    Raw { bytes: Vec<u8>, content_type: String },
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter only when `value` is set.
    pub fn query_opt<V: Into<String>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn queries<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Some(RequestBody::Json(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Send `bytes` verbatim with the given content type.
    pub fn raw(mut self, bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw {
            bytes: bytes.into(),
            content_type: content_type.into(),
        });
        self
    }

    /// Send an XML document as `text/xml`.
    pub fn xml(self, document: impl Into<Vec<u8>>) -> Self {
        self.raw(document, XML_CONTENT_TYPE)
    }

    /// Authenticate this request with Basic credentials instead of the
    /// session token.
    pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((user.into(), password.into()));
        self
    }
}

/// Execute a request and decode its JSON body.
///
/// An empty 2xx body yields an empty JSON object.
pub fn send_json(
    session: &Session,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<Value, Error> {
    let response = execute(session, &method, path, options)?;
    Ok(decode_body(&method, path, &response)?)
}

/// Execute a request and return the raw 2xx body (PDF, XML, ...).
pub fn send_raw(
    session: &Session,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<Vec<u8>, Error> {
    Ok(execute(session, &method, path, options)?.body)
}

/// Execute a request and return the whole 2xx response, headers included.
pub fn send_with_headers(
    session: &Session,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<RawResponse, Error> {
    execute(session, &method, path, options)
}

fn execute(
    session: &Session,
    method: &Method,
    path: &str,
    options: RequestOptions,
) -> Result<RawResponse, Error> {
    let response = match session.client().request(method.clone(), path, options) {
        Ok(response) => response,
        Err(Error::Http(e)) => return Err(network_error(method, path, &e).into()),
        Err(e) => return Err(e),
    };

    if response.is_success() {
        Ok(response)
    } else {
        let err = status_error(method, path, &response);
        tracing::debug!(method = %method, path, status = response.status, message = %err.message, "API error");
        Err(err.into())
    }
}

/// Decode a 2xx body. Empty bodies become `{}`.
///
/// The bytes are parsed as they are, so invalid UTF-8 is rejected; the lossy
/// text only ends up in the error's body snapshot.
pub fn decode_body(method: &Method, path: &str, response: &RawResponse) -> Result<Value, ApiError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        ApiError::new(format!("Invalid JSON response: {e}"), response.status)
            .with_request(method.as_str(), path)
            .with_body(Value::String(response.text().into_owned()))
    })
}

/// Classify a non-2xx response.
///
/// The message has the shape `"{label}: {status} - {detail}"`, e.g.
/// `"Not Found: 404 - Document not found"`.
pub fn status_error(method: &Method, path: &str, response: &RawResponse) -> ApiError {
    let status = response.status;
    let text = response.text();
    let body = parse_error_body(&text);
    let detail = extract_error_message(&body)
        .map(Cow::Owned)
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                Cow::Borrowed(
                    StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or(""),
                )
            } else {
                text.clone()
            }
        });

    ApiError::new(
        format!("{}: {status} - {detail}", status_label(status)),
        status,
    )
    .with_request(method.as_str(), path)
    .with_body(body)
}

fn parse_error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Category label for a status code.
pub fn status_label(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Validation Error",
        429 => "Rate Limit Exceeded",
        s if s >= 500 => "Server Error",
        _ => "API Error",
    }
}

/// Find the first non-empty message among [`ERROR_MESSAGE_FIELDS`],
/// looking one level into a nested `error` object if needed.
pub fn extract_error_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    first_message(object)
        .or_else(|| {
            object
                .get("error")
                .and_then(Value::as_object)
                .and_then(first_message)
        })
        .map(str::to_string)
}

fn first_message(object: &Map<String, Value>) -> Option<&str> {
    ERROR_MESSAGE_FIELDS.iter().find_map(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    })
}

/// Kind of failure when no usable HTTP response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    Connection,
    Server,
    Client,
    TooManyRedirects,
    Request,
    Network,
}

impl NetworkFailure {
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            return Self::Connection;
        }
        if let Some(status) = err.status() {
            return if status.is_server_error() {
                Self::Server
            } else if status.is_client_error() {
                Self::Client
            } else {
                Self::Request
            };
        }
        if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_builder() || err.is_request() || err.is_body() {
            Self::Request
        } else {
            Self::Network
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Connection => "Connection Error",
            Self::Server => "Server Error",
            Self::Client => "Client Error",
            Self::TooManyRedirects => "Too Many Redirects",
            Self::Request => "Request Error",
            Self::Network => "Network Error",
        }
    }
}

/// Wrap a transport failure as an [`ApiError`] with status code 0.
pub(crate) fn network_error(method: &Method, path: &str, err: &reqwest::Error) -> ApiError {
    let failure = NetworkFailure::classify(err);
    tracing::warn!(method = %method, path, kind = failure.label(), error = %err, "request failed");
    ApiError::new(format!("{}: {err}", failure.label()), 0).with_request(method.as_str(), path)
}

/// Percent-encode a caller-supplied path segment.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}
