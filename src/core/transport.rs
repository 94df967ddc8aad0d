//! Blocking HTTP transport with the fixed 401/500 policy.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use reqwest::Method;
use reqwest::Version;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};

use super::config::TransportOptions;
use super::error::Error;
use super::log::RequestLog;
use super::request::{RequestBody, RequestOptions};

/// `User-Agent` sent unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("einvoice-client/", env!("CARGO_PKG_VERSION"));

/// A configured HTTP client bound to one base URL.
///
/// Cloning is cheap and yields the same instance (see
/// [`same_instance`](Self::same_instance)). A transport is never mutated:
/// sessions derive a new one whenever their token or log file changes, and
/// handles to the previous transport keep working with the previous settings.
#[derive(Debug, Clone)]
pub struct Transport {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
    log: Option<RequestLog>,
}

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Value of a response header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl Transport {
    /// Build a transport from scratch.
    ///
    /// `base_url` must already be normalized. Opens the log file when given.
    pub(crate) fn build(
        base_url: &str,
        token: Option<&str>,
        options: &TransportOptions,
        log_file: Option<&Path>,
    ) -> Result<Self, Error> {
        let default_headers = default_headers(token, options)?;
        let log = log_file.map(RequestLog::open).transpose()?;

        let mut builder = Client::builder()
            .default_headers(default_headers.clone())
            .timeout(options.timeout_duration());
        if let Some(connect_timeout) = options.connect_timeout_duration() {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: base_url.to_string(),
                default_headers,
                log,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Headers attached to every request, including `Authorization`.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.inner.default_headers
    }

    /// Current bearer token, read back from the `Authorization` header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.inner
            .default_headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    pub fn request_log(&self) -> Option<&RequestLog> {
        self.inner.log.as_ref()
    }

    /// Whether both handles point at the same transport instance.
    pub fn same_instance(&self, other: &Transport) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute one request and block until the full response is read.
    ///
    /// `path` is appended to the base URL as is; callers encode segments.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] on 401, whatever the body says;
    /// - [`Error::Server`] on 500, carrying the response body;
    /// - [`Error::Http`] when no response could be obtained.
    ///
    /// Every other status, including other 4xx/5xx, is returned as is.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, Error> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut builder = self.inner.client.request(method.clone(), &url);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some((user, password)) = &options.basic_auth {
            builder = builder.basic_auth(user, Some(password));
        }
        match options.body {
            Some(RequestBody::Json(bytes)) => {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes);
            }
            Some(RequestBody::Raw {
                bytes,
                content_type,
            }) => {
                builder = builder.header(CONTENT_TYPE, content_type).body(bytes);
            }
            None => {}
        }

        let request = builder.build()?;

        if let Some(log) = &self.inner.log {
            let mut headers = self.inner.default_headers.clone();
            for (name, value) in request.headers() {
                headers.insert(name.clone(), value.clone());
            }
            let body = request
                .body()
                .and_then(|b| b.as_bytes())
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            log.log_request(
                request.method().as_str(),
                request.url().as_str(),
                version_str(request.version()),
                &body,
                &headers,
            );
        }

        tracing::debug!(method = %method, url = %request.url(), "sending request");
        let response = self.inner.client.execute(request)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        tracing::debug!(method = %method, path, status, "response received");

        let response = RawResponse {
            status,
            headers,
            body,
        };

        if let Some(log) = &self.inner.log {
            log.log_response(status, &response.text());
        }

        match status {
            401 => Err(Error::Authentication {
                endpoint: Some(path.to_string()),
                method: Some(method.to_string()),
            }),
            500 => {
                let body = response.text().into_owned();
                tracing::warn!(method = %method, path, body = %body, "internal server error");
                Err(Error::Server {
                    body,
                    endpoint: Some(path.to_string()),
                    method: Some(method.to_string()),
                })
            }
            _ => Ok(response),
        }
    }
}

/// Default headers for a transport: JSON content negotiation, user agent,
/// caller headers on top, then the bearer token.
pub(crate) fn default_headers(
    token: Option<&str>,
    options: &TransportOptions,
) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(USER_AGENT, header_value(user_agent)?);

    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Config(format!("invalid header name {name:?}: {e}")))?;
        headers.insert(name, header_value(value)?);
    }

    if let Some(token) = token {
        let mut value = header_value(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Config(format!("invalid header value {value:?}: {e}")))
}

fn version_str(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "0.9"
    } else if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2.0"
    } else if version == Version::HTTP_3 {
        "3.0"
    } else {
        "1.1"
    }
}
