use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// Production base URL of the identity/KYC API.
pub const DEFAULT_IDENTITY_URL: &str = "https://identity.einvoice-platform.com/api";
/// Production base URL of the document-transmission proxy API.
pub const DEFAULT_PROXY_URL: &str = "https://proxy.einvoice-platform.com/api";
/// Production base URL of the business app API.
pub const DEFAULT_APP_URL: &str = "https://app.einvoice-platform.com/api";

/// Per-request timeout used unless overridden.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEOUT_MS: u64 = DEFAULT_TIMEOUT_SECS * 1000;

/// Environment variables read by [`ClientConfig::from_env`].
pub mod env {
    pub const IDENTITY_URL: &str = "EINVOICE_IDENTITY_URL";
    pub const PROXY_URL: &str = "EINVOICE_PROXY_URL";
    pub const APP_URL: &str = "EINVOICE_APP_URL";
    pub const TOKEN: &str = "EINVOICE_TOKEN";
    pub const LOG_FILE: &str = "EINVOICE_LOG_FILE";
    pub const TIMEOUT_SECS: &str = "EINVOICE_TIMEOUT_SECS";
}

/// Extra options applied to every transport a session derives.
///
/// Headers given here override the defaults (`Accept`, `Content-Type`,
/// `User-Agent`). `Authorization` is always taken from the session token.
///
/// Timeouts are kept in milliseconds. A timeout of exactly zero disables it;
/// any non-zero duration, however short, is kept as at least 1 ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    pub timeout_ms: u64,
    pub connect_timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: None,
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

impl TransportOptions {
    /// Total time allowed per request. `Duration::ZERO` means no limit.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_millis(timeout);
        self
    }

    /// Time allowed to establish a connection. `Duration::ZERO` means no limit.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(duration_to_millis(timeout));
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub(crate) fn timeout_duration(&self) -> Option<Duration> {
        millis_to_duration(self.timeout_ms)
    }

    pub(crate) fn connect_timeout_duration(&self) -> Option<Duration> {
        self.connect_timeout_ms.and_then(millis_to_duration)
    }
}

fn duration_to_millis(timeout: Duration) -> u64 {
    if timeout.is_zero() {
        return 0;
    }
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn millis_to_duration(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Configuration for all three API surfaces.
///
/// Passed explicitly to the facade; there is no global configuration.
///
/// ```
/// use einvoice_client::core::ClientConfig;
///
/// let config = ClientConfig::default()
///     .proxy_url("https://proxy.staging.example/api")
///     .log_file("/tmp/einvoice.log");
/// assert_eq!(config.proxy_url, "https://proxy.staging.example/api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub identity_url: String,
    pub proxy_url: String,
    pub app_url: String,
    pub token: Option<String>,
    pub log_file: Option<PathBuf>,
    pub options: TransportOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            token: None,
            log_file: None,
            options: TransportOptions::default(),
        }
    }
}

impl ClientConfig {
    pub fn identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = url.into();
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = url.into();
        self
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = url.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a configuration from `EINVOICE_*` environment variables,
    /// falling back to the production defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = get(env::IDENTITY_URL) {
            config.identity_url = url;
        }
        if let Some(url) = get(env::PROXY_URL) {
            config.proxy_url = url;
        }
        if let Some(url) = get(env::APP_URL) {
            config.app_url = url;
        }
        config.token = get(env::TOKEN);
        config.log_file = get(env::LOG_FILE).map(PathBuf::from);
        if let Some(secs) = get(env::TIMEOUT_SECS) {
            let parsed: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a number of seconds, got {secs:?}", env::TIMEOUT_SECS))
            })?;
            config.options.timeout_ms = parsed.saturating_mul(1000);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.proxy_url, DEFAULT_PROXY_URL);
        assert_eq!(config.app_url, DEFAULT_APP_URL);
        assert_eq!(config.options.timeout_ms, 30_000);
        assert!(config.token.is_none());
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (env::PROXY_URL, "http://localhost:8080/"),
            (env::TOKEN, "T1"),
            (env::LOG_FILE, "/tmp/requests.log"),
            (env::TIMEOUT_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.proxy_url, "http://localhost:8080/");
        assert_eq!(config.token.as_deref(), Some("T1"));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/requests.log")));
        assert_eq!(config.options.timeout_ms, 5_000);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[(env::TOKEN, "  ")])).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn invalid_timeout_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(env::TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn sub_second_timeouts_are_kept() {
        let options = TransportOptions::default()
            .timeout(Duration::from_millis(500))
            .connect_timeout(Duration::from_millis(1500));
        assert_eq!(options.timeout_duration(), Some(Duration::from_millis(500)));
        assert_eq!(options.connect_timeout_duration(), Some(Duration::from_millis(1500)));

        let tiny = TransportOptions::default().timeout(Duration::from_micros(10));
        assert_eq!(tiny.timeout_duration(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn only_explicit_zero_disables_timeouts() {
        let options = TransportOptions::default()
            .timeout(Duration::ZERO)
            .connect_timeout(Duration::ZERO);
        assert_eq!(options.timeout_ms, 0);
        assert_eq!(options.timeout_duration(), None);
        assert_eq!(options.connect_timeout_duration(), None);
        assert_eq!(
            TransportOptions::default().timeout_duration(),
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"app_url":"http://app.local","options":{"headers":{"X-Tenant":"acme"}}}"#,
        )
        .unwrap();
        assert_eq!(config.app_url, "http://app.local");
        assert_eq!(config.proxy_url, DEFAULT_PROXY_URL);
        assert_eq!(config.options.timeout_ms, 30_000);
        assert_eq!(config.options.headers["X-Tenant"], "acme");
    }
}
