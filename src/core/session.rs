use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::Url;

use super::config::TransportOptions;
use super::error::Error;
use super::transport::Transport;

/// Connection settings for one API surface.
///
/// A session owns the current [`Transport`]. Changing the token or the log
/// file derives a complete new transport and swaps it in; the previous one is
/// never modified, so handles obtained earlier through [`client`](Self::client)
/// keep working with the settings they were created with.
///
/// ```
/// use einvoice_client::core::Session;
///
/// let session = Session::new("https://proxy.example/api/").unwrap();
/// assert_eq!(session.base_url(), "https://proxy.example/api");
///
/// let before = session.client();
/// session.set_token("T1").unwrap();
/// let after = session.client();
/// assert!(!before.same_instance(&after));
/// assert_eq!(after.bearer_token(), Some("T1"));
/// assert_eq!(before.bearer_token(), None);
/// ```
pub struct Session {
    base_url: String,
    options: TransportOptions,
    state: RwLock<SessionState>,
}

/// Token, log file and the transport derived from them.
pub(crate) struct SessionState {
    token: Option<String>,
    log_file: Option<PathBuf>,
    transport: Transport,
}

/// Builder for [`Session`].
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    base_url: String,
    token: Option<String>,
    options: TransportOptions,
    log_file: Option<PathBuf>,
}

impl SessionBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Validate the base URL and build the first transport.
    pub fn build(self) -> Result<Session, Error> {
        let base_url = normalize_base_url(&self.base_url);
        Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;

        let transport = Transport::build(
            base_url,
            self.token.as_deref(),
            &self.options,
            self.log_file.as_deref(),
        )?;

        Ok(Session {
            base_url: base_url.to_string(),
            options: self.options,
            state: RwLock::new(SessionState {
                token: self.token,
                log_file: self.log_file,
                transport,
            }),
        })
    }
}

impl Session {
    /// Session without token or log file, default options.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            base_url: base_url.into(),
            token: None,
            options: TransportOptions::default(),
            log_file: None,
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn has_token(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.read().log_file.clone()
    }

    /// The current transport.
    ///
    /// Do not keep the handle across [`set_token`](Self::set_token) or
    /// [`set_log_file`](Self::set_log_file): it stays usable but carries the
    /// old settings.
    pub fn client(&self) -> Transport {
        self.read().transport.clone()
    }

    /// Store `token` and switch to a transport sending `Authorization: Bearer <token>`.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), Error> {
        let token = token.into();
        let state = self.derive(Some(token.as_str()), self.log_file().as_deref())?;
        self.install(state);
        Ok(())
    }

    /// Drop the token and switch to an unauthenticated transport.
    pub fn clear_token(&self) -> Result<(), Error> {
        let state = self.derive(None, self.log_file().as_deref())?;
        self.install(state);
        Ok(())
    }

    /// Log every request/response to `path`, or stop logging with `None`.
    ///
    /// If the file cannot be opened the session keeps its previous transport
    /// and log file.
    pub fn set_log_file(&self, path: Option<&Path>) -> Result<(), Error> {
        let state = self.derive(self.token().as_deref(), path)?;
        self.install(state);
        Ok(())
    }

    /// Build the state for the given token and log file without touching the
    /// current one.
    pub(crate) fn derive(
        &self,
        token: Option<&str>,
        log_file: Option<&Path>,
    ) -> Result<SessionState, Error> {
        let transport = Transport::build(&self.base_url, token, &self.options, log_file)?;
        Ok(SessionState {
            token: token.map(str::to_string),
            log_file: log_file.map(Path::to_path_buf),
            transport,
        })
    }

    /// Swap in a state produced by [`derive`](Self::derive).
    pub(crate) fn install(&self, state: SessionState) {
        tracing::debug!(
            base_url = %self.base_url,
            authenticated = state.token.is_some(),
            logging = state.log_file.is_some(),
            "session transport replaced"
        );
        *self.write() = state;
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("token", &state.token.as_ref().map(|_| "***"))
            .field("log_file", &state.log_file)
            .field("options", &self.options)
            .finish()
    }
}

/// Strip trailing slashes so paths can be appended as `"/resource"`.
pub fn normalize_base_url(url: &str) -> &str {
    url.trim_end_matches('/')
}
