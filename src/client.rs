//! Unified client over the identity, proxy and app APIs.

use std::path::Path;
use std::sync::Arc;

use crate::app::AppClient;
use crate::core::{ClientConfig, Error, Session, SessionState};
use crate::identity::IdentityClient;
use crate::proxy::ProxyClient;

/// One session per API surface plus the matching resource clients.
///
/// All three sessions always carry the same token: [`authenticate`] and
/// [`set_token`] derive the new transports for every surface first and only
/// install them once all three succeeded.
///
/// [`authenticate`]: Self::authenticate
/// [`set_token`]: Self::set_token
///
/// ```no_run
/// use einvoice_client::{ClientConfig, EInvoiceClient, ListQuery};
///
/// let client = EInvoiceClient::new(ClientConfig::from_env()?)?;
/// client.authenticate("user@example.com", "secret")?;
/// let inbox = client.proxy().list_inbox(&ListQuery::new().page(0).size(20))?;
/// # Ok::<(), einvoice_client::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EInvoiceClient {
    identity: IdentityClient,
    proxy: ProxyClient,
    app: AppClient,
}

impl EInvoiceClient {
    /// Build the three sessions from `config`.
    ///
    /// A token in the config is applied to every surface; so is the log file.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let session = |base_url: &str| -> Result<Arc<Session>, Error> {
            let mut builder = Session::builder(base_url).options(config.options.clone());
            if let Some(token) = &config.token {
                builder = builder.token(token.as_str());
            }
            if let Some(path) = &config.log_file {
                builder = builder.log_file(path.as_path());
            }
            builder.build().map(Arc::new)
        };

        Ok(Self {
            identity: IdentityClient::new(session(&config.identity_url)?),
            proxy: ProxyClient::new(session(&config.proxy_url)?),
            app: AppClient::new(session(&config.app_url)?),
        })
    }

    /// Same as `new(config)` followed by `set_token(token)`.
    pub fn with_token(token: impl Into<String>, config: ClientConfig) -> Result<Self, Error> {
        let client = Self::new(config)?;
        client.set_token(token)?;
        Ok(client)
    }

    /// Log in against the identity API and share the token with all surfaces.
    ///
    /// # Errors
    ///
    /// Propagates the login error unchanged. If the token cannot be applied
    /// to every surface, the identity session is put back to its previous
    /// token so the three sessions stay in sync.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<String, Error> {
        let previous = self.identity_session().token();
        let token = self.identity.authenticate(email, password)?;

        if let Err(err) = self.set_token(token.as_str()) {
            let restored = match previous {
                Some(previous) => self.identity_session().set_token(previous),
                None => self.identity_session().clear_token(),
            };
            if let Err(e) = restored {
                tracing::warn!(error = %e, "could not restore identity session token");
            }
            return Err(err);
        }
        Ok(token)
    }

    /// Use `token` on all three surfaces.
    pub fn set_token(&self, token: impl Into<String>) -> Result<&Self, Error> {
        let token = token.into();
        self.fan_out(|session| session.derive(Some(token.as_str()), session.log_file().as_deref()))?;
        Ok(self)
    }

    /// Remove the token from all three surfaces.
    pub fn clear_token(&self) -> Result<&Self, Error> {
        self.fan_out(|session| session.derive(None, session.log_file().as_deref()))?;
        Ok(self)
    }

    /// Log requests of all three surfaces to `path`, or stop logging.
    pub fn set_log_file(&self, path: Option<&Path>) -> Result<&Self, Error> {
        self.fan_out(|session| session.derive(session.token().as_deref(), path))?;
        Ok(self)
    }

    /// Token shared by all surfaces.
    pub fn token(&self) -> Option<String> {
        self.identity_session().token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions().iter().all(|s| s.has_token())
    }

    pub fn identity(&self) -> &IdentityClient {
        &self.identity
    }

    pub fn proxy(&self) -> &ProxyClient {
        &self.proxy
    }

    pub fn app(&self) -> &AppClient {
        &self.app
    }

    pub fn identity_session(&self) -> &Arc<Session> {
        self.identity.session()
    }

    pub fn proxy_session(&self) -> &Arc<Session> {
        self.proxy.session()
    }

    pub fn app_session(&self) -> &Arc<Session> {
        self.app.session()
    }

    fn sessions(&self) -> [&Session; 3] {
        [
            &**self.identity_session(),
            &**self.proxy_session(),
            &**self.app_session(),
        ]
    }

    /// Derive a new state for every session, then install them all.
    /// Nothing is installed if any derivation fails.
    fn fan_out<F>(&self, derive: F) -> Result<(), Error>
    where
        F: Fn(&Session) -> Result<SessionState, Error>,
    {
        let sessions = self.sessions();
        let states = sessions
            .iter()
            .map(|&session| derive(session))
            .collect::<Result<Vec<_>, _>>()?;
        for (session, state) in sessions.into_iter().zip(states) {
            session.install(state);
        }
        Ok(())
    }
}
