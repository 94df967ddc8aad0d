use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::core::request::{self, RequestOptions, encode_segment};
use crate::core::{ApiError, Error, ListQuery, Session};

use super::signing::SigningOutcome;

const LOGIN_PATH: &str = "/auth/login";

/// Client for the identity/registration API.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    session: Arc<Session>,
}

impl IdentityClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Log in with Basic credentials and return the bearer token.
    ///
    /// The token is also set on this client's session.
    ///
    /// # Errors
    ///
    /// [`Error::Authentication`] for wrong credentials; an [`ApiError`] if
    /// the response carries no `token` (or `access_token`) string.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<String, Error> {
        let options = RequestOptions::new().basic_auth(email, password);
        let response =
            request::send_with_headers(&self.session, Method::POST, LOGIN_PATH, options)?;
        let body = request::decode_body(&Method::POST, LOGIN_PATH, &response)?;

        let token = ["token", "access_token"]
            .iter()
            .find_map(|field| body.get(*field).and_then(Value::as_str))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::new(
                    "Invalid authentication response: no token in body",
                    response.status,
                )
                .with_request(Method::POST.as_str(), LOGIN_PATH)
                .with_body(body.clone())
            })?;

        self.session.set_token(token.as_str())?;
        tracing::info!(base_url = %self.session.base_url(), "authenticated");
        Ok(token)
    }

    /// Invalidate the current token on the server.
    pub fn logout(&self) -> Result<Value, Error> {
        self.post("/auth/logout", RequestOptions::new())
    }

    /// Account of the authenticated user.
    pub fn me(&self) -> Result<Value, Error> {
        self.get("/auth/me", RequestOptions::new())
    }

    pub fn list_registrations(&self, query: &ListQuery) -> Result<Value, Error> {
        self.get("/registrations", query.to_options())
    }

    pub fn create_registration(&self, registration: &Value) -> Result<Value, Error> {
        self.post("/registrations", RequestOptions::new().json(registration)?)
    }

    pub fn get_registration(&self, id: &str) -> Result<Value, Error> {
        self.get(&registration_path(id, ""), RequestOptions::new())
    }

    pub fn update_registration(&self, id: &str, registration: &Value) -> Result<Value, Error> {
        request::send_json(
            &self.session,
            Method::PUT,
            &registration_path(id, ""),
            RequestOptions::new().json(registration)?,
        )
    }

    /// Submit a completed registration for review.
    pub fn submit_registration(&self, id: &str) -> Result<Value, Error> {
        self.post(&registration_path(id, "/submit"), RequestOptions::new())
    }

    /// Download the contract to be signed, as PDF bytes.
    pub fn contract_pdf(&self, id: &str) -> Result<Vec<u8>, Error> {
        request::send_raw(
            &self.session,
            Method::GET,
            &registration_path(id, "/contract"),
            RequestOptions::new().header("Accept", "application/pdf"),
        )
    }

    /// Start the electronic signing flow for a registration.
    pub fn start_signing(&self, id: &str, signer: &Value) -> Result<Value, Error> {
        self.post(
            &registration_path(id, "/signing"),
            RequestOptions::new().json(signer)?,
        )
    }

    /// Finish signing. Returns the signed document together with the
    /// `Registration-Status` and `Registration-Provider` response headers.
    pub fn finalize_signing(&self, id: &str, confirmation: &Value) -> Result<SigningOutcome, Error> {
        let response = request::send_with_headers(
            &self.session,
            Method::POST,
            &registration_path(id, "/signing/finalize"),
            RequestOptions::new()
                .header("Accept", "application/pdf, application/json")
                .json(confirmation)?,
        )?;
        Ok(SigningOutcome::from(response))
    }

    fn get(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        request::send_json(&self.session, Method::GET, path, options)
    }

    fn post(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        request::send_json(&self.session, Method::POST, path, options)
    }
}

fn registration_path(id: &str, suffix: &str) -> String {
    format!("/registrations/{}{suffix}", encode_segment(id))
}
