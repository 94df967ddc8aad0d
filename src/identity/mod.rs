//! Identity API: login, account, company registration (KYC) and signing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use einvoice_client::core::Session;
//! use einvoice_client::identity::IdentityClient;
//!
//! let session = Arc::new(Session::new("https://identity.example/api")?);
//! let identity = IdentityClient::new(session);
//! let token = identity.authenticate("user@example.com", "secret")?;
//! let me = identity.me()?;
//! # Ok::<(), einvoice_client::core::Error>(())
//! ```

mod client;
mod signing;

pub use client::IdentityClient;
pub use signing::{REGISTRATION_PROVIDER_HEADER, REGISTRATION_STATUS_HEADER, SigningOutcome};
