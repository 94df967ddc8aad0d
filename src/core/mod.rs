//! Sessions, transport, configuration and error handling shared by all
//! API surfaces.
//!
//! A [`Session`] holds the base URL, token and log file of one surface and
//! owns the current [`Transport`]. Resource clients run their requests
//! through [`request::send_json`] and friends, which classify every
//! outcome into [`Error`].

mod config;
mod error;
mod log;
mod query;
pub mod request;
mod session;
mod transport;

pub use config::*;
pub use error::*;
pub use log::RequestLog;
pub use query::ListQuery;
pub use request::{NetworkFailure, RequestOptions};
#[cfg_attr(not(feature = "client"), allow(unused_imports))]
pub(crate) use session::SessionState;
pub use session::{Session, SessionBuilder, normalize_base_url};
pub use transport::{DEFAULT_USER_AGENT, RawResponse, Transport};
