//! # einvoice-client
//!
//! Blocking client for the three APIs of the e-invoicing platform:
//! identity/KYC, the document-transmission proxy and the business app.
//!
//! Every call is one synchronous round trip. Failures come back as
//! [`core::Error`]: 401 is always [`Error::Authentication`](core::Error::Authentication),
//! 500 is [`Error::Server`](core::Error::Server), everything else that is not
//! a 2xx is an [`ApiError`](core::ApiError) whose message starts with a
//! category derived from the status code (`"Not Found: 404 - ..."`).
//! Network failures are `ApiError`s with status code 0. Nothing is retried.
//!
//! ## Quick Start
//!
//! ```no_run
//! use einvoice_client::{ClientConfig, DocumentFlags, EInvoiceClient};
//!
//! let client = EInvoiceClient::new(ClientConfig::default().log_file("requests.log"))?;
//! let token = client.authenticate("user@example.com", "secret")?;
//!
//! let xml = std::fs::read_to_string("invoice.xml").unwrap();
//! let document = client.proxy().create_document(&xml, &DocumentFlags::new().draft(true))?;
//! println!("created {}", document["id"]);
//! # Ok::<(), einvoice_client::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `identity` | Login, registration, contract and signing endpoints |
//! | `proxy` | Document validation, transmission and inbox |
//! | `app` | Company, customers, products, invoices |
//! | `client` (default) | [`EInvoiceClient`] over all three |

pub mod core;

#[cfg(feature = "identity")]
pub mod identity;

#[cfg(feature = "proxy")]
pub mod proxy;

#[cfg(feature = "app")]
pub mod app;

#[cfg(feature = "client")]
mod client;

// Re-export core types at crate root for convenience
pub use crate::core::*;

#[cfg(feature = "client")]
pub use crate::client::EInvoiceClient;

#[cfg(feature = "proxy")]
pub use crate::proxy::DocumentFlags;
