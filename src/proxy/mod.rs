//! Document-transmission proxy API.
//!
//! Validates, stores and sends UBL documents as raw XML and exposes the
//! inbox of received documents.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use einvoice_client::core::Session;
//! use einvoice_client::proxy::{DocumentFlags, ProxyClient};
//!
//! let session = Arc::new(Session::builder("https://proxy.example/api").token("T1").build()?);
//! let proxy = ProxyClient::new(session);
//! let xml = std::fs::read_to_string("invoice.xml").unwrap();
//! proxy.validate_document(&xml)?;
//! let created = proxy.create_document(&xml, &DocumentFlags::new().draft(true))?;
//! # Ok::<(), einvoice_client::core::Error>(())
//! ```

mod client;
mod flags;

pub use client::ProxyClient;
pub use flags::DocumentFlags;
