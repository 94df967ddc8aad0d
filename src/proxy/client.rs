use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::core::request::{self, RequestOptions, XML_CONTENT_TYPE, encode_segment};
use crate::core::{Error, ListQuery, Session};

use super::flags::DocumentFlags;

/// Client for the document-transmission proxy API.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    session: Arc<Session>,
}

impl ProxyClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Validate a UBL document without storing it.
    pub fn validate_document(&self, xml: &str) -> Result<Value, Error> {
        self.send(
            Method::POST,
            "/documents/validate",
            RequestOptions::new().xml(xml),
        )
    }

    /// Store a UBL document and, unless it is a draft, queue it for sending.
    pub fn create_document(&self, xml: &str, flags: &DocumentFlags) -> Result<Value, Error> {
        self.send(
            Method::POST,
            "/documents",
            flags.apply(RequestOptions::new().xml(xml)),
        )
    }

    /// Replace the XML of a stored document.
    pub fn update_document(
        &self,
        id: &str,
        xml: &str,
        flags: &DocumentFlags,
    ) -> Result<Value, Error> {
        self.send(
            Method::PUT,
            &document_path(id, ""),
            flags.apply(RequestOptions::new().xml(xml)),
        )
    }

    /// Send a stored (draft) document.
    pub fn send_document(&self, id: &str) -> Result<Value, Error> {
        self.send(Method::POST, &document_path(id, "/send"), RequestOptions::new())
    }

    pub fn get_document(&self, id: &str) -> Result<Value, Error> {
        self.send(Method::GET, &document_path(id, ""), RequestOptions::new())
    }

    /// Raw UBL XML of a stored document.
    pub fn document_xml(&self, id: &str) -> Result<Vec<u8>, Error> {
        request::send_raw(
            &self.session,
            Method::GET,
            &document_path(id, "/xml"),
            RequestOptions::new().header("Accept", XML_CONTENT_TYPE),
        )
    }

    pub fn list_documents(&self, query: &ListQuery) -> Result<Value, Error> {
        self.send(Method::GET, "/documents", query.to_options())
    }

    pub fn delete_document(&self, id: &str) -> Result<Value, Error> {
        self.send(Method::DELETE, &document_path(id, ""), RequestOptions::new())
    }

    /// Received documents.
    pub fn list_inbox(&self, query: &ListQuery) -> Result<Value, Error> {
        self.send(Method::GET, "/inbox", query.to_options())
    }

    pub fn get_inbox_document(&self, id: &str) -> Result<Value, Error> {
        self.send(Method::GET, &inbox_path(id, ""), RequestOptions::new())
    }

    /// Mark a received document as downloaded.
    ///
    /// Calling it again for the same document is left to the server to
    /// accept or reject.
    pub fn mark_downloaded(&self, id: &str) -> Result<Value, Error> {
        self.send(Method::POST, &inbox_path(id, "/downloaded"), RequestOptions::new())
    }

    /// Look up a network participant, e.g. scheme `0208`, identifier `0123456789`.
    pub fn lookup_participant(&self, scheme: &str, identifier: &str) -> Result<Value, Error> {
        let path = format!(
            "/participants/{}/{}",
            encode_segment(scheme),
            encode_segment(identifier)
        );
        self.send(Method::GET, &path, RequestOptions::new())
    }

    fn send(&self, method: Method, path: &str, options: RequestOptions) -> Result<Value, Error> {
        request::send_json(&self.session, method, path, options)
    }
}

fn document_path(id: &str, suffix: &str) -> String {
    format!("/documents/{}{suffix}", encode_segment(id))
}

fn inbox_path(id: &str, suffix: &str) -> String {
    format!("/inbox/{}{suffix}", encode_segment(id))
}
