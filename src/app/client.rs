use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::core::request::{self, RequestOptions, encode_segment};
use crate::core::{Error, ListQuery, Session};

const CUSTOMERS: &str = "/customers";
const PRODUCTS: &str = "/products";
const INVOICES: &str = "/invoices";

/// Client for the business app API.
///
/// Payloads are passed through as JSON; the server owns the schema.
#[derive(Debug, Clone)]
pub struct AppClient {
    session: Arc<Session>,
}

impl AppClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // --- Company ---

    pub fn company(&self) -> Result<Value, Error> {
        self.send(Method::GET, "/company", RequestOptions::new())
    }

    pub fn update_company(&self, company: &Value) -> Result<Value, Error> {
        self.send(Method::PUT, "/company", RequestOptions::new().json(company)?)
    }

    // --- Customers ---

    pub fn list_customers(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list(CUSTOMERS, query)
    }

    pub fn get_customer(&self, id: &str) -> Result<Value, Error> {
        self.fetch(CUSTOMERS, id)
    }

    pub fn create_customer(&self, customer: &Value) -> Result<Value, Error> {
        self.create(CUSTOMERS, customer)
    }

    pub fn update_customer(&self, id: &str, customer: &Value) -> Result<Value, Error> {
        self.update(CUSTOMERS, id, customer)
    }

    pub fn delete_customer(&self, id: &str) -> Result<Value, Error> {
        self.delete(CUSTOMERS, id)
    }

    // --- Products ---

    pub fn list_products(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list(PRODUCTS, query)
    }

    pub fn get_product(&self, id: &str) -> Result<Value, Error> {
        self.fetch(PRODUCTS, id)
    }

    pub fn create_product(&self, product: &Value) -> Result<Value, Error> {
        self.create(PRODUCTS, product)
    }

    pub fn update_product(&self, id: &str, product: &Value) -> Result<Value, Error> {
        self.update(PRODUCTS, id, product)
    }

    pub fn delete_product(&self, id: &str) -> Result<Value, Error> {
        self.delete(PRODUCTS, id)
    }

    // --- Invoices ---

    pub fn list_invoices(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list(INVOICES, query)
    }

    pub fn get_invoice(&self, id: &str) -> Result<Value, Error> {
        self.fetch(INVOICES, id)
    }

    pub fn create_invoice(&self, invoice: &Value) -> Result<Value, Error> {
        self.create(INVOICES, invoice)
    }

    pub fn update_invoice(&self, id: &str, invoice: &Value) -> Result<Value, Error> {
        self.update(INVOICES, id, invoice)
    }

    pub fn delete_invoice(&self, id: &str) -> Result<Value, Error> {
        self.delete(INVOICES, id)
    }

    /// Finalize a draft invoice and hand it over for transmission.
    pub fn issue_invoice(&self, id: &str) -> Result<Value, Error> {
        self.send(
            Method::POST,
            &item_path(INVOICES, id, "/issue"),
            RequestOptions::new(),
        )
    }

    /// Rendered invoice as PDF bytes.
    pub fn invoice_pdf(&self, id: &str) -> Result<Vec<u8>, Error> {
        request::send_raw(
            &self.session,
            Method::GET,
            &item_path(INVOICES, id, "/pdf"),
            RequestOptions::new().header("Accept", "application/pdf"),
        )
    }

    fn list(&self, collection: &str, query: &ListQuery) -> Result<Value, Error> {
        self.send(Method::GET, collection, query.to_options())
    }

    fn fetch(&self, collection: &str, id: &str) -> Result<Value, Error> {
        self.send(Method::GET, &item_path(collection, id, ""), RequestOptions::new())
    }

    fn create(&self, collection: &str, body: &Value) -> Result<Value, Error> {
        self.send(Method::POST, collection, RequestOptions::new().json(body)?)
    }

    fn update(&self, collection: &str, id: &str, body: &Value) -> Result<Value, Error> {
        self.send(
            Method::PUT,
            &item_path(collection, id, ""),
            RequestOptions::new().json(body)?,
        )
    }

    fn delete(&self, collection: &str, id: &str) -> Result<Value, Error> {
        self.send(Method::DELETE, &item_path(collection, id, ""), RequestOptions::new())
    }

    fn send(&self, method: Method, path: &str, options: RequestOptions) -> Result<Value, Error> {
        request::send_json(&self.session, method, path, options)
    }
}

fn item_path(collection: &str, id: &str, suffix: &str) -> String {
    format!("{collection}/{}{suffix}", encode_segment(id))
}
