//! Business app API: company profile, customers, products and invoices.

mod client;

pub use client::AppClient;
