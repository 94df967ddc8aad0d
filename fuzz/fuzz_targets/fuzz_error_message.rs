#![no_main]

use einvoice_client::core::RawResponse;
use einvoice_client::core::request::{decode_body, extract_error_message, status_error};
use libfuzzer_sys::fuzz_target;
use reqwest::Method;
use reqwest::header::HeaderMap;

fuzz_target!(|data: &[u8]| {
    // Must not panic: arbitrary response bodies come straight from the network.
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let status = 400 + u16::from(selector) % 200;
    let response = RawResponse {
        status,
        headers: HeaderMap::new(),
        body: body.to_vec(),
    };

    if let Ok(value) = decode_body(&Method::GET, "/fuzz", &response) {
        let _ = extract_error_message(&value);
    }

    let err = status_error(&Method::GET, "/fuzz", &response);
    assert_eq!(err.status_code, status);
    assert!(err.message.starts_with(einvoice_client::core::request::status_label(status)));
});
