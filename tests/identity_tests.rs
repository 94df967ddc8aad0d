#![cfg(feature = "identity")]

mod common;

use std::sync::Arc;

use common::{MockApi, header};
use einvoice_client::core::{Error, ListQuery, Session};
use einvoice_client::identity::IdentityClient;
use serde_json::json;
use wiremock::matchers::{body_json, header as header_eq, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

/// base64("user@example.com:pw")
const BASIC: &str = "Basic dXNlckBleGFtcGxlLmNvbTpwdw==";

fn identity(api: &MockApi) -> IdentityClient {
    IdentityClient::new(Arc::new(Session::new(api.surface("identity")).unwrap()))
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn authenticate_uses_basic_auth_and_stores_token() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/auth/login"))
            .and(header_eq("authorization", BASIC))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T1"}))),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(path("/identity/api/auth/me"))
            .and(header_eq("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "user@example.com"}))),
    );

    let identity = identity(&api);
    let token = identity.authenticate("user@example.com", "pw").unwrap();
    assert_eq!(token, "T1");
    assert_eq!(identity.session().token().as_deref(), Some("T1"));

    let me = identity.me().unwrap();
    assert_eq!(me["email"], "user@example.com");
}

#[test]
fn authenticate_accepts_access_token_field() {
    let api = MockApi::start();
    api.mount(
        Mock::given(path("/identity/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "A1", "expires_in": 3600}))),
    );

    assert_eq!(identity(&api).authenticate("user@example.com", "pw").unwrap(), "A1");
}

#[test]
fn authenticate_basic_auth_overrides_existing_token() {
    let api = MockApi::start();
    api.mount(
        Mock::given(path("/identity/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T2"}))),
    );

    let session = Session::builder(api.surface("identity")).token("OLD").build().unwrap();
    let identity = IdentityClient::new(Arc::new(session));
    identity.authenticate("user@example.com", "pw").unwrap();

    assert_eq!(header(&api.received()[0], "authorization"), Some(BASIC));
    assert_eq!(identity.session().token().as_deref(), Some("T2"));
}

#[test]
fn wrong_credentials() {
    let api = MockApi::start();
    api.mount(
        Mock::given(path("/identity/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad credentials"}))),
    );

    let identity = identity(&api);
    let err = identity.authenticate("user@example.com", "wrong").unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(err.to_string(), "Authentication failure");
    assert!(identity.session().token().is_none());
}

#[test]
fn login_without_token_is_an_error() {
    let api = MockApi::start();
    api.mount(
        Mock::given(path("/identity/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"}))),
    );

    let identity = identity(&api);
    let err = identity.authenticate("user@example.com", "pw").unwrap_err();
    let api_err = err.as_api_error().unwrap();
    assert!(api_err.message.contains("no token"));
    assert_eq!(api_err.body, json!({"status": "ok"}));
    assert!(identity.session().token().is_none());
}

#[test]
fn logout() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/auth/logout"))
            .respond_with(ResponseTemplate::new(204)),
    );

    assert_eq!(identity(&api).logout().unwrap(), json!({}));
}

// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

#[test]
fn registration_lifecycle() {
    let api = MockApi::start();
    let registration = json!({"companyName": "ACME GmbH", "vatNumber": "DE123456789"});
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/registrations"))
            .and(body_json(&registration))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "reg1", "status": "NEW"}))),
    );
    api.mount(
        Mock::given(method("PUT"))
            .and(path("/identity/api/registrations/reg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "reg1", "status": "COMPLETE"}))),
    );
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/registrations/reg1/submit"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"status": "IN_REVIEW"}))),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(path("/identity/api/registrations/reg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "reg1", "status": "IN_REVIEW"}))),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(path("/identity/api/registrations"))
            .and(query_param("size", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": [{"id": "reg1"}]}))),
    );

    let identity = identity(&api);
    assert_eq!(identity.create_registration(&registration).unwrap()["id"], "reg1");
    assert_eq!(
        identity.update_registration("reg1", &json!({"iban": "DE89370400440532013000"})).unwrap()["status"],
        "COMPLETE"
    );
    assert_eq!(identity.submit_registration("reg1").unwrap()["status"], "IN_REVIEW");
    assert_eq!(identity.get_registration("reg1").unwrap()["status"], "IN_REVIEW");
    assert_eq!(
        identity.list_registrations(&ListQuery::new().size(10)).unwrap()["content"][0]["id"],
        "reg1"
    );
}

#[test]
fn validation_error_on_registration() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/registrations"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "title": "Unprocessable",
                "error": {"message": "vatNumber is invalid"}
            }))),
    );

    let err = identity(&api).create_registration(&json!({})).unwrap_err();
    // top-level "title" wins over the nested error object
    assert_eq!(err.to_string(), "Validation Error: 422 - Unprocessable");
}

// ---------------------------------------------------------------------------
// Contract and signing
// ---------------------------------------------------------------------------

#[test]
fn contract_pdf_is_raw() {
    let api = MockApi::start();
    let pdf = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n".to_vec();
    api.mount(
        Mock::given(method("GET"))
            .and(path("/identity/api/registrations/reg1/contract"))
            .and(header_eq("accept", "application/pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf")),
    );

    assert_eq!(identity(&api).contract_pdf("reg1").unwrap(), pdf);
}

#[test]
fn contract_pdf_not_found() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no contract yet"}))),
    );

    let err = identity(&api).contract_pdf("reg1").unwrap_err();
    assert_eq!(err.to_string(), "Not Found: 404 - no contract yet");
}

#[test]
fn start_signing() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/registrations/reg1/signing"))
            .and(body_json(json!({"signer": "Max Mustermann"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"redirectUrl": "https://sign.example/x"}))),
    );

    let started = identity(&api)
        .start_signing("reg1", &json!({"signer": "Max Mustermann"}))
        .unwrap();
    assert_eq!(started["redirectUrl"], "https://sign.example/x");
}

#[test]
fn finalize_signing_surfaces_headers() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .and(path("/identity/api/registrations/reg1/signing/finalize"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Registration-Status", "SIGNED")
                    .insert_header("Registration-Provider", "peppol-ap-1")
                    .set_body_raw(b"%PDF-signed".to_vec(), "application/pdf"),
            ),
    );

    let outcome = identity(&api)
        .finalize_signing("reg1", &json!({"code": "123456"}))
        .unwrap();
    assert_eq!(outcome.document, b"%PDF-signed");
    assert_eq!(outcome.registration_status.as_deref(), Some("SIGNED"));
    assert_eq!(outcome.registration_provider.as_deref(), Some("peppol-ap-1"));
    assert_eq!(outcome.content_type.as_deref(), Some("application/pdf"));
}

#[test]
fn finalize_signing_error_is_classified() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error_description": "code expired"}))),
    );

    let err = identity(&api)
        .finalize_signing("reg1", &json!({"code": "000000"}))
        .unwrap_err();
    assert_eq!(err.to_string(), "Bad Request: 400 - code expired");
}
