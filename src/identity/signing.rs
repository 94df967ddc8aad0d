use crate::core::RawResponse;

/// Response header carrying the registration status after signing.
pub const REGISTRATION_STATUS_HEADER: &str = "Registration-Status";
/// Response header naming the provider the registration was forwarded to.
pub const REGISTRATION_PROVIDER_HEADER: &str = "Registration-Provider";

/// Result of finalizing an electronic signature.
///
/// The body is the signed document; status and provider come from
/// response headers, not from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutcome {
    /// Signed document as returned by the API (usually a PDF).
    pub document: Vec<u8>,
    pub content_type: Option<String>,
    pub registration_status: Option<String>,
    pub registration_provider: Option<String>,
}

impl From<RawResponse> for SigningOutcome {
    fn from(response: RawResponse) -> Self {
        let header = |name: &str| response.header(name).map(str::to_string);
        let content_type = header("content-type");
        let registration_status = header(REGISTRATION_STATUS_HEADER);
        let registration_provider = header(REGISTRATION_PROVIDER_HEADER);
        Self {
            document: response.body,
            content_type,
            registration_status,
            registration_provider,
        }
    }
}
