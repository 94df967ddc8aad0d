//! Append-only request/response audit log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{SecondsFormat, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap};

use super::error::Error;

/// A log file shared by all clones of one transport.
#[derive(Debug, Clone)]
pub struct RequestLog {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl RequestLog {
    /// Open `path` for appending, creating it if needed.
    ///
    /// Fails immediately if the file cannot be opened; a transport never
    /// silently runs without its configured log.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::RequestLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn log_request(
        &self,
        method: &str,
        uri: &str,
        version: &str,
        body: &str,
        headers: &HeaderMap,
    ) {
        self.write_line(&format_request_line(method, uri, version, body, headers));
    }

    pub(crate) fn log_response(&self, status: u16, body: &str) {
        self.write_line(&format_response_line(status, body));
    }

    fn write_line(&self, line: &str) {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "[{stamp}] {line}") {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write request log");
        }
    }
}

/// `{method} {uri} HTTP/{version} {body} - {headers}`
pub(crate) fn format_request_line(
    method: &str,
    uri: &str,
    version: &str,
    body: &str,
    headers: &HeaderMap,
) -> String {
    format!(
        "{method} {uri} HTTP/{version} {body} - {}",
        format_headers(headers)
    )
}

/// `RESPONSE: {status} - {body}`
pub(crate) fn format_response_line(status: u16, body: &str) -> String {
    format!("RESPONSE: {status} - {body}")
}

fn format_headers(headers: &HeaderMap) -> String {
    let mut parts: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            let value = if name == AUTHORIZATION {
                redact_authorization(value.to_str().unwrap_or_default())
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            format!("{}: {value}", name.as_str())
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

fn redact_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} ***"),
        None => "***".to_string(),
    }
}
