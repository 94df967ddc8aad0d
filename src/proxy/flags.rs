use serde::{Deserialize, Serialize};

use crate::core::RequestOptions;

/// Query flags accepted by the document create/update endpoints.
///
/// Unset flags are not sent, leaving the server default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentFlags {
    /// Store the document without sending it.
    pub draft: Option<bool>,
    /// Send at the given time (ISO 8601) instead of immediately.
    pub schedule: Option<String>,
    /// Do not keep a copy in the archive.
    pub no_archive: Option<bool>,
}

impl DocumentFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(mut self, draft: bool) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn schedule(mut self, at: impl Into<String>) -> Self {
        self.schedule = Some(at.into());
        self
    }

    pub fn no_archive(mut self, no_archive: bool) -> Self {
        self.no_archive = Some(no_archive);
        self
    }

    pub(crate) fn apply(&self, options: RequestOptions) -> RequestOptions {
        options
            .query_opt("draft", self.draft.map(|v| v.to_string()))
            .query_opt("schedule", self.schedule.clone())
            .query_opt("noArchive", self.no_archive.map(|v| v.to_string()))
    }
}
