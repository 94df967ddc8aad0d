use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::request::RequestOptions;

/// Pagination, sorting and filters for list endpoints.
///
/// Only fields that are set end up in the query string.
///
/// ```
/// use einvoice_client::core::ListQuery;
///
/// let query = ListQuery::new().page(2).size(50).sort("createdAt,desc").filter("status", "SENT");
/// assert_eq!(query.pairs(), vec![
///     ("page".to_string(), "2".to_string()),
///     ("size".to_string(), "50".to_string()),
///     ("sort".to_string(), "createdAt,desc".to_string()),
///     ("status".to_string(), "SENT".to_string()),
/// ]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Query pairs in wire order: page, size, sort, then filters by key.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3 + self.filters.len());
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }

    pub(crate) fn to_options(&self) -> RequestOptions {
        RequestOptions::new().queries(self.pairs())
    }
}
