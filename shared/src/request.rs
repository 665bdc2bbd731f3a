//! Request types for list endpoints
//!
//! A [`ListQuery`] is what every list screen sends to the backend: page,
//! page size, free-text search and any categorical filters that are not
//! "all". Two equal queries never trigger a second fetch.

use std::collections::BTreeMap;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum items per page accepted by the backend
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for a list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Items per page (clamped to `MAX_PAGE_SIZE`)
    pub limit: u32,
    /// Search keyword, trimmed; empty means no search
    pub search: String,
    /// Categorical filters keyed by backend parameter name
    pub filters: BTreeMap<String, String>,
    /// Sort field, e.g. `points_desc`
    pub sort: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page and page size
    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = page.max(1);
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Set the search keyword
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_string();
        self
    }

    /// Add a categorical filter; `None` (the "all" choice) removes it
    pub fn filter(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        let key = key.into();
        match value {
            Some(v) => {
                self.filters.insert(key, v.into());
            }
            None => {
                self.filters.remove(&key);
            }
        }
        self
    }

    /// Set the sort field
    pub fn order_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Offset of the first row on this page
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) as u64 * self.limit as u64
    }

    /// Render as URL query pairs in a stable order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search".to_string(), self.search.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }
}
