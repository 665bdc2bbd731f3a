//! Remote list state with sequence-tagged fetches
//!
//! Every fetch gets a [`FetchTicket`] carrying a monotonically increasing
//! sequence number. Only the response to the newest ticket may change the
//! collection; an older response that arrives late is dropped, so a slow
//! search for "ng" can never overwrite the results for "nguyen".

use std::future::Future;

use shared::request::ListQuery;
use shared::response::{ListPage, Pagination};

use crate::ClientResult;

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: ListQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// Outcome of [`RemoteCollection::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Rows of one list screen as last fetched from the backend
#[derive(Debug, Clone)]
pub struct RemoteCollection<T> {
    items: Vec<T>,
    pagination: Option<Pagination>,
    loading: bool,
    error: Option<String>,
    last_query: Option<ListQuery>,
    seq: u64,
}

impl<T> Default for RemoteCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
            loading: false,
            error: None,
            last_query: None,
            seq: 0,
        }
    }
}

impl<T> RemoteCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Server total, or the number of rows held
    pub fn total(&self) -> u64 {
        self.pagination
            .map(|p| p.total)
            .unwrap_or(self.items.len() as u64)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed fetch; cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_query(&self) -> Option<&ListQuery> {
        self.last_query.as_ref()
    }

    /// Whether `query` differs from the last one issued
    pub fn needs_fetch(&self, query: &ListQuery) -> bool {
        self.last_query.as_ref() != Some(query)
    }

    /// Forget the last query so the next `needs_fetch` is true
    pub fn mark_dirty(&mut self) {
        self.last_query = None;
    }

    /// Start a fetch for `query`
    pub fn begin(&mut self, query: ListQuery) -> FetchTicket {
        self.seq += 1;
        self.loading = true;
        self.last_query = Some(query.clone());
        FetchTicket {
            seq: self.seq,
            query,
        }
    }

    pub fn is_latest(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.seq
    }

    /// Apply a fetch result if `ticket` is the newest one issued.
    ///
    /// On failure the previous rows are kept and `error` is set.
    pub fn resolve(&mut self, ticket: FetchTicket, result: ClientResult<ListPage<T>>) -> Resolution {
        if !self.is_latest(&ticket) {
            tracing::debug!(seq = ticket.seq, latest = self.seq, "Dropping stale response");
            return Resolution::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.pagination = page.pagination;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, query = ?ticket.query, "Fetch failed");
                self.error = Some(e.user_message());
            }
        }
        Resolution::Applied
    }

    /// Begin, await `fetch` and resolve, for callers that fetch sequentially
    pub async fn fetch_with<F, Fut>(&mut self, query: ListQuery, fetch: F) -> Resolution
    where
        F: FnOnce(ListQuery) -> Fut,
        Fut: Future<Output = ClientResult<ListPage<T>>>,
    {
        let ticket = self.begin(query);
        let result = fetch(ticket.query.clone()).await;
        self.resolve(ticket, result)
    }

    /// Reflect a successful mutation locally; returns whether a row matched
    pub fn update_where<P, F>(&mut self, pred: P, update: F) -> bool
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|item| pred(item)) {
            Some(item) => {
                update(item);
                true
            }
            None => false,
        }
    }

    /// Drop rows locally; returns how many were removed
    pub fn remove_where<P>(&mut self, pred: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;

    fn page(items: &[&'static str]) -> ClientResult<ListPage<&'static str>> {
        Ok(ListPage::new(items.to_vec()))
    }

    #[test]
    fn test_late_response_is_discarded() {
        let mut rows = RemoteCollection::new();
        let slow = rows.begin(ListQuery::new().search("ng"));
        let fast = rows.begin(ListQuery::new().search("nguyen"));

        assert_eq!(rows.resolve(fast, page(&["Nguyễn Văn An"])), Resolution::Applied);
        assert!(!rows.is_loading());
        assert_eq!(rows.resolve(slow, page(&["Nguyễn Văn An", "Hoàng Ngọc"])), Resolution::Stale);
        assert_eq!(rows.items(), ["Nguyễn Văn An"]);
    }

    #[test]
    fn test_loading_clears_only_on_latest() {
        let mut rows: RemoteCollection<&str> = RemoteCollection::new();
        let first = rows.begin(ListQuery::new());
        let second = rows.begin(ListQuery::new().paginate(2, 10));
        assert_eq!(rows.resolve(first, page(&["a"])), Resolution::Stale);
        assert!(rows.is_loading());
        rows.resolve(second, page(&["b"]));
        assert!(!rows.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_rows() {
        let mut rows = RemoteCollection::new();
        let t = rows.begin(ListQuery::new());
        rows.resolve(t, page(&["a", "b"]));

        let t = rows.begin(ListQuery::new().search("x"));
        rows.resolve(t, Err(ClientError::NotFound("Không tìm thấy".into())));
        assert_eq!(rows.items(), ["a", "b"]);
        assert_eq!(rows.error(), Some("Không tìm thấy"));

        let t = rows.begin(ListQuery::new());
        rows.resolve(t, page(&["c"]));
        assert_eq!(rows.error(), None);
    }

    #[test]
    fn test_needs_fetch_uses_query_equality() {
        let mut rows: RemoteCollection<&str> = RemoteCollection::new();
        let q = ListQuery::new().search("an");
        assert!(rows.needs_fetch(&q));
        rows.begin(q.clone());
        assert!(!rows.needs_fetch(&q));
        assert!(rows.needs_fetch(&q.clone().paginate(2, 10)));
        rows.mark_dirty();
        assert!(rows.needs_fetch(&q));
    }

    #[tokio::test]
    async fn test_fetch_with() {
        let mut rows = RemoteCollection::new();
        let outcome = rows
            .fetch_with(ListQuery::new(), |q| async move {
                assert_eq!(q.page, 1);
                page(&["x"])
            })
            .await;
        assert_eq!(outcome, Resolution::Applied);
        assert!(rows.update_where(|r| *r == "x", |r| *r = "y"));
        assert_eq!(rows.items(), ["y"]);
        assert_eq!(rows.remove_where(|r| *r == "y"), 1);
        assert!(rows.items().is_empty());
    }
}
