//! Generic list screen: remote rows, a filter record and a page cursor
//!
//! Every entity screen is a `ListScreen<T, F>`. The filter is sent to the
//! server as a [`ListQuery`] and also re-applied locally, since not every
//! endpoint honours every parameter.

use doan_client::{ClientResult, FetchTicket, RemoteCollection, Resolution};
use shared::listing::{ListFilter, Page, apply_filter, paginate};
use shared::request::ListQuery;
use shared::response::{ListPage, Pagination};

use super::filters::FilterForm;
use crate::table::{TableRow, render_page};

/// Object-safe controls shared by every list screen
pub trait ListControls {
    fn set_search(&mut self, text: &str);

    /// Set one categorical filter by name; the page resets to 1
    fn set_filter(&mut self, field: &str, value: &str) -> Result<(), String>;

    fn clear_filter(&mut self);

    fn set_page(&mut self, page: u32);

    /// Move to the next page; false on the last page
    fn next_page(&mut self) -> bool;

    fn prev_page(&mut self) -> bool;

    fn filter_fields(&self) -> &'static [&'static str];

    fn render(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct ListScreen<T, F> {
    rows: RemoteCollection<T>,
    filter: F,
    page: u32,
    per_page: u32,
}

impl<T, F> ListScreen<T, F>
where
    T: Clone,
    F: ListFilter<T> + FilterForm + Default,
{
    pub fn new(per_page: u32) -> Self {
        Self {
            rows: RemoteCollection::new(),
            filter: F::default(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn rows(&self) -> &RemoteCollection<T> {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut RemoteCollection<T> {
        &mut self.rows
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn query(&self) -> ListQuery {
        self.filter.to_query(self.page, self.per_page)
    }

    /// Ticket for a fetch, unless the current query was already issued
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let query = self.query();
        if self.rows.needs_fetch(&query) {
            Some(self.rows.begin(query))
        } else {
            None
        }
    }

    /// Ticket for a fetch even if the query has not changed
    pub fn reload(&mut self) -> FetchTicket {
        self.rows.mark_dirty();
        self.rows.begin(self.query())
    }

    pub fn resolve(&mut self, ticket: FetchTicket, result: ClientResult<ListPage<T>>) -> Resolution {
        self.rows.resolve(ticket, result)
    }

    pub fn find<P>(&self, pred: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.items().iter().find(|item| pred(item))
    }

    /// Fetched rows that pass the local filter, in server order
    pub fn filtered(&self) -> Vec<&T> {
        apply_filter(self.rows.items(), &self.filter)
    }

    /// The page to render.
    ///
    /// A server-paginated response already is one page, so the server's
    /// counts are shown; otherwise the filtered rows are paged locally.
    pub fn visible(&self) -> Page<T> {
        let filtered: Vec<T> = self.filtered().into_iter().cloned().collect();
        match self.rows.pagination() {
            Some(p) => {
                let per_page = if p.per_page == 0 { self.per_page } else { p.per_page };
                let total_pages = match p.total_pages {
                    0 => Pagination::new(p.page, per_page, p.total).total_pages,
                    n => n,
                };
                Page {
                    total: (p.total as usize).max(filtered.len()),
                    items: filtered,
                    page: p.page.max(1),
                    per_page,
                    total_pages: total_pages.max(1),
                }
            }
            None => paginate(&filtered, self.page, self.per_page),
        }
    }
}

impl<T, F> ListControls for ListScreen<T, F>
where
    T: Clone + TableRow,
    F: ListFilter<T> + FilterForm + Default,
{
    fn set_search(&mut self, text: &str) {
        self.filter.set_search(text);
        self.page = 1;
    }

    fn set_filter(&mut self, field: &str, value: &str) -> Result<(), String> {
        self.filter.set_field(field, value)?;
        self.page = 1;
        Ok(())
    }

    fn clear_filter(&mut self) {
        self.filter = F::default();
        self.page = 1;
    }

    fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    fn next_page(&mut self) -> bool {
        let visible = self.visible();
        if visible.has_next() {
            self.page = visible.page + 1;
            true
        } else {
            false
        }
    }

    fn prev_page(&mut self) -> bool {
        let visible = self.visible();
        if visible.has_prev() {
            self.page = visible.page - 1;
            true
        } else {
            false
        }
    }

    fn filter_fields(&self) -> &'static [&'static str] {
        F::FIELDS
    }

    fn render(&self) -> String {
        let mut out = String::new();
        let filters = self.filter.describe();
        if !filters.is_empty() {
            out.push_str(&format!("Bộ lọc: {filters}\n"));
        }
        if self.rows.is_loading() {
            out.push_str("Đang tải...\n");
        }
        if let Some(err) = self.rows.error() {
            out.push_str(&format!("Lỗi tải dữ liệu: {err}\n"));
        }
        out.push_str(&render_page(&self.visible()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::listing::MemberFilter;
    use shared::models::{Member, Rank};

    fn member(id: i64, name: &str, rank: Rank) -> Member {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "email": format!("m{id}@doan.vn"), "rank": rank
        }))
        .unwrap()
    }

    fn loaded(per_page: u32, members: Vec<Member>) -> ListScreen<Member, MemberFilter> {
        let mut screen = ListScreen::new(per_page);
        let ticket = screen.begin_fetch().unwrap();
        screen.resolve(ticket, Ok(ListPage::new(members)));
        screen
    }

    #[test]
    fn test_rank_filter_applies_locally() {
        let mut screen = loaded(
            10,
            vec![
                member(1, "Nguyễn Văn An", Rank::Excellent),
                member(2, "Trần Thị Bình", Rank::Good),
            ],
        );
        screen.set_filter("rank", "XUAT_SAC").unwrap();
        let names: Vec<&str> = screen.filtered().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Nguyễn Văn An"]);
        assert_eq!(screen.query().filters.get("rank").map(String::as_str), Some("XUAT_SAC"));
    }

    #[test]
    fn test_filter_change_resets_page_and_refetches() {
        let members = (1..=25).map(|i| member(i, &format!("ĐV {i}"), Rank::Average)).collect();
        let mut screen = loaded(10, members);
        assert!(screen.begin_fetch().is_none());

        assert!(screen.next_page());
        assert!(screen.next_page());
        assert!(!screen.next_page());
        assert_eq!(screen.visible().items.len(), 5);

        screen.set_search("ĐV 1");
        assert_eq!(screen.page(), 1);
        assert!(screen.begin_fetch().is_some());
    }

    #[test]
    fn test_server_pagination_is_shown_as_is() {
        let mut screen: ListScreen<Member, MemberFilter> = ListScreen::new(2);
        let ticket = screen.begin_fetch().unwrap();
        screen.resolve(
            ticket,
            Ok(ListPage {
                items: vec![member(3, "C", Rank::Good), member(4, "D", Rank::Good)],
                pagination: Some(Pagination::new(2, 2, 9)),
            }),
        );
        let page = screen.visible();
        assert_eq!((page.page, page.total, page.total_pages), (2, 9, 5));
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_server_total_without_page_count_still_pages() {
        let mut screen: ListScreen<Member, MemberFilter> = ListScreen::new(2);
        let ticket = screen.begin_fetch().unwrap();
        screen.resolve(
            ticket,
            Ok(ListPage {
                items: vec![member(1, "A", Rank::Good), member(2, "B", Rank::Good)],
                pagination: Some(Pagination { page: 1, per_page: 0, total: 50, total_pages: 0 }),
            }),
        );
        assert_eq!(screen.visible().total_pages, 25);
        assert!(screen.next_page());
        assert_eq!(screen.page(), 2);
    }

    #[test]
    fn test_unknown_filter_value_rejected() {
        let mut screen: ListScreen<Member, MemberFilter> = ListScreen::new(10);
        assert!(screen.set_filter("rank", "gold").is_err());
        assert!(screen.set_filter("colour", "red").is_err());
        assert!(screen.filter().rank.is_all());
    }

    #[test]
    fn test_render_shows_error_over_previous_rows() {
        let mut screen = loaded(10, vec![member(1, "Nguyễn Văn An", Rank::Excellent)]);
        let ticket = screen.reload();
        screen.resolve(
            ticket,
            Err(doan_client::ClientError::Internal("Lỗi máy chủ".into())),
        );
        let out = screen.render();
        assert!(out.contains("Lỗi tải dữ liệu: Lỗi máy chủ"));
        assert!(out.contains("Nguyễn Văn An"));

        screen.set_search("không ai");
        assert!(screen.render().contains(crate::table::EMPTY_MESSAGE));
    }
}
