//! Client-side list engine
//!
//! Every list screen keeps the rows it fetched and derives the visible list
//! from a filter record: free-text search plus exact-match categorical
//! choices. Derivation is pure and order-preserving, so re-rendering after a
//! keystroke never reorders rows.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::{
    Member, MemberStatus, Post, PostStatus, PostType, Priority, Rank, Role, Suggestion,
    SuggestionCategory, SuggestionStatus, Survey, SurveyStatus, Unit, UnitStatus,
};
use crate::request::ListQuery;
use crate::types::{Id, Labeled};

/// Exact-match-or-wildcard categorical filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Choice<T> {
    /// `All` matches anything, `Only(v)` matches exactly `v`
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == value,
        }
    }

    /// Like [`matches`](Self::matches) for optional fields; `None` only passes `All`
    pub fn matches_opt(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Self::All, _) => true,
            (Self::Only(v), Some(value)) => v == value,
            (Self::Only(_), None) => false,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

impl<T: Labeled> Choice<T> {
    /// Wire code sent as a query parameter, `None` for `All`
    pub fn code(&self) -> Option<&'static str> {
        self.as_option().map(|v| v.code())
    }

    /// Label shown in filter dropdowns
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "Tất cả",
            Self::Only(v) => v.label(),
        }
    }

    /// `All` followed by every variant, in display order
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(T::ALL.iter().copied().map(Self::Only))
            .collect()
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    /// `"all"` (any case) or blank parse as `All`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(v) => v.fmt(f),
        }
    }
}

/// Case-insensitive substring match of the trimmed needle against any field.
/// An empty needle matches everything.
pub fn text_matches(needle: &str, fields: &[&str]) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// A filter record for one entity type
pub trait ListFilter<T> {
    /// Whether `item` satisfies every active predicate
    fn matches(&self, item: &T) -> bool;

    /// Server-side equivalent of this filter for a list request
    fn to_query(&self, page: u32, limit: u32) -> ListQuery;
}

/// Rows satisfying `filter`, in input order
pub fn apply_filter<'a, T, F>(items: &'a [T], filter: &F) -> Vec<&'a T>
where
    F: ListFilter<T> + ?Sized,
{
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Stable descending sort by an `f64` key; ties keep their prior order
pub fn sort_desc_by<T, K>(items: &mut [T], key: K)
where
    K: Fn(&T) -> f64,
{
    items.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

/// One page of a derived list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page (1-based, clamped)
    pub page: u32,
    pub per_page: u32,
    /// Rows across all pages
    pub total: usize,
    /// Always at least 1
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `items` into one page; out-of-range pages clamp to the nearest valid one
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = (total.div_ceil(per_page as usize)).max(1) as u32;
    let page = page.clamp(1, total_pages);
    let start = (page as usize - 1) * per_page as usize;
    let items = items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();
    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

// =============================================================================
// Per-entity filters
// =============================================================================

/// Members: search over name and email
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFilter {
    pub search: String,
    pub unit: Choice<Id>,
    pub rank: Choice<Rank>,
    pub status: Choice<MemberStatus>,
}

impl ListFilter<Member> for MemberFilter {
    fn matches(&self, m: &Member) -> bool {
        text_matches(&self.search, &[&m.name, &m.email])
            && self.unit.matches_opt(m.unit_id.as_ref())
            && self.rank.matches_opt(m.rank.as_ref())
            && self.status.matches(&m.status)
    }

    fn to_query(&self, page: u32, limit: u32) -> ListQuery {
        ListQuery::new()
            .paginate(page, limit)
            .search(&self.search)
            .filter("role", Some(Role::Member.code()))
            .filter("unit", self.unit.as_option().map(|id| id.to_string()))
            .filter("rank", self.rank.code())
            .filter("status", self.status.code())
    }
}

/// Units: search over name and leader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitFilter {
    pub search: String,
    pub status: Choice<UnitStatus>,
}

impl ListFilter<Unit> for UnitFilter {
    fn matches(&self, u: &Unit) -> bool {
        text_matches(&self.search, &[&u.name, &u.leader_name]) && self.status.matches(&u.status)
    }

    fn to_query(&self, page: u32, limit: u32) -> ListQuery {
        ListQuery::new()
            .paginate(page, limit)
            .search(&self.search)
            .filter("status", self.status.code())
    }
}

/// Posts: search over title and author
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub search: String,
    pub status: Choice<PostStatus>,
    pub post_type: Choice<PostType>,
}

impl ListFilter<Post> for PostFilter {
    fn matches(&self, p: &Post) -> bool {
        text_matches(&self.search, &[&p.title, &p.author_name])
            && self.status.matches(&p.status)
            && self.post_type.matches(&p.post_type)
    }

    fn to_query(&self, page: u32, limit: u32) -> ListQuery {
        ListQuery::new()
            .paginate(page, limit)
            .search(&self.search)
            .filter("status", self.status.code())
            .filter("type", self.post_type.code())
    }
}

/// Suggestions: search over title and content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionFilter {
    pub search: String,
    pub status: Choice<SuggestionStatus>,
    pub priority: Choice<Priority>,
    pub category: Choice<SuggestionCategory>,
}

impl ListFilter<Suggestion> for SuggestionFilter {
    fn matches(&self, s: &Suggestion) -> bool {
        text_matches(&self.search, &[&s.title, &s.content])
            && self.status.matches(&s.status)
            && self.priority.matches(&s.priority)
            && self.category.matches(&s.category)
    }

    fn to_query(&self, page: u32, limit: u32) -> ListQuery {
        ListQuery::new()
            .paginate(page, limit)
            .search(&self.search)
            .filter("status", self.status.code())
            .filter("priority", self.priority.code())
            .filter("category", self.category.code())
    }
}

/// Surveys: search over title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyFilter {
    pub search: String,
    pub status: Choice<SurveyStatus>,
}

impl ListFilter<Survey> for SurveyFilter {
    fn matches(&self, s: &Survey) -> bool {
        text_matches(&self.search, &[&s.title]) && self.status.matches(&s.status)
    }

    fn to_query(&self, page: u32, limit: u32) -> ListQuery {
        ListQuery::new()
            .paginate(page, limit)
            .search(&self.search)
            .filter("status", self.status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: Id, name: &str, email: &str, unit_id: Option<Id>, rank: Rank) -> Member {
        Member {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            unit_id,
            unit_name: None,
            rank: Some(rank),
            status: MemberStatus::Active,
            points: 0,
            join_date: None,
            birth_date: None,
            education: None,
            workplace: None,
            role: Role::Member,
        }
    }

    fn roster() -> Vec<Member> {
        vec![
            member(1, "Nguyễn Văn An", "an@doan.vn", Some(1), Rank::Excellent),
            member(2, "Trần Thị Bình", "binh@doan.vn", Some(2), Rank::Good),
            member(3, "Lê Văn Cường", "cuong@doan.vn", None, Rank::Excellent),
            member(4, "Phạm Thị Dung", "dung@gmail.com", Some(1), Rank::Poor),
        ]
    }

    #[test]
    fn test_ungraded_member_only_passes_all_ranks() {
        let mut ungraded = member(5, "Võ Thị Em", "em@doan.vn", None, Rank::Average);
        ungraded.rank = None;
        let members = vec![
            member(1, "Nguyễn Văn An", "an@doan.vn", None, Rank::Average),
            ungraded,
        ];
        let filter = MemberFilter {
            rank: Choice::Only(Rank::Average),
            ..Default::default()
        };
        let visible = apply_filter(&members, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
        assert_eq!(apply_filter(&members, &MemberFilter::default()).len(), 2);
    }

    #[test]
    fn test_rank_filter_selects_exact_rank() {
        let members = vec![
            member(1, "Nguyễn Văn An", "an@doan.vn", None, Rank::Excellent),
            member(2, "Trần Thị Bình", "binh@doan.vn", None, Rank::Good),
        ];
        let filter = MemberFilter {
            rank: "XUAT_SAC".parse().unwrap(),
            ..Default::default()
        };
        let visible = apply_filter(&members, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Nguyễn Văn An");
    }

    #[test]
    fn test_text_matches() {
        assert!(text_matches("", &["anything"]));
        assert!(text_matches("   ", &[]));
        assert!(text_matches(" AN@ ", &["x", "an@doan.vn"]));
        assert!(text_matches("nguyễn", &["Nguyễn Văn An"]));
        assert!(!text_matches("bình", &["Nguyễn Văn An", "an@doan.vn"]));
    }

    #[test]
    fn test_filtered_list_is_ordered_subset() {
        let members = roster();
        let filters = [
            MemberFilter::default(),
            MemberFilter {
                search: "doan.vn".into(),
                ..Default::default()
            },
            MemberFilter {
                unit: Choice::Only(1),
                ..Default::default()
            },
            MemberFilter {
                search: "văn".into(),
                rank: Choice::Only(Rank::Excellent),
                ..Default::default()
            },
            MemberFilter {
                status: Choice::Only(MemberStatus::Inactive),
                ..Default::default()
            },
        ];
        for filter in &filters {
            let visible = apply_filter(&members, filter);
            let mut last = 0;
            for m in &visible {
                let pos = members.iter().position(|x| x.id == m.id).unwrap();
                assert!(pos >= last, "order preserved");
                last = pos;
                assert!(text_matches(&filter.search, &[&m.name, &m.email]));
                assert!(filter.unit.matches_opt(m.unit_id.as_ref()));
                assert!(filter.rank.matches_opt(m.rank.as_ref()));
                assert!(filter.status.matches(&m.status));
            }
            let rejected = members.len() - visible.len();
            assert_eq!(
                rejected,
                members.iter().filter(|m| !filter.matches(m)).count()
            );
        }
    }

    #[test]
    fn test_unit_choice_excludes_unassigned() {
        let members = roster();
        let filter = MemberFilter {
            unit: Choice::Only(1),
            ..Default::default()
        };
        let ids: Vec<Id> = apply_filter(&members, &filter).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_choice_parse_and_options() {
        assert_eq!("ALL".parse::<Choice<Rank>>().unwrap(), Choice::All);
        assert_eq!("".parse::<Choice<Rank>>().unwrap(), Choice::All);
        assert_eq!(
            "kha".parse::<Choice<Rank>>().unwrap(),
            Choice::Only(Rank::Good)
        );
        assert!("gold".parse::<Choice<Rank>>().is_err());

        let options = Choice::<Rank>::options();
        assert_eq!(options.len(), Rank::ALL.len() + 1);
        assert_eq!(options[0].label(), "Tất cả");
        assert_eq!(options[1].code(), Some("XUAT_SAC"));
    }

    #[test]
    fn test_sort_desc_is_stable() {
        let mut rows = vec![("a", 70.0), ("b", 85.5), ("c", 70.0), ("d", 90.0), ("e", 85.5)];
        sort_desc_by(&mut rows, |r| r.1);
        let names: Vec<&str> = rows.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["d", "b", "e", "a", "c"]);
        assert!(rows.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_paginate_clamps() {
        let rows: Vec<u32> = (1..=23).collect();

        let page = paginate(&rows, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev() && !page.has_next());

        let page = paginate(&rows, 99, 10);
        assert_eq!(page.page, 3);

        let page = paginate(&rows, 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec![1]);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 5, 10);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_filter_to_query_omits_all_choices() {
        let filter = SuggestionFilter {
            search: " đèn ".into(),
            priority: Choice::Only(Priority::Urgent),
            ..Default::default()
        };
        let query = filter.to_query(2, 20);
        assert_eq!(query.page, 2);
        assert_eq!(query.search, "đèn");
        assert_eq!(query.filters.get("priority").map(String::as_str), Some("urgent"));
        assert!(!query.filters.contains_key("status"));
        assert!(!query.filters.contains_key("category"));
    }
}
