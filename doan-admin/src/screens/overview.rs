//! Dashboard and report screens
//!
//! Both aggregate the first `MAX_PAGE_SIZE` members, units and suggestions;
//! the backend offers no report endpoint beyond suggestion stats.

use doan_client::RemoteCollection;
use shared::listing::{ListFilter, MemberFilter};
use shared::models::{Member, Suggestion, SuggestionStats, SuggestionStatus, Unit};
use shared::report::DashboardSummary;
use shared::request::{ListQuery, MAX_PAGE_SIZE};
use shared::types::Labeled;

use crate::table::render_rows;

#[derive(Debug, Default)]
pub struct Overview {
    pub members: RemoteCollection<Member>,
    pub units: RemoteCollection<Unit>,
    pub suggestions: RemoteCollection<Suggestion>,
    /// Server-side counts, preferred over the local ones when present
    pub stats: Option<SuggestionStats>,
}

impl Overview {
    pub fn member_query() -> ListQuery {
        MemberFilter::default().to_query(1, MAX_PAGE_SIZE)
    }

    pub fn list_query() -> ListQuery {
        ListQuery::new().paginate(1, MAX_PAGE_SIZE)
    }

    /// Force every collection to refetch on next visit
    pub fn mark_dirty(&mut self) {
        self.members.mark_dirty();
        self.units.mark_dirty();
        self.suggestions.mark_dirty();
        self.stats = None;
    }

    pub fn is_loading(&self) -> bool {
        self.members.is_loading() || self.units.is_loading() || self.suggestions.is_loading()
    }

    fn errors(&self) -> Vec<&str> {
        [
            self.members.error(),
            self.units.error(),
            self.suggestions.error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn summary(&self) -> DashboardSummary {
        let mut summary = DashboardSummary::build(
            self.members.items(),
            self.units.items(),
            self.suggestions.items(),
        );
        if let Some(stats) = self.stats {
            summary.suggestions = stats;
        }
        summary
    }

    fn header(&self) -> String {
        let mut out = String::new();
        if self.is_loading() {
            out.push_str("Đang tải...\n");
        }
        for err in self.errors() {
            out.push_str(&format!("Lỗi tải dữ liệu: {err}\n"));
        }
        out
    }

    pub fn render_dashboard(&self) -> String {
        let s = self.summary();
        let mut out = self.header();
        out.push_str(&format!(
            "  Đoàn viên      : {} ({} hoạt động, {:.0}%)\n",
            s.total_members,
            s.active_members,
            s.active_rate()
        ));
        out.push_str(&format!(
            "  Chi đoàn       : {} ({} hoạt động)\n",
            s.total_units, s.active_units
        ));
        out.push_str(&format!("  Điểm trung bình: {:.1}\n", s.average_points));
        out.push_str(&format!(
            "  Kiến nghị      : {} (đã giải quyết {:.0}%)\n",
            s.suggestions.total,
            s.suggestions.resolution_rate()
        ));
        let by_status: Vec<String> = SuggestionStatus::ALL
            .iter()
            .map(|st| format!("{} {}", st.label(), s.suggestions.count(*st)))
            .collect();
        out.push_str(&format!("    {}\n", by_status.join(" · ")));
        out
    }

    pub fn render_reports(&self) -> String {
        let s = self.summary();
        let mut out = self.header();
        out.push_str("Phân bố xếp loại\n");
        let ranks: Vec<Vec<String>> = s
            .rank_distribution
            .iter()
            .map(|b| {
                vec![
                    b.rank.label().to_string(),
                    b.count.to_string(),
                    format!("{:.1}%", b.percent),
                ]
            })
            .collect();
        out.push_str(&render_rows(&["Xếp loại", "Số lượng", "Tỷ lệ"], &ranks));

        out.push_str("\nChi đoàn tiêu biểu (theo điểm trung bình)\n");
        let units: Vec<Vec<String>> = s
            .top_units
            .iter()
            .map(|u| {
                vec![
                    u.position.to_string(),
                    u.name.clone(),
                    format!("{:.1}", u.average_points),
                    u.total_members.to_string(),
                ]
            })
            .collect();
        out.push_str(&render_rows(&["#", "Chi đoàn", "Điểm TB", "Đoàn viên"], &units));
        out
    }
}
