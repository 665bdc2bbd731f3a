//! Dashboard aggregation and CSV export
//!
//! Everything here is computed from rows the console already loaded; no
//! report endpoint is involved.

use serde::Serialize;

use crate::listing::sort_desc_by;
use crate::models::{Member, Rank, Suggestion, SuggestionStats, Unit, UnitStatus};
use crate::types::{Id, Labeled};

/// Count of members holding one rank
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankBucket {
    pub rank: Rank,
    pub count: usize,
    /// Share of all members, in percent
    pub percent: f64,
}

/// Member count per rank, in rank order; every rank appears even when empty
pub fn rank_distribution(members: &[Member]) -> Vec<RankBucket> {
    let total = members.len();
    Rank::ALL
        .iter()
        .map(|&rank| {
            let count = members.iter().filter(|m| m.rank == Some(rank)).count();
            let percent = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            RankBucket {
                rank,
                count,
                percent,
            }
        })
        .collect()
}

/// One row of the unit leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRanking {
    pub position: usize,
    pub unit_id: Id,
    pub name: String,
    pub average_points: f64,
    pub total_members: u32,
}

/// The `n` units with the highest average points; ties keep input order
pub fn top_units(units: &[Unit], n: usize) -> Vec<UnitRanking> {
    let mut ranked: Vec<&Unit> = units.iter().collect();
    sort_desc_by(&mut ranked, |u| u.average_points);
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, u)| UnitRanking {
            position: i + 1,
            unit_id: u.id,
            name: u.name.clone(),
            average_points: u.average_points,
            total_members: u.total_members,
        })
        .collect()
}

/// Headline numbers for the dashboard screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_members: usize,
    pub active_members: usize,
    pub total_units: usize,
    pub active_units: usize,
    /// Mean member points, 0 with no members
    pub average_points: f64,
    pub rank_distribution: Vec<RankBucket>,
    pub suggestions: SuggestionStats,
    pub top_units: Vec<UnitRanking>,
}

impl DashboardSummary {
    /// Units shown on the leaderboard
    pub const TOP_UNITS: usize = 5;

    pub fn build(members: &[Member], units: &[Unit], suggestions: &[Suggestion]) -> Self {
        let total_points: i64 = members.iter().map(|m| m.points).sum();
        let average_points = if members.is_empty() {
            0.0
        } else {
            total_points as f64 / members.len() as f64
        };
        let summary = Self {
            total_members: members.len(),
            active_members: members.iter().filter(|m| m.is_active()).count(),
            total_units: units.len(),
            active_units: units
                .iter()
                .filter(|u| u.status == UnitStatus::Active)
                .count(),
            average_points,
            rank_distribution: rank_distribution(members),
            suggestions: SuggestionStats::from_items(suggestions),
            top_units: top_units(units, Self::TOP_UNITS),
        };
        tracing::debug!(
            members = summary.total_members,
            units = summary.total_units,
            suggestions = summary.suggestions.total,
            "Dashboard summary built"
        );
        summary
    }

    /// Share of members that are active, in percent
    pub fn active_rate(&self) -> f64 {
        if self.total_members == 0 {
            return 0.0;
        }
        self.active_members as f64 * 100.0 / self.total_members as f64
    }
}

// =============================================================================
// CSV export
// =============================================================================

/// A row type that can be exported to CSV
pub trait CsvRow {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl CsvRow for Member {
    fn headers() -> &'static [&'static str] {
        &[
            "ID",
            "Họ tên",
            "Email",
            "Số điện thoại",
            "Chi đoàn",
            "Xếp loại",
            "Điểm",
            "Trạng thái",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            self.unit_name.clone().unwrap_or_default(),
            self.rank.map(|r| r.label()).unwrap_or_default().to_string(),
            self.points.to_string(),
            self.status.label().to_string(),
        ]
    }
}

impl CsvRow for Unit {
    fn headers() -> &'static [&'static str] {
        &[
            "ID",
            "Tên chi đoàn",
            "Bí thư",
            "Số đoàn viên",
            "Đang hoạt động",
            "Điểm TB",
            "Hoạt động",
            "Trạng thái",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.leader_name.clone(),
            self.total_members.to_string(),
            self.active_members.to_string(),
            format!("{:.1}", self.average_points),
            self.activity_count.to_string(),
            self.status.label().to_string(),
        ]
    }
}

/// Quote a field when it contains a comma, quote or line break
pub fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line<S: AsRef<str>>(fields: impl IntoIterator<Item = S>) -> String {
    fields
        .into_iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line plus one line per row, `\n` separated
pub fn to_csv<'a, T, I>(rows: I) -> String
where
    T: CsvRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out = csv_line(T::headers().iter());
    out.push('\n');
    for row in rows {
        out.push_str(&csv_line(row.row()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{MemberFilter, apply_filter};
    use crate::models::{MemberStatus, Role};

    fn member(id: Id, name: &str, rank: Rank, points: i64, status: MemberStatus) -> Member {
        Member {
            id,
            name: name.into(),
            email: format!("m{id}@doan.vn"),
            phone: None,
            unit_id: Some(1),
            unit_name: Some("Chi đoàn 1".into()),
            rank: Some(rank),
            status,
            points,
            join_date: None,
            birth_date: None,
            education: None,
            workplace: None,
            role: Role::Member,
        }
    }

    fn unit(id: Id, name: &str, avg: f64) -> Unit {
        Unit {
            id,
            name: name.into(),
            leader_name: "BCH".into(),
            leader_id: None,
            total_members: 20,
            active_members: 18,
            average_points: avg,
            activity_count: 3,
            established_date: None,
            status: UnitStatus::Active,
            description: None,
        }
    }

    #[test]
    fn test_rank_distribution_covers_every_rank() {
        let members = vec![
            member(1, "An", Rank::Excellent, 95, MemberStatus::Active),
            member(2, "Bình", Rank::Good, 75, MemberStatus::Active),
            member(3, "Cường", Rank::Excellent, 91, MemberStatus::Inactive),
            member(4, "Dung", Rank::Good, 70, MemberStatus::Active),
        ];
        let dist = rank_distribution(&members);
        assert_eq!(dist.len(), 4);
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].percent, 50.0);
        assert_eq!(dist[3].rank, Rank::Poor);
        assert_eq!(dist[3].count, 0);
        assert!(rank_distribution(&[]).iter().all(|b| b.percent == 0.0));
    }

    #[test]
    fn test_top_units_descending_with_stable_ties() {
        let units = vec![
            unit(1, "A", 70.0),
            unit(2, "B", 88.0),
            unit(3, "C", 88.0),
            unit(4, "D", 95.0),
        ];
        let top = top_units(&units, 3);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["D", "B", "C"]);
        assert_eq!(top[0].position, 1);
        assert!(top.windows(2).all(|w| w[0].average_points >= w[1].average_points));
        assert_eq!(top_units(&units, 10).len(), 4);
    }

    #[test]
    fn test_dashboard_summary() {
        let members = vec![
            member(1, "An", Rank::Excellent, 90, MemberStatus::Active),
            member(2, "Bình", Rank::Average, 60, MemberStatus::Inactive),
        ];
        let units = vec![unit(1, "A", 75.0)];
        let summary = DashboardSummary::build(&members, &units, &[]);
        assert_eq!(summary.total_members, 2);
        assert_eq!(summary.active_members, 1);
        assert_eq!(summary.average_points, 75.0);
        assert_eq!(summary.active_rate(), 50.0);
        assert_eq!(summary.top_units.len(), 1);
        assert_eq!(summary.suggestions.total, 0);

        let empty = DashboardSummary::build(&[], &[], &[]);
        assert_eq!(empty.average_points, 0.0);
        assert_eq!(empty.active_rate(), 0.0);
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_export_filtered_members() {
        let members = vec![
            member(1, "Nguyễn Văn An", Rank::Excellent, 95, MemberStatus::Active),
            member(2, "Trần, Thị Bình", Rank::Good, 75, MemberStatus::Active),
        ];
        let filter = MemberFilter {
            search: "bình".into(),
            ..Default::default()
        };
        let csv = to_csv(apply_filter(&members, &filter));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID,Họ tên,Email"));
        assert_eq!(
            lines[1],
            "2,\"Trần, Thị Bình\",m2@doan.vn,,Chi đoàn 1,Khá,75,Hoạt động"
        );
    }
}
