//! Detail views shown inside a modal

use shared::models::{Member, Post, Suggestion, Survey, Unit};
use shared::types::Labeled;

use crate::table::render_fields;

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("—").to_string()
}

pub fn member(m: &Member) -> String {
    render_fields(&[
        ("ID", m.id.to_string()),
        ("Họ tên", m.name.clone()),
        ("Email", m.email.clone()),
        ("Điện thoại", or_dash(m.phone.as_deref())),
        ("Chi đoàn", m.unit_display().to_string()),
        ("Xếp loại", m.rank.map_or("—", |r| r.label()).to_string()),
        ("Điểm rèn luyện", m.points.to_string()),
        ("Trạng thái", m.status.label().to_string()),
        (
            "Ngày vào Đoàn",
            m.join_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "—".into()),
        ),
        ("Trình độ", or_dash(m.education.as_deref())),
        ("Nơi làm việc", or_dash(m.workplace.as_deref())),
    ])
}

pub fn unit(u: &Unit) -> String {
    render_fields(&[
        ("ID", u.id.to_string()),
        ("Tên chi đoàn", u.name.clone()),
        ("Bí thư", u.leader_name.clone()),
        (
            "Đoàn viên",
            format!("{} ({} hoạt động)", u.total_members, u.active_members),
        ),
        ("Điểm trung bình", format!("{:.1}", u.average_points)),
        ("Số hoạt động", u.activity_count.to_string()),
        ("Trạng thái", u.status.label().to_string()),
        ("Mô tả", or_dash(u.description.as_deref())),
    ])
}

pub fn post(p: &Post) -> String {
    let mut out = render_fields(&[
        ("ID", p.id.to_string()),
        ("Tiêu đề", p.title.clone()),
        ("Tác giả", p.author_name.clone()),
        ("Loại", p.post_type.label().to_string()),
        ("Trạng thái", p.status.label().to_string()),
        ("Lượt xem", p.view_count.to_string()),
    ]);
    out.push_str(&format!("\n{}\n", p.content));
    out
}

pub fn suggestion(s: &Suggestion) -> String {
    let mut out = render_fields(&[
        ("ID", s.id.to_string()),
        ("Tiêu đề", s.title.clone()),
        ("Người gửi", s.display_submitter().to_string()),
        ("Danh mục", s.category.label().to_string()),
        ("Ưu tiên", s.priority.label().to_string()),
        ("Trạng thái", s.status.label().to_string()),
    ]);
    out.push_str(&format!("\n{}\n", s.content));
    if !s.responses.is_empty() {
        out.push_str("\nPhản hồi:\n");
        for r in &s.responses {
            let when = r
                .created_at
                .map(|t| format!(" ({})", t.format("%d/%m/%Y %H:%M")))
                .unwrap_or_default();
            out.push_str(&format!("  - {}{when}: {}\n", r.responder_name, r.content));
        }
    }
    out
}

pub fn survey(s: &Survey) -> String {
    render_fields(&[
        ("ID", s.id.to_string()),
        ("Tiêu đề", s.title.clone()),
        ("Mô tả", or_dash(s.description.as_deref())),
        ("Trạng thái", s.status.label().to_string()),
        ("Số câu hỏi", s.question_count.to_string()),
        (
            "Phản hồi",
            format!(
                "{}/{} ({:.0}%)",
                s.response_count,
                s.target_count,
                s.response_rate()
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_suggestion_hides_submitter() {
        let s: Suggestion = serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Sửa đèn phòng học",
            "isAnonymous": true,
            "submitter": {"id": 4, "name": "Lê Thị Hoa"}
        }))
        .unwrap();
        let out = suggestion(&s);
        assert!(out.contains("Ẩn danh"));
        assert!(!out.contains("Lê Thị Hoa"));
    }
}
