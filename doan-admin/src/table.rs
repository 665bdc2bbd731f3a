//! Plain-text table rendering

use shared::Page;
use shared::models::{Member, Post, Suggestion, Survey, Unit};
use shared::types::Labeled;

/// Shown in place of a table with no rows
pub const EMPTY_MESSAGE: &str = "Không có kết quả";

/// Widest any single cell may render
const MAX_CELL_WIDTH: usize = 32;

/// A record with a fixed set of table columns
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Display width in terminal columns; Vietnamese letters are precomposed
/// and take one column each
pub fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate to `max_width` columns, marking the cut with `…`
pub fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Pad (or truncate) to exactly `width` columns
pub fn pad(s: &str, width: usize, align_right: bool) -> String {
    let s = truncate(s, width);
    let spaces = width - display_width(&s);
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

fn is_numeric(cell: &str) -> bool {
    !cell.is_empty()
        && cell
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%' | '-'))
}

/// Render `rows` with a header and separator line
pub fn render_rows(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return format!("  {EMPTY_MESSAGE}\n");
    }
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(display_width(cell).min(MAX_CELL_WIDTH));
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w, false))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in rows {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                pad(cell, *w, is_numeric(cell))
            })
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

pub fn render_table<'a, T, I>(rows: I) -> String
where
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().map(|row| row.cells()).collect();
    render_rows(T::headers(), &rows)
}

/// Table plus a pagination footer
pub fn render_page<T: TableRow>(page: &Page<T>) -> String {
    let mut out = render_table(&page.items);
    if !page.is_empty() {
        out.push_str(&format!(
            "Trang {}/{} · {} kết quả{}{}\n",
            page.page,
            page.total_pages,
            page.total,
            if page.has_prev() { " · [prev]" } else { "" },
            if page.has_next() { " · [next]" } else { "" },
        ));
    }
    out
}

/// `label: value` lines for a detail view
pub fn render_fields(fields: &[(&str, String)]) -> String {
    let width = fields
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or(0);
    fields
        .iter()
        .map(|(label, value)| format!("  {} : {}\n", pad(label, width, false), value))
        .collect()
}

fn date_or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".into())
}

impl TableRow for Member {
    fn headers() -> &'static [&'static str] {
        &["ID", "Họ tên", "Email", "Chi đoàn", "Xếp loại", "Điểm", "Trạng thái"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.unit_display().to_string(),
            self.rank.map_or("—", |r| r.label()).to_string(),
            self.points.to_string(),
            self.status.label().to_string(),
        ]
    }
}

impl TableRow for Unit {
    fn headers() -> &'static [&'static str] {
        &["ID", "Tên chi đoàn", "Bí thư", "Đoàn viên", "Hoạt động", "Điểm TB", "Trạng thái"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.leader_name.clone(),
            self.total_members.to_string(),
            format!("{:.0}%", self.activity_rate() * 100.0),
            format!("{:.1}", self.average_points),
            self.status.label().to_string(),
        ]
    }
}

impl TableRow for Post {
    fn headers() -> &'static [&'static str] {
        &["ID", "Tiêu đề", "Tác giả", "Loại", "Trạng thái", "Lượt xem", "Ngày tạo"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author_name.clone(),
            self.post_type.label().to_string(),
            self.status.label().to_string(),
            self.view_count.to_string(),
            date_or_dash(self.created_at.map(|t| t.format("%d/%m/%Y"))),
        ]
    }
}

impl TableRow for Suggestion {
    fn headers() -> &'static [&'static str] {
        &["ID", "Tiêu đề", "Người gửi", "Danh mục", "Ưu tiên", "Trạng thái", "Phản hồi"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.display_submitter().to_string(),
            self.category.label().to_string(),
            self.priority.label().to_string(),
            self.status.label().to_string(),
            self.responses.len().to_string(),
        ]
    }
}

impl TableRow for Survey {
    fn headers() -> &'static [&'static str] {
        &["ID", "Tiêu đề", "Trạng thái", "Câu hỏi", "Phản hồi", "Tỷ lệ", "Kết thúc"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.status.label().to_string(),
            self.question_count.to_string(),
            self.response_count.to_string(),
            format!("{:.0}%", self.response_rate()),
            date_or_dash(self.ends_at.map(|t| t.format("%d/%m/%Y"))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::listing::paginate;

    #[test]
    fn test_pad_and_truncate_count_chars() {
        assert_eq!(pad("Khá", 5, false), "Khá  ");
        assert_eq!(pad("92", 4, true), "  92");
        assert_eq!(truncate("Nguyễn Văn An", 8), "Nguyễn …");
        assert_eq!(display_width("Nguyễn"), 6);
    }

    #[test]
    fn test_empty_page_renders_message() {
        let page: Page<Member> = paginate(&[], 1, 10);
        assert_eq!(render_page(&page), format!("  {EMPTY_MESSAGE}\n"));
    }

    #[test]
    fn test_rows_align() {
        let out = render_rows(
            &["ID", "Tên"],
            &[
                vec!["1".into(), "Chi đoàn 12A1".into()],
                vec!["10".into(), "CĐ".into()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID | Tên");
        assert_eq!(lines[1], "---+--------------");
        assert_eq!(lines[2], " 1 | Chi đoàn 12A1");
        assert_eq!(lines[3], "10 | CĐ");
    }

    #[test]
    fn test_render_fields() {
        let out = render_fields(&[("ID", "1".into()), ("Họ tên", "An".into())]);
        assert_eq!(out, "  ID     : 1\n  Họ tên : An\n");
    }
}
