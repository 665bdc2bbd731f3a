//! Console command line parsing

use std::path::PathBuf;

use shared::types::Id;

use crate::shell::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Screen),
    Search(String),
    Filter { field: String, value: String },
    ClearFilter,
    Page(u32),
    Next,
    Prev,
    Refresh,
    View(Id),
    /// `None` edits the signed-in profile
    Edit(Option<Id>),
    New,
    Set { field: String, value: String },
    Save,
    Cancel,
    Delete(Id),
    Confirm,
    Moderate { id: Id, status: String },
    Status { id: Id, status: String, note: Option<String> },
    Respond { id: Id, content: String },
    Export(PathBuf),
    QrNew { kind: String, id: Id },
    QrCheck(String),
    Help,
    Logout,
    Quit,
}

/// Usage text printed by `help`
pub const HELP: &str = "\
  <số> | go <màn hình>        chuyển màn hình
  s <từ khóa>                  tìm kiếm (bỏ trống để xóa)
  f <trường> <giá trị|all>     lọc theo trường
  f clear                      xóa bộ lọc
  p <n> | next | prev          phân trang
  r                            tải lại
  v <id> | e [id] | d <id>     xem / sửa / xóa
  new                          thêm chi đoàn
  set <trường> <giá trị>       sửa trường trong biểu mẫu
  save | cancel | y            lưu / hủy / xác nhận xóa
  mod <id> <trạng thái>        duyệt bài viết
  st <id> <trạng thái> [ghi chú]  cập nhật kiến nghị
  reply <id> <nội dung>        phản hồi kiến nghị
  export <tệp.csv>             xuất danh sách đang lọc
  qr <loại> <id> | qr check <mã>
  logout | quit";

fn parse_id(s: Option<&str>) -> Result<Id, String> {
    let s = s.ok_or("Thiếu mã (id)")?;
    s.parse()
        .map_err(|_| format!("Mã không hợp lệ: {s}"))
}

/// Split off the first word; the rest keeps its inner spacing
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if let Some(screen) = Screen::parse(line) {
            return Ok(Some(Self::Go(screen)));
        }
        let (verb, rest) = split_word(line);
        let (first, tail) = split_word(rest);
        let cmd = match verb.to_ascii_lowercase().as_str() {
            "go" => Self::Go(Screen::parse(rest).ok_or_else(|| format!("Không có màn hình '{rest}'"))?),
            "s" | "search" => Self::Search(rest.to_string()),
            "f" | "filter" if first == "clear" && tail.is_empty() => Self::ClearFilter,
            "f" | "filter" => {
                if first.is_empty() {
                    return Err("Cú pháp: f <trường> <giá trị>".into());
                }
                Self::Filter {
                    field: first.to_ascii_lowercase(),
                    value: tail.to_string(),
                }
            }
            "p" | "page" => Self::Page(
                rest.parse()
                    .map_err(|_| format!("Số trang không hợp lệ: {rest}"))?,
            ),
            "n" | "next" => Self::Next,
            "prev" => Self::Prev,
            "r" | "refresh" => Self::Refresh,
            "v" | "view" => Self::View(parse_id(Some(rest))?),
            "e" | "edit" if rest.is_empty() => Self::Edit(None),
            "e" | "edit" => Self::Edit(Some(parse_id(Some(rest))?)),
            "new" => Self::New,
            "set" => {
                if first.is_empty() {
                    return Err("Cú pháp: set <trường> <giá trị>".into());
                }
                Self::Set {
                    field: first.to_ascii_lowercase(),
                    value: tail.to_string(),
                }
            }
            "save" => Self::Save,
            "cancel" | "c" => Self::Cancel,
            "d" | "delete" => Self::Delete(parse_id(Some(rest))?),
            "y" | "yes" => Self::Confirm,
            "mod" => Self::Moderate {
                id: parse_id(Some(first))?,
                status: tail.to_string(),
            },
            "st" | "status" => {
                let (status, note) = split_word(tail);
                Self::Status {
                    id: parse_id(Some(first))?,
                    status: status.to_string(),
                    note: (!note.is_empty()).then(|| note.to_string()),
                }
            }
            "reply" => Self::Respond {
                id: parse_id(Some(first))?,
                content: tail.to_string(),
            },
            "export" => {
                if rest.is_empty() {
                    return Err("Cú pháp: export <tệp.csv>".into());
                }
                Self::Export(PathBuf::from(rest))
            }
            "qr" if first == "check" => Self::QrCheck(tail.to_string()),
            "qr" => {
                let (id, _) = split_word(tail);
                Self::QrNew {
                    kind: first.to_string(),
                    id: parse_id((!id.is_empty()).then_some(id))?,
                }
            }
            "h" | "help" | "?" => Self::Help,
            "logout" => Self::Logout,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(format!("Lệnh không hợp lệ: {verb} (gõ 'help')")),
        };
        Ok(Some(cmd))
    }
}
