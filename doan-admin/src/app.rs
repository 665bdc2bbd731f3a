//! Console controller
//!
//! [`App`] turns parsed commands into state changes and API calls, and
//! renders the current screen as text. List fetches run as spawned tasks
//! that report back over a channel; each result carries the ticket it was
//! issued with, so a late answer to an outdated query is dropped.

use std::future::Future;
use std::path::Path;

use chrono::Utc;
use doan_client::{ApiClient, ClientError, ClientResult, FetchTicket, HttpClient, Session, SessionContext};
use shared::listing::{MemberFilter, PostFilter, SuggestionFilter, SurveyFilter, UnitFilter};
use shared::models::{
    Member, Post, PostStatus, ProfileUpdate, Suggestion, SuggestionResponse, SuggestionStats,
    SuggestionStatus, Survey, Unit, UnitUpdate,
};
use shared::qr::{QrKind, QrPayload};
use shared::report::to_csv;
use shared::response::ListPage;
use shared::types::{Id, Labeled};
use shared::validation::{validate_member, validate_profile, validate_survey, validate_unit};
use tokio::sync::mpsc;

use crate::command::{Command, HELP};
use crate::confirm::DeleteConfirmation;
use crate::forms::{
    MEMBER_FIELDS, SURVEY_FIELDS, UNIT_FIELDS, set_member_field, set_survey_field, set_unit_field,
};
use crate::modal::Modal;
use crate::notice::Notice;
use crate::profile::{PasswordForm, render_profile, render_profile_form, set_profile_field};
use crate::screens::filters::choice_help;
use crate::screens::{ListControls, ListScreen, Overview, detail};
use crate::shell::{Screen, Shell};

pub const SESSION_EXPIRED: &str = "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại";
const NO_LIST: &str = "Màn hình này không có danh sách";
const NOT_EDITING: &str = "Không có biểu mẫu đang chỉnh sửa";

/// What the input loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    SignedOut,
    Quit,
}

enum FetchEvent {
    Members(FetchTicket, ClientResult<ListPage<Member>>),
    Units(FetchTicket, ClientResult<ListPage<Unit>>),
    Posts(FetchTicket, ClientResult<ListPage<Post>>),
    Suggestions(FetchTicket, ClientResult<ListPage<Suggestion>>),
    Surveys(FetchTicket, ClientResult<ListPage<Survey>>),
    OverviewMembers(FetchTicket, ClientResult<ListPage<Member>>),
    OverviewUnits(FetchTicket, ClientResult<ListPage<Unit>>),
    OverviewSuggestions(FetchTicket, ClientResult<ListPage<Suggestion>>),
    Stats(ClientResult<SuggestionStats>),
}

/// Issue a fetch for one list screen if its query changed (or `force`)
macro_rules! fetch_list {
    ($app:expr, $screen:ident, $method:ident, $event:ident, $force:expr) => {{
        let ticket = if $force {
            Some($app.$screen.reload())
        } else {
            $app.$screen.begin_fetch()
        };
        if let Some(ticket) = ticket {
            let api = $app.api.clone();
            $app.spawn(async move {
                let result = api.$method(ticket.query()).await;
                FetchEvent::$event(ticket, result)
            });
        }
    }};
}

pub struct App<H: HttpClient + Clone + 'static> {
    api: ApiClient<H>,
    shell: Shell,
    page_size: u32,

    members: ListScreen<Member, MemberFilter>,
    units: ListScreen<Unit, UnitFilter>,
    posts: ListScreen<Post, PostFilter>,
    suggestions: ListScreen<Suggestion, SuggestionFilter>,
    surveys: ListScreen<Survey, SurveyFilter>,
    overview: Overview,

    member_modal: Modal<Member>,
    unit_modal: Modal<Unit>,
    post_modal: Modal<Post>,
    suggestion_modal: Modal<Suggestion>,
    survey_modal: Modal<Survey>,
    profile_modal: Modal<ProfileUpdate>,
    password: PasswordForm,
    pending_delete: DeleteConfirmation<(Screen, Id)>,
    last_qr: Option<QrPayload>,
    notice: Option<Notice>,

    tx: mpsc::UnboundedSender<FetchEvent>,
    rx: mpsc::UnboundedReceiver<FetchEvent>,
    in_flight: usize,
}

impl<H: HttpClient + Clone + 'static> App<H> {
    /// Build the console around a restored (or empty) session
    pub fn new(mut api: ApiClient<H>, session: SessionContext, page_size: u32) -> Self {
        api.set_token(session.token().map(str::to_string));
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            shell: Shell::new(session),
            page_size,
            members: ListScreen::new(page_size),
            units: ListScreen::new(page_size),
            posts: ListScreen::new(page_size),
            suggestions: ListScreen::new(page_size),
            surveys: ListScreen::new(page_size),
            overview: Overview::default(),
            member_modal: Modal::default(),
            unit_modal: Modal::default(),
            post_modal: Modal::default(),
            suggestion_modal: Modal::default(),
            survey_modal: Modal::default(),
            profile_modal: Modal::default(),
            password: PasswordForm::new(),
            pending_delete: DeleteConfirmation::new(),
            last_qr: None,
            notice: None,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn members(&self) -> &ListScreen<Member, MemberFilter> {
        &self.members
    }

    pub fn units(&self) -> &ListScreen<Unit, UnitFilter> {
        &self.units
    }

    pub fn posts(&self) -> &ListScreen<Post, PostFilter> {
        &self.posts
    }

    pub fn suggestions(&self) -> &ListScreen<Suggestion, SuggestionFilter> {
        &self.suggestions
    }

    pub fn member_modal(&self) -> &Modal<Member> {
        &self.member_modal
    }

    pub fn password_form(&self) -> &PasswordForm {
        &self.password
    }

    pub fn is_signed_in(&self) -> bool {
        self.shell.is_signed_in()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<()> {
        let resp = self.api.login(username, password).await?;
        if let Err(e) = self.shell.sign_in(Session::from_login(resp)) {
            self.api.logout();
            return Err(e);
        }
        self.reset_screens();
        let name = self
            .shell
            .profile()
            .map(|p| p.display_name().to_string())
            .unwrap_or_default();
        self.notice = Some(Notice::success(format!("Xin chào, {name}")));
        self.refresh().await;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.shell.logout();
        self.api.logout();
        self.reset_screens();
        self.notice = Some(Notice::info("Đã đăng xuất"));
    }

    fn reset_screens(&mut self) {
        let page_size = self.page_size;
        self.members = ListScreen::new(page_size);
        self.units = ListScreen::new(page_size);
        self.posts = ListScreen::new(page_size);
        self.suggestions = ListScreen::new(page_size);
        self.surveys = ListScreen::new(page_size);
        self.overview = Overview::default();
        self.member_modal.cancel();
        self.unit_modal.cancel();
        self.post_modal.cancel();
        self.suggestion_modal.cancel();
        self.survey_modal.cancel();
        self.profile_modal.cancel();
        self.password.clear();
        self.pending_delete.cancel();
        self.last_qr = None;
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        if !self.shell.is_signed_in() {
            return Flow::SignedOut;
        }
        if self.shell.session_mut().require().is_err() {
            self.api.logout();
            self.notice = Some(Notice::error(SESSION_EXPIRED));
            return Flow::SignedOut;
        }
        self.notice = None;
        tracing::debug!(command = ?command, screen = ?self.shell.screen(), "Handle command");

        match command {
            Command::Go(screen) => self.go(screen).await,
            Command::Search(text) => {
                self.with_list(|list| {
                    list.set_search(&text);
                    Ok(())
                })
                .await
            }
            Command::Filter { field, value } => {
                self.with_list(|list| list.set_filter(&field, &value)).await
            }
            Command::ClearFilter => {
                self.with_list(|list| {
                    list.clear_filter();
                    Ok(())
                })
                .await
            }
            Command::Page(page) => {
                self.with_list(|list| {
                    list.set_page(page);
                    Ok(())
                })
                .await
            }
            Command::Next => {
                self.with_list(|list| {
                    if list.next_page() {
                        Ok(())
                    } else {
                        Err("Đã ở trang cuối".into())
                    }
                })
                .await
            }
            Command::Prev => {
                self.with_list(|list| {
                    if list.prev_page() {
                        Ok(())
                    } else {
                        Err("Đã ở trang đầu".into())
                    }
                })
                .await
            }
            Command::Refresh => self.reload().await,
            Command::View(id) => self.view(id).await,
            Command::Edit(id) => self.edit(id).await,
            Command::New => self.new_unit(),
            Command::Set { field, value } => self.set_field(&field, &value),
            Command::Save => self.save().await,
            Command::Cancel => self.cancel(),
            Command::Delete(id) => self.request_delete(id),
            Command::Confirm => self.confirm_delete().await,
            Command::Moderate { id, status } => self.moderate(id, &status).await,
            Command::Status { id, status, note } => self.review(id, &status, note).await,
            Command::Respond { id, content } => self.respond(id, &content).await,
            Command::Export(path) => self.export(&path).await,
            Command::QrNew { kind, id } => self.qr_new(&kind, id),
            Command::QrCheck(text) => self.qr_check(&text),
            Command::Help => self.notice = Some(Notice::info(HELP)),
            Command::Logout => {
                self.logout();
                return Flow::SignedOut;
            }
            Command::Quit => return Flow::Quit,
        }

        if self.shell.is_signed_in() {
            Flow::Continue
        } else {
            Flow::SignedOut
        }
    }

    // ── Fetching ────────────────────────────────────────────────────

    fn spawn<Fut>(&mut self, task: Fut)
    where
        Fut: Future<Output = FetchEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            // The receiver lives as long as the app
            let _ = tx.send(task.await);
        });
    }

    fn start_fetches(&mut self, force: bool) {
        match self.shell.screen() {
            Screen::Dashboard | Screen::Reports => self.fetch_overview(force),
            Screen::Members => fetch_list!(self, members, list_members, Members, force),
            Screen::Units => fetch_list!(self, units, list_units, Units, force),
            Screen::Posts => fetch_list!(self, posts, list_posts, Posts, force),
            Screen::Suggestions => {
                fetch_list!(self, suggestions, list_suggestions, Suggestions, force)
            }
            Screen::Surveys => fetch_list!(self, surveys, list_surveys, Surveys, force),
            Screen::QrCodes | Screen::Profile | Screen::ChangePassword => {}
        }
    }

    fn fetch_overview(&mut self, force: bool) {
        if force {
            self.overview.mark_dirty();
        }
        let query = Overview::member_query();
        if self.overview.members.needs_fetch(&query) {
            let ticket = self.overview.members.begin(query);
            let api = self.api.clone();
            self.spawn(async move {
                let result = api.list_members(ticket.query()).await;
                FetchEvent::OverviewMembers(ticket, result)
            });
        }
        let query = Overview::list_query();
        if self.overview.units.needs_fetch(&query) {
            let ticket = self.overview.units.begin(query.clone());
            let api = self.api.clone();
            self.spawn(async move {
                let result = api.list_units(ticket.query()).await;
                FetchEvent::OverviewUnits(ticket, result)
            });
        }
        if self.overview.suggestions.needs_fetch(&query) {
            let ticket = self.overview.suggestions.begin(query);
            let api = self.api.clone();
            self.spawn(async move {
                let result = api.list_suggestions(ticket.query()).await;
                FetchEvent::OverviewSuggestions(ticket, result)
            });
        }
        if self.shell.screen() == Screen::Dashboard && self.overview.stats.is_none() {
            let api = self.api.clone();
            self.spawn(async move { FetchEvent::Stats(api.suggestion_stats().await) });
        }
    }

    /// Wait for every spawned fetch to report back
    async fn settle(&mut self) {
        while self.in_flight > 0 {
            let Some(event) = self.rx.recv().await else {
                break;
            };
            self.in_flight -= 1;
            self.apply(event);
        }
    }

    fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Members(ticket, result) => {
                self.observe(&result);
                self.members.resolve(ticket, result);
            }
            FetchEvent::Units(ticket, result) => {
                self.observe(&result);
                self.units.resolve(ticket, result);
            }
            FetchEvent::Posts(ticket, result) => {
                self.observe(&result);
                self.posts.resolve(ticket, result);
            }
            FetchEvent::Suggestions(ticket, result) => {
                self.observe(&result);
                self.suggestions.resolve(ticket, result);
            }
            FetchEvent::Surveys(ticket, result) => {
                self.observe(&result);
                self.surveys.resolve(ticket, result);
            }
            FetchEvent::OverviewMembers(ticket, result) => {
                self.observe(&result);
                self.overview.members.resolve(ticket, result);
            }
            FetchEvent::OverviewUnits(ticket, result) => {
                self.observe(&result);
                self.overview.units.resolve(ticket, result);
            }
            FetchEvent::OverviewSuggestions(ticket, result) => {
                self.observe(&result);
                self.overview.suggestions.resolve(ticket, result);
            }
            FetchEvent::Stats(result) => {
                self.observe(&result);
                match result {
                    Ok(stats) => self.overview.stats = Some(stats),
                    Err(e) => tracing::warn!(error = %e, "Suggestion stats unavailable"),
                }
            }
        }
    }

    /// A 401 anywhere ends the session
    fn observe<T>(&mut self, result: &ClientResult<T>) {
        if self.shell.session_mut().observe(result) {
            self.api.logout();
            self.notice = Some(Notice::error(SESSION_EXPIRED));
        }
    }

    pub async fn refresh(&mut self) {
        self.start_fetches(false);
        self.settle().await;
    }

    async fn reload(&mut self) {
        self.start_fetches(true);
        self.settle().await;
    }

    // ── Navigation and lists ────────────────────────────────────────

    async fn go(&mut self, screen: Screen) {
        match self.shell.navigate(screen) {
            Ok(()) => {
                self.pending_delete.cancel();
                if screen == Screen::Profile {
                    self.reload_profile().await;
                }
                self.refresh().await;
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    fn list_mut(&mut self) -> Option<&mut dyn ListControls> {
        match self.shell.screen() {
            Screen::Members => Some(&mut self.members),
            Screen::Units => Some(&mut self.units),
            Screen::Posts => Some(&mut self.posts),
            Screen::Suggestions => Some(&mut self.suggestions),
            Screen::Surveys => Some(&mut self.surveys),
            _ => None,
        }
    }

    fn list(&self) -> Option<&dyn ListControls> {
        match self.shell.screen() {
            Screen::Members => Some(&self.members),
            Screen::Units => Some(&self.units),
            Screen::Posts => Some(&self.posts),
            Screen::Suggestions => Some(&self.suggestions),
            Screen::Surveys => Some(&self.surveys),
            _ => None,
        }
    }

    /// Apply a change to the current list, then refetch if the query moved
    async fn with_list<F>(&mut self, change: F)
    where
        F: FnOnce(&mut dyn ListControls) -> Result<(), String>,
    {
        let outcome = match self.list_mut() {
            Some(list) => change(list),
            None => Err(NO_LIST.to_string()),
        };
        match outcome {
            Ok(()) => self.refresh().await,
            Err(msg) => self.notice = Some(Notice::error(msg)),
        }
    }

    fn not_found(&mut self, id: Id) {
        self.notice = Some(Notice::error(format!("Không tìm thấy mục #{id} trong danh sách")));
    }

    async fn view(&mut self, id: Id) {
        match self.shell.screen() {
            Screen::Members => {
                let result = match self.members.find(|m| m.id == id) {
                    Some(m) => Ok(m.clone()),
                    None => self.api.get_member(id).await,
                };
                self.observe(&result);
                match result {
                    Ok(m) => self.member_modal.open_view(m),
                    Err(e) => self.notice = Some(Notice::from(&e)),
                }
            }
            Screen::Units => match self.units.find(|u| u.id == id).cloned() {
                Some(u) => self.unit_modal.open_view(u),
                None => self.not_found(id),
            },
            Screen::Posts => match self.posts.find(|p| p.id == id).cloned() {
                Some(p) => self.post_modal.open_view(p),
                None => self.not_found(id),
            },
            Screen::Suggestions => match self.suggestions.find(|s| s.id == id).cloned() {
                Some(s) => self.suggestion_modal.open_view(s),
                None => self.not_found(id),
            },
            Screen::Surveys => match self.surveys.find(|s| s.id == id).cloned() {
                Some(s) => self.survey_modal.open_view(s),
                None => self.not_found(id),
            },
            _ => self.notice = Some(Notice::info(NO_LIST)),
        }
    }

    // ── Edit modals ─────────────────────────────────────────────────

    async fn edit(&mut self, id: Option<Id>) {
        match (self.shell.screen(), id) {
            (Screen::Profile, _) => {
                if let Some(profile) = self.shell.profile() {
                    self.profile_modal.open_edit(ProfileUpdate::from_profile(profile));
                }
            }
            (Screen::Members, Some(id)) => match self.members.find(|m| m.id == id).cloned() {
                Some(m) => self.member_modal.open_edit(m),
                None => self.not_found(id),
            },
            (Screen::Units, Some(id)) => match self.units.find(|u| u.id == id).cloned() {
                Some(u) => self.unit_modal.open_edit(u),
                None => self.not_found(id),
            },
            (Screen::Surveys, Some(id)) => match self.surveys.find(|s| s.id == id).cloned() {
                Some(survey) => self.survey_modal.open_edit(survey),
                None => self.not_found(id),
            },
            (Screen::Posts, Some(_)) => {
                self.notice = Some(Notice::info("Dùng 'mod <id> <trạng thái>' để duyệt bài viết"))
            }
            (Screen::Suggestions, Some(_)) => {
                self.notice = Some(Notice::info(
                    "Dùng 'st <id> <trạng thái>' hoặc 'reply <id> <nội dung>'",
                ))
            }
            (_, None) => self.notice = Some(Notice::error("Thiếu mã (id)")),
            _ => self.notice = Some(Notice::info(NO_LIST)),
        }
    }

    fn new_unit(&mut self) {
        if self.shell.screen() == Screen::Units {
            self.unit_modal.open_edit(Unit::default());
        } else {
            self.notice = Some(Notice::info("Mở màn hình chi đoàn để thêm mới"));
        }
    }

    /// Replace the cached profile with the server's copy
    async fn reload_profile(&mut self) {
        let result = self.api.get_profile().await;
        self.observe(&result);
        match result {
            Ok(profile) => {
                if let Err(e) = self.shell.session_mut().refresh_profile(profile) {
                    self.notice = Some(Notice::from(&e));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile reload failed");
                self.notice = Some(Notice::from(&e));
            }
        }
    }

    fn set_field(&mut self, field: &str, value: &str) {
        let result = match self.shell.screen() {
            Screen::Members => match self.member_modal.draft_mut() {
                Some(draft) => set_member_field(draft, field, value),
                None => Err(NOT_EDITING.to_string()),
            },
            Screen::Units => match self.unit_modal.draft_mut() {
                Some(draft) => set_unit_field(draft, field, value),
                None => Err(NOT_EDITING.to_string()),
            },
            Screen::Surveys => match self.survey_modal.draft_mut() {
                Some(draft) => set_survey_field(draft, field, value),
                None => Err(NOT_EDITING.to_string()),
            },
            Screen::Profile => match self.profile_modal.draft_mut() {
                Some(draft) => {
                    if set_profile_field(draft, field, value) {
                        Ok(())
                    } else {
                        Err(format!("Trường không hợp lệ: {field}"))
                    }
                }
                None => Err(NOT_EDITING.to_string()),
            },
            Screen::ChangePassword => {
                if self.password.set(field, value) {
                    Ok(())
                } else {
                    Err("Trường hợp lệ: current, new, confirm".to_string())
                }
            }
            _ => Err(NOT_EDITING.to_string()),
        };
        if let Err(msg) = result {
            self.notice = Some(Notice::error(msg));
        }
    }

    async fn save(&mut self) {
        match self.shell.screen() {
            Screen::Members => self.save_member().await,
            Screen::Units => self.save_unit().await,
            Screen::Surveys => self.save_survey().await,
            Screen::Profile => self.save_profile().await,
            Screen::ChangePassword => self.change_password().await,
            _ => self.notice = Some(Notice::info(NOT_EDITING)),
        }
    }

    async fn save_member(&mut self) {
        let Some(before) = self.member_modal.original().cloned() else {
            self.notice = Some(Notice::info(NOT_EDITING));
            return;
        };
        let after = match self.member_modal.submit(validate_member) {
            Ok(after) => after,
            Err(errors) => {
                self.notice = Some(Notice::from(&errors));
                return;
            }
        };
        let result = self.api.update_member(&before, &after).await;
        self.observe(&result);
        match result {
            Ok(saved) => {
                let id = saved.id;
                let name = saved.name.clone();
                self.members
                    .rows_mut()
                    .update_where(|m| m.id == id, |m| *m = saved);
                self.overview.mark_dirty();
                self.notice = Some(Notice::success(format!("Đã cập nhật đoàn viên {name}")));
            }
            Err(e) => {
                self.notice = Some(Notice::from(&e));
                self.member_modal = Modal::Editing {
                    original: before,
                    draft: after,
                };
            }
        }
    }

    async fn save_unit(&mut self) {
        let Some(before) = self.unit_modal.original().cloned() else {
            self.notice = Some(Notice::info(NOT_EDITING));
            return;
        };
        let after = match self.unit_modal.submit(validate_unit) {
            Ok(after) => after,
            Err(errors) => {
                self.notice = Some(Notice::from(&errors));
                return;
            }
        };
        let form = UnitUpdate::from_unit(&after);
        let result = if after.id == 0 {
            self.api.create_unit(&form).await
        } else {
            self.api.update_unit(after.id, &form).await
        };
        self.observe(&result);
        match result {
            Ok(saved) => {
                let id = saved.id;
                let rows = self.units.rows_mut();
                if !rows.update_where(|u| u.id == id, |u| *u = saved) {
                    rows.mark_dirty();
                }
                self.overview.mark_dirty();
                self.notice = Some(Notice::success("Đã cập nhật chi đoàn"));
            }
            Err(e) => {
                self.notice = Some(Notice::from(&e));
                self.unit_modal = Modal::Editing {
                    original: before,
                    draft: after,
                };
            }
        }
    }

    async fn save_survey(&mut self) {
        let Some(before) = self.survey_modal.original().cloned() else {
            self.notice = Some(Notice::info(NOT_EDITING));
            return;
        };
        let after = match self.survey_modal.submit(validate_survey) {
            Ok(after) => after,
            Err(errors) => {
                self.notice = Some(Notice::from(&errors));
                return;
            }
        };
        let result = self.api.update_survey(&after).await;
        self.observe(&result);
        match result {
            Ok(saved) => {
                let id = saved.id;
                self.surveys
                    .rows_mut()
                    .update_where(|s| s.id == id, |s| *s = saved);
                self.notice = Some(Notice::success("Đã cập nhật khảo sát"));
            }
            Err(e) => {
                self.notice = Some(Notice::from(&e));
                self.survey_modal = Modal::Editing {
                    original: before,
                    draft: after,
                };
            }
        }
    }

    async fn save_profile(&mut self) {
        let Some(current) = self.shell.profile().cloned() else {
            self.notice = Some(Notice::error(SESSION_EXPIRED));
            return;
        };
        let form = match self.profile_modal.submit(validate_profile) {
            Ok(form) => form,
            Err(errors) => {
                self.notice = Some(Notice::from(&errors));
                return;
            }
        };
        let result = self.api.update_profile(&current, &form).await;
        self.observe(&result);
        match result {
            Ok(profile) => match self.shell.session_mut().refresh_profile(profile) {
                Ok(()) => self.notice = Some(Notice::success("Đã cập nhật thông tin cá nhân")),
                Err(e) => self.notice = Some(Notice::from(&e)),
            },
            Err(e) => {
                self.notice = Some(Notice::from(&e));
                self.profile_modal = Modal::Editing {
                    original: ProfileUpdate::from_profile(&current),
                    draft: form,
                };
            }
        }
    }

    async fn change_password(&mut self) {
        if let Err(errors) = self.password.validate() {
            self.notice = Some(Notice::from(&errors));
            return;
        }
        let result = self
            .api
            .change_password(
                &self.password.current,
                &self.password.new,
                &self.password.confirm,
            )
            .await;
        self.observe(&result);
        match result {
            Ok(()) => {
                self.password.clear();
                self.notice = Some(Notice::success("Đổi mật khẩu thành công"));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    fn cancel(&mut self) {
        match self.shell.screen() {
            Screen::Members => self.member_modal.cancel(),
            Screen::Units => self.unit_modal.cancel(),
            Screen::Posts => self.post_modal.cancel(),
            Screen::Suggestions => self.suggestion_modal.cancel(),
            Screen::Surveys => self.survey_modal.cancel(),
            Screen::Profile => self.profile_modal.cancel(),
            Screen::ChangePassword => self.password.clear(),
            Screen::Dashboard | Screen::Reports | Screen::QrCodes => {}
        }
        self.pending_delete.cancel();
    }

    // ── Delete ──────────────────────────────────────────────────────

    fn request_delete(&mut self, id: Id) {
        let screen = self.shell.screen();
        let exists = match screen {
            Screen::Members => self.members.find(|m| m.id == id).is_some(),
            Screen::Units => self.units.find(|u| u.id == id).is_some(),
            Screen::Posts => self.posts.find(|p| p.id == id).is_some(),
            Screen::Surveys => self.surveys.find(|s| s.id == id).is_some(),
            _ => {
                self.notice = Some(Notice::info("Không thể xóa trên màn hình này"));
                return;
            }
        };
        if !exists {
            self.not_found(id);
            return;
        }
        self.pending_delete.request((screen, id));
        self.notice = Some(Notice::info(format!(
            "Xóa mục #{id}? Gõ 'y' để xác nhận, 'cancel' để hủy"
        )));
    }

    async fn confirm_delete(&mut self) {
        let Some((screen, id)) = self.pending_delete.confirm() else {
            self.notice = Some(Notice::info("Không có thao tác nào chờ xác nhận"));
            return;
        };
        let result = match screen {
            Screen::Members => self.api.delete_member(id).await,
            Screen::Units => self.api.delete_unit(id).await,
            Screen::Posts => self.api.delete_post(id).await,
            Screen::Surveys => self.api.delete_survey(id).await,
            _ => Err(ClientError::Internal(format!("delete on {screen:?}"))),
        };
        self.observe(&result);
        match result {
            Ok(()) => {
                match screen {
                    Screen::Members => {
                        self.members.rows_mut().remove_where(|m| m.id == id);
                    }
                    Screen::Units => {
                        self.units.rows_mut().remove_where(|u| u.id == id);
                    }
                    Screen::Posts => {
                        self.posts.rows_mut().remove_where(|p| p.id == id);
                    }
                    Screen::Surveys => {
                        self.surveys.rows_mut().remove_where(|s| s.id == id);
                    }
                    _ => {}
                }
                self.notice = Some(Notice::success(format!("Đã xóa #{id}")));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    // ── Moderation and review ───────────────────────────────────────

    async fn moderate(&mut self, id: Id, status: &str) {
        if self.shell.screen() != Screen::Posts {
            self.notice = Some(Notice::info("Mở màn hình bài viết để duyệt"));
            return;
        }
        let next: PostStatus = match status.parse() {
            Ok(next) => next,
            Err(e) => {
                self.notice = Some(Notice::error(format!(
                    "{e} (có: {})",
                    choice_help::<PostStatus>()
                )));
                return;
            }
        };
        let Some(post) = self.posts.find(|p| p.id == id).cloned() else {
            self.not_found(id);
            return;
        };
        let result = self.api.moderate_post(&post, next).await;
        self.observe(&result);
        match result {
            Ok(updated) => {
                let label = updated.status.label();
                self.posts
                    .rows_mut()
                    .update_where(|p| p.id == id, |p| *p = updated);
                self.notice = Some(Notice::success(format!("Bài viết #{id}: {label}")));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    async fn review(&mut self, id: Id, status: &str, note: Option<String>) {
        if self.shell.screen() != Screen::Suggestions {
            self.notice = Some(Notice::info("Mở màn hình kiến nghị để cập nhật"));
            return;
        }
        let next: SuggestionStatus = match status.parse() {
            Ok(next) => next,
            Err(e) => {
                self.notice = Some(Notice::error(format!(
                    "{e} (có: {})",
                    choice_help::<SuggestionStatus>()
                )));
                return;
            }
        };
        let Some(suggestion) = self.suggestions.find(|s| s.id == id).cloned() else {
            self.not_found(id);
            return;
        };
        let result = self
            .api
            .update_suggestion_status(&suggestion, next, note)
            .await;
        self.observe(&result);
        match result {
            Ok(status) => {
                self.suggestions
                    .rows_mut()
                    .update_where(|s| s.id == id, |s| s.status = status);
                self.overview.mark_dirty();
                self.notice = Some(Notice::success(format!(
                    "Kiến nghị #{id}: {}",
                    status.label()
                )));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    async fn respond(&mut self, id: Id, content: &str) {
        if self.shell.screen() != Screen::Suggestions {
            self.notice = Some(Notice::info("Mở màn hình kiến nghị để phản hồi"));
            return;
        }
        let Some(suggestion) = self.suggestions.find(|s| s.id == id).cloned() else {
            self.not_found(id);
            return;
        };
        let result = self.api.respond_to_suggestion(&suggestion, content).await;
        self.observe(&result);
        match result {
            Ok(saved) => {
                let responder_name = self
                    .shell
                    .profile()
                    .map(|p| p.display_name().to_string())
                    .unwrap_or_default();
                let response = saved.unwrap_or_else(|| SuggestionResponse {
                    id: None,
                    content: content.trim().to_string(),
                    responder_name,
                    created_at: Some(Utc::now()),
                });
                self.suggestions
                    .rows_mut()
                    .update_where(|s| s.id == id, |s| s.responses.push(response));
                self.notice = Some(Notice::success(format!("Đã phản hồi kiến nghị #{id}")));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    // ── Reports and QR ──────────────────────────────────────────────

    async fn export(&mut self, path: &Path) {
        let csv = match self.shell.screen() {
            Screen::Members => to_csv(self.members.filtered()),
            Screen::Units => to_csv(self.units.filtered()),
            Screen::Reports => to_csv(self.overview.members.items()),
            _ => {
                self.notice = Some(Notice::info(
                    "Chỉ xuất được danh sách đoàn viên, chi đoàn hoặc báo cáo",
                ));
                return;
            }
        };
        match tokio::fs::write(path, csv).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "CSV exported");
                self.notice = Some(Notice::success(format!("Đã xuất {}", path.display())));
            }
            Err(e) => self.notice = Some(Notice::from(&ClientError::Io(e))),
        }
    }

    fn qr_new(&mut self, kind: &str, id: Id) {
        let Some(kind) = QrKind::from_code(kind) else {
            self.notice = Some(Notice::error(format!(
                "Loại mã QR không hợp lệ: {kind} (có: {})",
                choice_help::<QrKind>()
            )));
            return;
        };
        let payload = QrPayload::new(kind, id, Utc::now());
        tracing::info!(kind = kind.code(), id, "QR payload issued");
        self.last_qr = Some(payload);
        self.notice = Some(Notice::success(format!("Mã QR: {}", payload.encode())));
    }

    fn qr_check(&mut self, text: &str) {
        self.notice = Some(match QrPayload::decode(text) {
            Ok(p) => Notice::success(format!(
                "Hợp lệ: {} #{} (phát hành {})",
                p.kind.label(),
                p.id,
                p.issued_at.format("%d/%m/%Y %H:%M")
            )),
            Err(e) => Notice::error(format!("Mã QR không hợp lệ: {e}")),
        });
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_menu(&self) -> String {
        let items: Vec<String> = self
            .shell
            .menu()
            .iter()
            .map(|s| format!("{} {}", s.key(), s.label()))
            .collect();
        format!("{}\n", items.join(" · "))
    }

    fn render_modal(&self) -> Option<String> {
        fn section<T>(
            modal: &Modal<T>,
            title: &str,
            fields: &[&str],
            render: fn(&T) -> String,
        ) -> Option<String> {
            match modal {
                Modal::Closed => None,
                Modal::Viewing(item) => Some(format!("[{title}]\n{}", render(item))),
                Modal::Editing { draft, .. } => Some(format!(
                    "[Chỉnh sửa {title}] set <{}> <giá trị> · save · cancel\n{}",
                    fields.join("|"),
                    render(draft)
                )),
            }
        }
        match self.shell.screen() {
            Screen::Members => section(&self.member_modal, "đoàn viên", MEMBER_FIELDS, detail::member),
            Screen::Units => section(&self.unit_modal, "chi đoàn", UNIT_FIELDS, detail::unit),
            Screen::Posts => section(&self.post_modal, "bài viết", &[], detail::post),
            Screen::Suggestions => {
                section(&self.suggestion_modal, "kiến nghị", &[], detail::suggestion)
            }
            Screen::Surveys => section(&self.survey_modal, "khảo sát", SURVEY_FIELDS, detail::survey),
            _ => None,
        }
    }

    fn render_qr(&self) -> String {
        let mut out = format!("Loại: {}\n", choice_help::<QrKind>());
        match &self.last_qr {
            Some(p) => out.push_str(&format!(
                "Mã gần nhất: {}\n  {} #{}\n",
                p.encode(),
                p.kind.label(),
                p.id
            )),
            None => out.push_str("Chưa tạo mã nào. Gõ 'qr <loại> <id>'\n"),
        }
        out
    }

    /// The whole screen as text
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.shell.header());
        out.push_str(&self.render_menu());
        out.push('\n');
        let body = match self.shell.screen() {
            Screen::Dashboard => self.overview.render_dashboard(),
            Screen::Reports => self.overview.render_reports(),
            Screen::QrCodes => self.render_qr(),
            Screen::Profile => match &self.profile_modal {
                Modal::Editing { draft, .. } => format!(
                    "[Chỉnh sửa] set <trường> <giá trị> · save · cancel\n{}",
                    render_profile_form(draft)
                ),
                _ => self.shell.profile().map(render_profile).unwrap_or_default(),
            },
            Screen::ChangePassword => format!(
                "set current|new|confirm <giá trị>, rồi save\n{}",
                self.password.render()
            ),
            _ => self.list().map(|list| list.render()).unwrap_or_default(),
        };
        out.push_str(&body);
        if let Some(modal) = self.render_modal() {
            out.push('\n');
            out.push_str(&modal);
        }
        if let Some((_, id)) = self.pending_delete.pending() {
            out.push_str(&format!("\nXác nhận xóa #{id}? (y / cancel)\n"));
        }
        if let Some(notice) = &self.notice {
            out.push_str(&format!("\n{notice}\n"));
        }
        out
    }
}

