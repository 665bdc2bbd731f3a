// doan-client/tests/api_integration.rs
// API client against an in-process mock backend

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post, put},
};
use doan_client::{ApiClient, ClientConfig, ClientError, RemoteCollection, Resolution};
use serde_json::{Value, json};
use shared::listing::{Choice, ListFilter, MemberFilter};
use shared::models::{PostStatus, Rank, Role, SuggestionStatus};
use shared::request::ListQuery;

/// JWT whose payload is `{"exp":4102444800}`
const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjQxMDI0NDQ4MDB9.sig";

type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TOKEN}");
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "error": "Token không hợp lệ"})),
    )
}

async fn login(Json(body): Json<Value>) -> Reply {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let role = match (username, password) {
        ("admin", "secret1") => "admin",
        ("doanvien", "secret1") => "member",
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "error": "Sai tên đăng nhập hoặc mật khẩu"})),
            );
        }
    };
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "token": TOKEN,
                "user": {"id": 1, "username": username, "fullName": "Quản trị", "email": "admin@doan.vn", "role": role}
            }
        })),
    )
}

async fn list_users(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let all = vec![
        json!({"id": 1, "fullName": "Nguyễn Văn An", "email": "an@doan.vn", "rank": "XUAT_SAC", "points": 95}),
        json!({"id": 2, "fullName": "Trần Thị Bình", "email": "binh@doan.vn", "rank": "KHA", "points": 78}),
    ];
    let users: Vec<Value> = all
        .into_iter()
        .filter(|u| params.get("rank").is_none_or(|r| u["rank"] == r.as_str()))
        .collect();
    let total = users.len();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "users": users,
                "pagination": {"page": 1, "limit": 10, "total": total, "totalPages": 1}
            }
        })),
    )
}

async fn update_user(headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    // Only the changed fields are sent
    assert_eq!(body, json!({"points": 99}), "update payload for {id}");
    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "Cập nhật thành công"})),
    )
}

async fn list_units() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Chi đoàn 12A1", "leaderName": "Phạm Minh Đức", "averagePoints": 81.5},
        {"id": 2, "name": "Chi đoàn 12A2", "leader": "Hoàng Anh", "avgPoints": 77.0}
    ]))
}

async fn list_posts() -> Json<Value> {
    Json(json!({
        "code": 0,
        "message": "OK",
        "data": [{"id": 7, "title": "Ra quân Mùa hè xanh", "author": "BCH", "status": "pending", "type": "news"}]
    }))
}

async fn update_post(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {"id": id, "title": "Ra quân Mùa hè xanh", "author": "BCH", "status": body["status"], "type": "news"}
    }))
}

async fn change_password(Json(body): Json<Value>) -> Reply {
    if body["currentPassword"] != "secret1" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Mật khẩu hiện tại không đúng"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn suggestion_stats() -> Json<Value> {
    Json(json!({"success": true, "data": {"total": 5, "submitted": 2, "underReview": 1, "resolved": 2}}))
}

async fn update_suggestion_status(Path(_id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"success": true, "data": {"status": body["status"]}}))
}

async fn list_surveys() -> Reply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Lỗi cơ sở dữ liệu"})),
    )
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/users", get(list_users))
        .route("/api/users/change-password", put(change_password))
        .route("/api/users/{id}", put(update_user))
        .route("/api/units", get(list_units))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{id}", put(update_post))
        .route("/api/suggestions/stats", get(suggestion_stats))
        .route("/api/suggestions/{id}/status", put(update_suggestion_status))
        .route("/api/surveys", get(list_surveys));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn signed_in_client() -> ApiClient {
    let base = spawn_backend().await;
    let mut api = ApiClient::from_config(&ClientConfig::new(base).with_timeout(5)).unwrap();
    api.login("admin", "secret1").await.unwrap();
    api
}

#[tokio::test]
async fn test_login_sets_token() {
    let base = spawn_backend().await;
    let mut api = ApiClient::from_config(&ClientConfig::new(base)).unwrap();
    let resp = api.login(" admin ", "secret1").await.unwrap();
    assert_eq!(resp.user.role, Role::Admin);
    assert_eq!(api.token(), Some(TOKEN));
    api.logout();
    assert!(api.token().is_none());
}

#[tokio::test]
async fn test_login_failures() {
    let base = spawn_backend().await;
    let mut api = ApiClient::from_config(&ClientConfig::new(base)).unwrap();

    let err = api.login("admin", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Sai tên đăng nhập hoặc mật khẩu");

    let err = api.login("doanvien", "secret1").await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(api.token().is_none());

    let err = api.login("", "").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let base = spawn_backend().await;
    let api = ApiClient::from_config(&ClientConfig::new(base)).unwrap();
    let err = api.list_members(&ListQuery::new()).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_member_list_passes_filters() {
    let api = signed_in_client().await;
    let filter = MemberFilter {
        rank: Choice::Only(Rank::Excellent),
        ..Default::default()
    };
    let page = api.list_members(&filter.to_query(1, 10)).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Nguyễn Văn An");
    assert_eq!(page.total(), 1);
}

#[tokio::test]
async fn test_update_member_sends_diff_and_falls_back_to_draft() {
    let api = signed_in_client().await;
    let page = api.list_members(&ListQuery::new()).await.unwrap();
    let before = page.items[0].clone();
    let mut after = before.clone();
    after.points = 99;
    let saved = api.update_member(&before, &after).await.unwrap();
    assert_eq!(saved.points, 99);

    after.email = "not-an-email".into();
    let err = api.update_member(&before, &after).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_envelope_shapes_across_endpoints() {
    let api = signed_in_client().await;

    let units = api.list_units(&ListQuery::new()).await.unwrap();
    assert_eq!(units.items.len(), 2);
    assert_eq!(units.items[1].leader_name, "Hoàng Anh");
    assert!(units.pagination.is_none());

    let posts = api.list_posts(&ListQuery::new()).await.unwrap();
    assert_eq!(posts.items[0].status, PostStatus::Pending);

    let stats = api.suggestion_stats().await.unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.under_review, 1);
}

#[tokio::test]
async fn test_moderation_and_review_transitions() {
    let api = signed_in_client().await;
    let posts = api.list_posts(&ListQuery::new()).await.unwrap();
    let approved = api
        .moderate_post(&posts.items[0], PostStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, PostStatus::Approved);

    let err = api
        .moderate_post(&approved, PostStatus::Draft)
        .await
        .unwrap_err();
    assert_eq!(err.code(), shared::ErrorCode::PostInvalidTransition);

    let suggestion: shared::models::Suggestion =
        serde_json::from_value(json!({"id": 3, "title": "Góp ý", "status": "submitted"})).unwrap();
    let status = api
        .update_suggestion_status(&suggestion, SuggestionStatus::UnderReview, None)
        .await
        .unwrap();
    assert_eq!(status, SuggestionStatus::UnderReview);
}

#[tokio::test]
async fn test_change_password_surfaces_server_message() {
    let api = signed_in_client().await;
    let err = api
        .change_password("wrong", "newpass1", "newpass1")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Mật khẩu hiện tại không đúng");

    api.change_password("secret1", "newpass1", "newpass1")
        .await
        .unwrap();

    let err = api.change_password("secret1", "short", "short").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_not_wired_operations() {
    let api = signed_in_client().await;
    assert!(matches!(
        api.delete_member(1).await,
        Err(ClientError::NotWired(ref op)) if op == "members.delete"
    ));
    assert!(matches!(api.delete_unit(1).await, Err(ClientError::NotWired(_))));
    assert!(matches!(api.delete_post(1).await, Err(ClientError::NotWired(_))));
}

#[tokio::test]
async fn test_server_error_keeps_previous_rows() {
    let api = signed_in_client().await;
    let mut surveys = RemoteCollection::new();

    let outcome = surveys
        .fetch_with(ListQuery::new(), |q| {
            let api = api.clone();
            async move { api.list_surveys(&q).await }
        })
        .await;
    assert_eq!(outcome, Resolution::Applied);
    assert!(surveys.items().is_empty());
    assert_eq!(surveys.error(), Some("Lỗi cơ sở dữ liệu"));
}

#[tokio::test]
async fn test_out_of_order_responses_resolve_by_sequence() {
    let api = signed_in_client().await;
    let mut members = RemoteCollection::new();
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);

    let first = members.begin(ListQuery::new());
    let second = members.begin(
        MemberFilter {
            rank: Choice::Only(Rank::Good),
            ..Default::default()
        }
        .to_query(1, 10),
    );

    // Deliver the newer response first
    for ticket in [second, first] {
        let api = api.clone();
        let tx = tx.clone();
        let result = api.list_members(ticket.query()).await;
        tx.send((ticket, result)).await.unwrap();
    }
    drop(tx);

    let mut outcomes = Vec::new();
    while let Some((ticket, result)) = rx.recv().await {
        outcomes.push(members.resolve(ticket, result));
    }
    assert_eq!(outcomes, vec![Resolution::Applied, Resolution::Stale]);
    assert_eq!(members.items().len(), 1);
    assert_eq!(members.items()[0].name, "Trần Thị Bình");
}
