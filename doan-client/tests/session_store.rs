// doan-client/tests/session_store.rs
// Session persistence and invalidation

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use doan_client::{ClientError, ClientResult, Session, SessionContext, SessionStore};
use shared::models::UserProfile;
use tempfile::TempDir;

fn token_expiring_at(exp: u64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
}

fn profile() -> UserProfile {
    serde_json::from_str(
        r#"{"id": 1, "username": "admin", "fullName": "Quản trị", "email": "admin@doan.vn", "role": "admin"}"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_session_store_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("nested"));
    assert!(store.load().unwrap().is_none());

    let session = Session::new(token_expiring_at(4_102_444_800), profile(), 1_700_000_000);
    store.save(&session).unwrap();
    assert!(store.exists());
    assert_eq!(store.load().unwrap(), Some(session));

    store.delete().unwrap();
    assert!(!store.exists());
    store.delete().unwrap();
}

#[tokio::test]
async fn test_restore_keeps_valid_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path());
    store
        .save(&Session::new(token_expiring_at(4_102_444_800), profile(), 0))
        .unwrap();

    let mut ctx = SessionContext::restore(store);
    assert!(ctx.is_signed_in());
    assert_eq!(ctx.profile().map(|p| p.username.as_str()), Some("admin"));
    assert!(ctx.require().is_ok());
}

#[tokio::test]
async fn test_restore_discards_expired_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path());
    store
        .save(&Session::new(token_expiring_at(1_000), profile(), 0))
        .unwrap();

    let ctx = SessionContext::restore(store.clone());
    assert!(!ctx.is_signed_in());
    assert!(!store.exists());
}

#[tokio::test]
async fn test_restore_discards_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path());
    std::fs::write(store.path(), "{not json").unwrap();

    let ctx = SessionContext::restore(store.clone());
    assert!(!ctx.is_signed_in());
    assert!(!store.exists());
}

#[tokio::test]
async fn test_unauthorized_response_invalidates() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path());
    let mut ctx = SessionContext::empty(store.clone());
    ctx.establish(Session::new("opaque".into(), profile(), 0))
        .unwrap();
    assert!(store.exists());

    let ok: ClientResult<()> = Ok(());
    assert!(!ctx.observe(&ok));
    let not_found: ClientResult<()> = Err(ClientError::NotFound("x".into()));
    assert!(!ctx.observe(&not_found));
    assert!(ctx.is_signed_in());

    let denied: ClientResult<()> = Err(ClientError::Unauthorized(String::new()));
    assert!(ctx.observe(&denied));
    assert!(!ctx.is_signed_in());
    assert!(!store.exists());
    assert!(matches!(ctx.require(), Err(ClientError::Session(_))));
}

#[tokio::test]
async fn test_refresh_profile_persists() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path());
    let mut ctx = SessionContext::empty(store.clone());
    assert!(ctx.refresh_profile(profile()).is_err());

    ctx.establish(Session::new("opaque".into(), profile(), 0))
        .unwrap();
    let mut updated = profile();
    updated.full_name = "Lê Văn Cường".into();
    ctx.refresh_profile(updated).unwrap();

    let reloaded = store.load().unwrap().unwrap();
    assert_eq!(reloaded.profile.full_name, "Lê Văn Cường");

    ctx.logout();
    assert!(store.load().unwrap().is_none());
}
