//! Login, persistence and logout against the stub backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bloom_core::Role;
use bloom_integration_tests::{Fixture, StubServer, unreachable_client};
use bloom_storefront::services::auth::{AuthError, StaticTokenProvider};
use bloom_storefront::{
    ApiClient, Authenticator, CredentialStore, FileCredentialStore, NoticeLevel, NoticeLog, Routes,
    Session,
};
use secrecy::SecretString;

fn authenticator(
    server: &StubServer,
    session: &Session,
    notices: &NoticeLog,
) -> Authenticator<ApiClient> {
    Authenticator::new(
        server.client(),
        session.clone(),
        Routes::default(),
        Arc::new(notices.clone()),
    )
}

// ============================================================================
// Password Login
// ============================================================================

#[tokio::test]
async fn test_admin_password_login_persists_token() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session-token");
    let session = Session::init(FileCredentialStore::new(&path));
    let notices = NoticeLog::new();

    let outcome = authenticator(&server, &session, &notices)
        .login_with_password("admin@bloom.lk", &SecretString::from("orchid-42"))
        .await
        .unwrap();

    assert_eq!(outcome.role, Role::Admin);
    assert_eq!(outcome.destination, "/admin");
    assert_eq!(session.role(), Role::Admin);
    assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "admin-token");

    let notices = notices.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(server.requests(), vec!["POST /api/users/login"]);
}

#[tokio::test]
async fn test_customer_login_lands_on_home() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    let outcome = authenticator(&server, &session, &notices)
        .login_with_password("shopper@bloom.lk", &SecretString::from("tulip-7"))
        .await
        .unwrap();

    assert_eq!(outcome.role, Role::Customer);
    assert_eq!(outcome.destination, "/");
    assert_eq!(session.token().unwrap().expose(), "shopper-token");
}

#[tokio::test]
async fn test_wrong_password_surfaces_server_message() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    let err = authenticator(&server, &session, &notices)
        .login_with_password("admin@bloom.lk", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials(_)));
    assert!(!session.is_authenticated());

    let notices = notices.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Invalid email or password");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = unreachable_client().await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();
    let auth = Authenticator::new(
        client,
        session.clone(),
        Routes::default(),
        Arc::new(notices.clone()),
    );

    let err = auth
        .login_with_password("admin@bloom.lk", &SecretString::from("orchid-42"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Network(_)));
    assert!(!session.is_authenticated());
    assert_eq!(notices.take().len(), 1);
}

// ============================================================================
// Google Login
// ============================================================================

#[tokio::test]
async fn test_google_login_exchanges_access_token() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    let outcome = authenticator(&server, &session, &notices)
        .login_with_provider(&StaticTokenProvider::new("google-ok"))
        .await
        .unwrap();

    assert_eq!(outcome.destination, "/admin");
    assert_eq!(session.token().unwrap().expose(), "google-admin-token");
    assert_eq!(server.requests(), vec!["POST /api/users/login/google"]);
}

#[tokio::test]
async fn test_rejected_google_token() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    let err = authenticator(&server, &session, &notices)
        .login_with_external_token(&SecretString::from("expired"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials(_)));
    let notices = notices.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Google authentication failed");
}

#[tokio::test]
async fn test_missing_provider_token_never_calls_backend() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    let err = authenticator(&server, &session, &notices)
        .login_with_provider(&StaticTokenProvider::from_option(None))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::ExternalProvider(_)));
    assert!(server.requests().is_empty());
    assert_eq!(notices.take().len(), 1);
}

// ============================================================================
// Persistence and Logout
// ============================================================================

#[tokio::test]
async fn test_session_restored_from_file_then_logged_out() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session-token");
    let notices = NoticeLog::new();

    let first = Session::init(FileCredentialStore::new(&path));
    authenticator(&server, &first, &notices)
        .login_with_password("admin@bloom.lk", &SecretString::from("orchid-42"))
        .await
        .unwrap();

    // A fresh process only knows the token, not the role it was granted.
    let restored = Session::init(FileCredentialStore::new(&path));
    assert!(restored.is_authenticated());
    assert_eq!(restored.token().unwrap().expose(), "admin-token");
    assert_eq!(restored.role(), Role::Customer);

    authenticator(&server, &restored, &notices).logout().unwrap();
    assert!(!restored.is_authenticated());
    assert_eq!(restored.role(), Role::Guest);
    assert!(FileCredentialStore::new(&path).read().is_none());
}
