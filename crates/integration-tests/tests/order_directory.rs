//! Order listing and detail views against the stub backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bloom_admin::{DirectoryError, DisplayFormat, FailureKind, LoadStatus, OrderDirectory};
use bloom_admin::orders::StatusCategory;
use bloom_core::{OrderId, SessionToken};
use bloom_integration_tests::{Fixture, StubServer};
use bloom_storefront::{
    ApiClient, Authenticator, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    NoticeLog, Routes, Session,
};
use secrecy::SecretString;
use serde_json::json;

fn session_with(token: &str) -> Session {
    Session::init(MemoryCredentialStore::with_token(SessionToken::new(token)))
}

fn directory(server: &StubServer, session: &Session, notices: &NoticeLog) -> OrderDirectory<ApiClient> {
    OrderDirectory::new(
        server.client(),
        session.clone(),
        Arc::new(notices.clone()),
        DisplayFormat::default(),
    )
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_admin_login_then_list_orders() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    Authenticator::new(
        server.client(),
        session.clone(),
        Routes::default(),
        Arc::new(notices.clone()),
    )
    .login_with_password("admin@bloom.lk", &SecretString::from("orchid-42"))
    .await
    .unwrap();
    let _ = notices.take();

    let mut orders = directory(&server, &session, &notices);
    let count = orders.list_orders().await.unwrap().len();

    assert_eq!(count, 2);
    assert_eq!(orders.status(), LoadStatus::Loaded);
    assert!(notices.take().is_empty());

    let rows = orders.rows();
    assert_eq!(rows[0].order_id, "ORD0001");
    assert_eq!(rows[0].total, "2950.00");
    assert_eq!(rows[0].date, "05/03/2024");
    assert_eq!(rows[0].status.label, "PENDING");
    assert_eq!(rows[1].total, "800.00");
    assert_eq!(rows[1].date, "Invalid Date");
    assert_eq!(rows[1].status.category, StatusCategory::Neutral);
}

#[tokio::test]
async fn test_no_session_never_calls_backend() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = Session::in_memory();
    let notices = NoticeLog::new();

    let mut orders = directory(&server, &session, &notices);
    let err = orders.list_orders().await.unwrap_err();

    assert!(matches!(err, DirectoryError::Unauthenticated));
    assert!(server.requests().is_empty());
    assert_eq!(orders.status(), LoadStatus::Failed(FailureKind::Unauthenticated));

    let notices = notices.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "You must be logged in to view orders");
}

#[tokio::test]
async fn test_customer_token_is_rejected() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = session_with("shopper-token");
    let notices = NoticeLog::new();

    let mut orders = directory(&server, &session, &notices);
    let err = orders.list_orders().await.unwrap_err();

    assert!(matches!(err, DirectoryError::AuthorizationExpired(_)));
    assert!(err.kind().requires_login());
    assert!(orders.orders().is_empty());
    assert_eq!(
        notices.take()[0].message,
        "Your session has expired. Please log in again."
    );
}

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = session_with("forged");
    let notices = NoticeLog::new();

    let err = directory(&server, &session, &notices)
        .list_orders()
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::AuthorizationExpired(_)));
    assert_eq!(server.hits("GET /api/orders"), 1);
}

#[tokio::test]
async fn test_rejected_token_ends_persisted_session() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session-token");
    FileCredentialStore::new(&path)
        .save(&SessionToken::new("stale-token"))
        .unwrap();
    let session = Session::init(FileCredentialStore::new(&path));
    let notices = NoticeLog::new();

    let err = directory(&server, &session, &notices)
        .list_orders()
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::AuthorizationExpired(_)));
    assert!(!session.is_authenticated());
    assert!(!path.exists());
    assert!(!Session::init(FileCredentialStore::new(&path)).is_authenticated());
}

#[tokio::test]
async fn test_non_array_body_is_malformed() {
    let fixture = Fixture::storefront().orders(json!({"orders": []}));
    let server = StubServer::start(fixture).await.unwrap();
    let session = session_with("admin-token");
    let notices = NoticeLog::new();

    let mut orders = directory(&server, &session, &notices);
    let err = orders.list_orders().await.unwrap_err();

    assert!(matches!(err, DirectoryError::MalformedResponse(_)));
    assert_eq!(orders.status(), LoadStatus::Failed(FailureKind::MalformedResponse));
    assert_eq!(notices.take()[0].message, "Failed to load orders");
}

#[tokio::test]
async fn test_malformed_entries_are_skipped() {
    let fixture = Fixture::storefront().orders(json!([
        {"orderId": "ORD0009", "total": 100, "status": "shipped"},
        "not an order",
        42
    ]));
    let server = StubServer::start(fixture).await.unwrap();
    let session = session_with("admin-token");
    let notices = NoticeLog::new();

    let mut orders = directory(&server, &session, &notices);
    let held = orders.list_orders().await.unwrap();

    assert_eq!(held.len(), 1);
    assert_eq!(held[0].order_id.as_str(), "ORD0009");
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_order_detail_view() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = session_with("google-admin-token");
    let notices = NoticeLog::new();

    let mut orders = directory(&server, &session, &notices);
    orders.list_orders().await.unwrap();

    assert!(orders.select_by_id(&OrderId::new("ORD0001")));
    let view = orders.active_detail().unwrap();

    assert_eq!(view.name, "Nimali Perera");
    assert_eq!(view.total, "LKR 2,950.00");
    assert_eq!(view.labelled_total.as_deref(), Some("LKR 3,450.00"));
    assert_eq!(view.emphasis, StatusCategory::Warning);

    let lines = view.products.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, "PRD001");
    assert_eq!(lines[0].name, "Rose Water Toner");
    assert_eq!(lines[0].image.as_deref(), Some("toner.jpg"));
    assert_eq!(lines[0].subtotal, "LKR 2,500.00");
    assert_eq!(lines[1].image, None);
    assert_eq!(view.lines_total, "LKR 2,950.00");

    orders.clear_selection();
    assert!(orders.active_detail().is_none());
}

#[tokio::test]
async fn test_order_without_products_has_no_product_section() {
    let server = StubServer::start(Fixture::storefront()).await.unwrap();
    let session = session_with("admin-token");
    let notices = NoticeLog::new();

    let mut orders = directory(&server, &session, &notices);
    orders.list_orders().await.unwrap();

    assert!(!orders.select_by_id(&OrderId::new("ORD9999")));
    assert!(orders.active().is_none());

    assert!(orders.select_by_id(&OrderId::new("ORD0002")));
    let view = orders.active_detail().unwrap();
    assert!(view.products.is_none());
    assert_eq!(view.status.label, "DELIVERED");
    assert_eq!(view.emphasis, StatusCategory::Danger);
}
