//! End-to-end harness for the Bloom storefront client.
//!
//! [`StubServer`] runs a small axum app on a loopback port that answers the
//! four backend endpoints the client uses, from a scripted [`Fixture`]:
//!
//! ```text
//! POST /api/users/login            - email + password login
//! POST /api/users/login/google     - Google access token exchange
//! GET  /api/products/search/{q}    - catalog search
//! GET  /api/orders                 - order list (bearer token, admin only)
//! ```
//!
//! Every request is recorded so tests can assert that a call was (or was
//! not) made.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bloom-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bloom_storefront::ApiClient;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

// =============================================================================
// Fixture
// =============================================================================

/// A backend user that can sign in with a password.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub role: String,
    pub token: String,
}

/// A Google access token the backend accepts, and the grant it yields.
#[derive(Debug, Clone)]
pub struct GoogleGrant {
    pub access_token: String,
    pub role: String,
    pub token: String,
}

/// Scripted backend data.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub accounts: Vec<Account>,
    pub google: Vec<GoogleGrant>,
    pub products: Vec<Value>,
    /// Answer searches as `{"products": [...]}` instead of a bare array.
    pub wrap_search: bool,
    /// Artificial latency per search query.
    pub search_delays: Vec<(String, Duration)>,
    /// Raw body of `GET /api/orders` for admin tokens.
    pub orders: Value,
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: json!([]),
            ..Self::default()
        }
    }

    /// A small store: one admin, one shopper, a Google admin grant, three
    /// products and two orders.
    #[must_use]
    pub fn storefront() -> Self {
        Self::new()
            .account("admin@bloom.lk", "orchid-42", "admin", "admin-token")
            .account("shopper@bloom.lk", "tulip-7", "user", "shopper-token")
            .google("google-ok", "admin", "google-admin-token")
            .product(json!({
                "_id": "65f0c1a2b3",
                "productId": "PRD001",
                "name": "Rose Water Toner",
                "altNames": ["rosewater"],
                "images": ["toner.jpg"],
                "price": 1250,
                "labelledPrice": 1500
            }))
            .product(json!({
                "productId": "PRD002",
                "name": "Rose Petal Soap",
                "images": [],
                "price": "450.00",
                "labelledPrice": 450
            }))
            .product(json!({
                "productId": "PRD003",
                "name": "Aloe Gel"
            }))
            .orders(json!([
                {
                    "orderId": "ORD0001",
                    "name": "Nimali Perera",
                    "email": "nimali@example.com",
                    "phone": "0771234567",
                    "address": "12 Temple Rd, Kandy",
                    "date": "2024-03-05T10:15:00.000Z",
                    "status": "pending",
                    "total": 2950,
                    "labelledTotal": 3450,
                    "products": [
                        {"productInfo": {"_id": "65f0c1a2b3", "productId": "PRD001", "name": "Rose Water Toner", "price": 1250, "images": ["toner.jpg"]}, "quantity": 2},
                        {"productInfo": {"productId": "PRD002", "name": "Rose Petal Soap", "price": 450}, "quantity": 1}
                    ]
                },
                {
                    "orderId": "ORD0002",
                    "name": "Kasun Silva",
                    "email": "kasun@example.com",
                    "status": "delivered",
                    "total": "800",
                    "date": "not a date"
                }
            ]))
    }

    #[must_use]
    pub fn account(mut self, email: &str, password: &str, role: &str, token: &str) -> Self {
        self.accounts.push(Account {
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
            token: token.to_string(),
        });
        self
    }

    #[must_use]
    pub fn google(mut self, access_token: &str, role: &str, token: &str) -> Self {
        self.google.push(GoogleGrant {
            access_token: access_token.to_string(),
            role: role.to_string(),
            token: token.to_string(),
        });
        self
    }

    #[must_use]
    pub fn product(mut self, product: Value) -> Self {
        self.products.push(product);
        self
    }

    #[must_use]
    pub fn orders(mut self, orders: Value) -> Self {
        self.orders = orders;
        self
    }

    #[must_use]
    pub fn search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.push((query.to_string(), delay));
        self
    }

    #[must_use]
    pub fn wrap_search(mut self) -> Self {
        self.wrap_search = true;
        self
    }

    fn is_admin_token(&self, token: &str) -> Option<bool> {
        self.accounts
            .iter()
            .map(|a| (a.token.as_str(), a.role.as_str()))
            .chain(self.google.iter().map(|g| (g.token.as_str(), g.role.as_str())))
            .find(|(t, _)| *t == token)
            .map(|(_, role)| role == "admin")
    }
}

// =============================================================================
// Server
// =============================================================================

struct Shared {
    fixture: Fixture,
    requests: Mutex<Vec<String>>,
}

impl Shared {
    fn record(&self, request: String) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

type AppState = Arc<Shared>;

/// A running stub backend. Stops when dropped.
pub struct StubServer {
    base_url: Url,
    shared: AppState,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Bind a loopback port and start serving `fixture`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the port cannot be bound.
    pub async fn start(fixture: Fixture) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            fixture,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/users/login", post(login))
            .route("/api/users/login/google", post(login_google))
            .route("/api/products/search/{query}", get(search))
            .route("/api/orders", get(orders))
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "stub backend stopped");
            }
        });

        Ok(Self {
            base_url,
            shared,
            task,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// An API client pointed at this server.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::with_client(self.base_url.clone(), reqwest::Client::new())
    }

    /// Requests received so far, as `METHOD /path`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.shared
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many requests started with `prefix`.
    #[must_use]
    pub fn hits(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }
}

/// A base URL on a loopback port nothing listens on.
///
/// # Errors
///
/// Returns an I/O error if a probe port cannot be bound.
pub async fn unreachable_url() -> std::io::Result<Url> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)
}

/// An API client whose every request fails to connect.
///
/// # Errors
///
/// Returns an I/O error if a probe port cannot be bound.
pub async fn unreachable_client() -> std::io::Result<ApiClient> {
    Ok(ApiClient::with_client(
        unreachable_url().await?,
        reqwest::Client::new(),
    ))
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

async fn login(State(shared): State<AppState>, Json(body): Json<Value>) -> Response {
    shared.record("POST /api/users/login".to_string());

    let email = field(&body, "email");
    let password = field(&body, "password");
    match shared
        .fixture
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
    {
        Some(account) => Json(json!({ "token": account.token, "role": account.role })).into_response(),
        None => reject(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn login_google(State(shared): State<AppState>, Json(body): Json<Value>) -> Response {
    shared.record("POST /api/users/login/google".to_string());

    let access_token = field(&body, "accessToken");
    match shared
        .fixture
        .google
        .iter()
        .find(|g| g.access_token == access_token)
    {
        Some(grant) => Json(json!({ "token": grant.token, "role": grant.role })).into_response(),
        None => reject(StatusCode::BAD_REQUEST, "Google authentication failed"),
    }
}

async fn search(State(shared): State<AppState>, Path(query): Path<String>) -> Response {
    shared.record(format!("GET /api/products/search/{query}"));

    let delay = shared
        .fixture
        .search_delays
        .iter()
        .find(|(q, _)| *q == query)
        .map(|(_, d)| *d);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let needle = query.to_lowercase();
    let matches: Vec<Value> = shared
        .fixture
        .products
        .iter()
        .filter(|p| field(p, "name").to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if shared.fixture.wrap_search {
        Json(json!({ "products": matches })).into_response()
    } else {
        Json(Value::Array(matches)).into_response()
    }
}

async fn orders(State(shared): State<AppState>, headers: HeaderMap) -> Response {
    shared.record("GET /api/orders".to_string());

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let Some(token) = token else {
        return reject(StatusCode::UNAUTHORIZED, "Not authorized, no token");
    };

    match shared.fixture.is_admin_token(token) {
        Some(true) => Json(shared.fixture.orders.clone()).into_response(),
        Some(false) => reject(StatusCode::FORBIDDEN, "Not authorized as an admin"),
        None => reject(StatusCode::UNAUTHORIZED, "Not authorized, token failed"),
    }
}
