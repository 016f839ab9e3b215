//! Authentication service.
//!
//! Provides password login and external (Google) token exchange. A successful
//! login persists the granted token through the [`Session`] and yields the
//! route the user should land on; a failed one leaves the session untouched.
//! Every attempt produces exactly one user-visible notice.

mod error;
mod provider;

pub use error::{AuthError, DEFAULT_INVALID_CREDENTIALS, ProviderError};
pub use provider::{ExternalTokenProvider, StaticTokenProvider};

use std::sync::Arc;

use bloom_core::Role;
use secrecy::SecretString;

use crate::api::{ApiError, AuthBackend, LoginGrant};
use crate::notify::{Notice, Notifier};
use crate::session::{Session, StoreError};

/// Post-login landing routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// Where administrators land
    pub admin: String,
    /// Where everyone else lands
    pub home: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            admin: "/admin".to_string(),
            home: "/".to_string(),
        }
    }
}

impl Routes {
    /// Landing route for `role`.
    #[must_use]
    pub fn destination_for(&self, role: Role) -> &str {
        if role.is_admin() {
            &self.admin
        } else {
            &self.home
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub destination: String,
}

#[derive(Debug, Clone, Copy)]
enum LoginMethod {
    Password,
    External,
}

impl LoginMethod {
    const fn success_message(self) -> &'static str {
        match self {
            Self::Password => "Login successful!",
            Self::External => "Login Successful",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            Self::Password => "Something went wrong. Please try again.",
            Self::External => "Google login failed. Please try again.",
        }
    }
}

/// Authentication service.
///
/// The only component that writes to the [`Session`].
pub struct Authenticator<B> {
    backend: B,
    session: Session,
    routes: Routes,
    notifier: Arc<dyn Notifier>,
}

impl<B: AuthBackend> Authenticator<B> {
    /// Create a new authenticator.
    #[must_use]
    pub fn new(backend: B, session: Session, routes: Routes, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            session,
            routes,
            notifier,
        }
    }

    /// The session this authenticator writes to.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Log in with an email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the
    /// credentials, `AuthError::Network` if it gives no usable answer, and
    /// `AuthError::Store` if the granted token cannot be saved.
    #[tracing::instrument(skip(self, password))]
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, AuthError> {
        let result = match self.backend.login_with_password(email, password).await {
            Ok(grant) => self.complete(grant),
            Err(e) => Err(AuthError::from_api(e)),
        };
        self.report(LoginMethod::Password, &result);
        result
    }

    // =========================================================================
    // External Authentication
    // =========================================================================

    /// Exchange an external access token that has already been obtained.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login_with_password`].
    #[tracing::instrument(skip_all)]
    pub async fn login_with_external_token(
        &self,
        access_token: &SecretString,
    ) -> Result<LoginOutcome, AuthError> {
        let result = self.exchange_external(access_token).await;
        self.report(LoginMethod::External, &result);
        result
    }

    /// Run the provider's sign-in, then exchange the token it yields.
    ///
    /// If the provider fails, the backend is never called.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ExternalProvider` if the provider fails; otherwise
    /// the same as [`Self::login_with_password`].
    #[tracing::instrument(skip_all)]
    pub async fn login_with_provider<P: ExternalTokenProvider>(
        &self,
        provider: &P,
    ) -> Result<LoginOutcome, AuthError> {
        let result = match provider.access_token().await {
            Ok(access_token) => self.exchange_external(&access_token).await,
            Err(e) => Err(AuthError::ExternalProvider(e)),
        };
        self.report(LoginMethod::External, &result);
        result
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// End the session and forget the persisted token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted token could not be removed. The
    /// in-memory session is reset regardless.
    pub fn logout(&self) -> Result<(), StoreError> {
        let result = self.session.end();
        tracing::info!("logged out");
        result
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn exchange_external(
        &self,
        access_token: &SecretString,
    ) -> Result<LoginOutcome, AuthError> {
        match self.backend.login_with_external_token(access_token).await {
            Ok(grant) => self.complete(grant),
            Err(e) => Err(AuthError::from_api(e)),
        }
    }

    /// Persist a grant and pick the landing route.
    fn complete(&self, grant: LoginGrant) -> Result<LoginOutcome, AuthError> {
        if grant.token.expose().trim().is_empty() {
            return Err(AuthError::Network(ApiError::Parse(
                "login response carried an empty token".to_string(),
            )));
        }

        let role = grant.role();
        self.session.establish(grant.token, role)?;
        tracing::info!(%role, "login succeeded");

        Ok(LoginOutcome {
            role,
            destination: self.routes.destination_for(role).to_string(),
        })
    }

    /// Emit the single notice for an attempt.
    fn report(&self, method: LoginMethod, result: &Result<LoginOutcome, AuthError>) {
        let notice = match result {
            Ok(_) => Notice::success(method.success_message()),
            Err(e) => {
                tracing::warn!(error = %e, ?method, "login failed");
                Notice::error(e.server_message().unwrap_or(method.failure_message()))
            }
        };
        self.notifier.notify(notice);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bloom_core::SessionToken;

    use super::*;
    use crate::notify::{NoticeLevel, NoticeLog};
    use crate::session::{CredentialStore, MemoryCredentialStore};

    /// Scripted backend answer.
    #[derive(Clone, Copy)]
    enum Reply {
        Grant(&'static str, &'static str),
        Reject(u16, Option<&'static str>),
    }

    struct FakeAuth {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeAuth {
        const fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        fn answer(&self) -> Result<LoginGrant, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Grant(token, role) => Ok(LoginGrant {
                    token: SessionToken::new(token),
                    role: role.to_string(),
                }),
                Reply::Reject(status, message) => {
                    let message = message.map(ToOwned::to_owned);
                    if status == 401 || status == 403 {
                        Err(ApiError::Unauthorized { status, message })
                    } else {
                        Err(ApiError::Api { status, message })
                    }
                }
            }
        }
    }

    impl AuthBackend for FakeAuth {
        async fn login_with_password(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<LoginGrant, ApiError> {
            self.answer()
        }

        async fn login_with_external_token(
            &self,
            _access_token: &SecretString,
        ) -> Result<LoginGrant, ApiError> {
            self.answer()
        }
    }

    struct CancelledProvider;

    impl ExternalTokenProvider for CancelledProvider {
        async fn access_token(&self) -> Result<SecretString, ProviderError> {
            Err(ProviderError::Cancelled)
        }
    }

    struct Harness {
        auth: Authenticator<FakeAuth>,
        store: MemoryCredentialStore,
        log: NoticeLog,
    }

    fn harness(reply: Reply) -> Harness {
        let store = MemoryCredentialStore::new();
        let log = NoticeLog::new();
        let auth = Authenticator::new(
            FakeAuth::new(reply),
            Session::init(store.clone()),
            Routes::default(),
            Arc::new(log.clone()),
        );
        Harness { auth, store, log }
    }

    fn password() -> SecretString {
        SecretString::from("wrong".to_string())
    }

    #[tokio::test]
    async fn test_admin_login_lands_on_admin_route() {
        let h = harness(Reply::Grant("T1", "admin"));

        let outcome = h
            .auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap();

        assert_eq!(outcome.role, Role::Admin);
        assert_eq!(outcome.destination, "/admin");
        assert_eq!(h.store.read().unwrap().expose(), "T1");
        assert_eq!(h.auth.session().role(), Role::Admin);
        assert_eq!(h.log.take(), vec![Notice::success("Login successful!")]);
    }

    #[tokio::test]
    async fn test_customer_login_lands_on_home_route() {
        let h = harness(Reply::Grant("T2", "customer"));

        let outcome = h
            .auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap();

        assert_eq!(outcome.role, Role::Customer);
        assert_eq!(outcome.destination, "/");
    }

    #[tokio::test]
    async fn test_rejected_password_leaves_store_untouched() {
        let h = harness(Reply::Reject(401, Some("Invalid password")));

        let err = h
            .auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials(Some(ref m)) if m == "Invalid password"));
        assert!(h.store.read().is_none());
        assert_eq!(h.auth.session().role(), Role::Guest);
        assert_eq!(h.log.take(), vec![Notice::error("Invalid password")]);
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_generic_notice() {
        let h = harness(Reply::Reject(404, None));

        let err = h
            .auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials(None)));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(
            h.log.take(),
            vec![Notice::error("Something went wrong. Please try again.")]
        );
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let h = harness(Reply::Reject(500, None));

        let err = h
            .auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Network(_)));
        assert!(h.store.read().is_none());
        assert_eq!(h.log.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_token_is_malformed() {
        let h = harness(Reply::Grant("", "admin"));

        let err = h
            .auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Network(ApiError::Parse(_))));
        assert!(!h.auth.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_external_token_exchange() {
        let h = harness(Reply::Grant("G1", "customer"));

        let outcome = h
            .auth
            .login_with_provider(&StaticTokenProvider::new("ya29.token"))
            .await
            .unwrap();

        assert_eq!(outcome.destination, "/");
        assert_eq!(h.store.read().unwrap().expose(), "G1");
        assert_eq!(h.log.take(), vec![Notice::success("Login Successful")]);
    }

    #[tokio::test]
    async fn test_provider_failure_skips_exchange() {
        let h = harness(Reply::Grant("G1", "admin"));

        let err = h
            .auth
            .login_with_provider(&CancelledProvider)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::ExternalProvider(ProviderError::Cancelled)
        ));
        assert_eq!(h.auth.backend.calls.load(Ordering::SeqCst), 0);
        assert!(h.store.read().is_none());

        let notices = h.log.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Google login failed. Please try again.");
    }

    #[tokio::test]
    async fn test_external_rejection_reports_server_message() {
        let h = harness(Reply::Reject(400, Some("Google account not verified")));

        let err = h
            .auth
            .login_with_external_token(&SecretString::from("ya29".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(
            h.log.take(),
            vec![Notice::error("Google account not verified")]
        );
    }

    #[tokio::test]
    async fn test_unsaveable_token_fails_login() {
        struct FullDisk;

        impl CredentialStore for FullDisk {
            fn save(&self, _token: &SessionToken) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("disk full".to_string()))
            }

            fn read(&self) -> Option<SessionToken> {
                None
            }

            fn clear(&self) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let log = NoticeLog::new();
        let auth = Authenticator::new(
            FakeAuth::new(Reply::Grant("T1", "admin")),
            Session::init(FullDisk),
            Routes::default(),
            Arc::new(log.clone()),
        );

        let err = auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Store(_)));
        assert!(!auth.session().is_authenticated());
        assert_eq!(
            log.take(),
            vec![Notice::error("Something went wrong. Please try again.")]
        );
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let h = harness(Reply::Grant("T1", "admin"));
        h.auth
            .login_with_password("a@b.com", &password())
            .await
            .unwrap();

        h.auth.logout().unwrap();

        assert!(h.store.read().is_none());
        assert_eq!(h.auth.session().role(), Role::Guest);
    }

    #[test]
    fn test_routes_destination() {
        let routes = Routes {
            admin: "/dashboard".to_string(),
            home: "/shop".to_string(),
        };
        assert_eq!(routes.destination_for(Role::Admin), "/dashboard");
        assert_eq!(routes.destination_for(Role::Customer), "/shop");
        assert_eq!(routes.destination_for(Role::Guest), "/shop");
    }
}
