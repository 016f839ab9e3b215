//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! bloom login password -e admin@bloom.lk -p '...'
//! BLOOM_GOOGLE_ACCESS_TOKEN=ya29... bloom login google
//! bloom whoami
//! bloom logout
//! ```

use bloom_core::Email;
use bloom_storefront::Authenticator;
use bloom_storefront::services::auth::StaticTokenProvider;
use secrecy::SecretString;

use super::output::flush_notices;
use super::{CommandError, Context};

fn authenticator(ctx: &Context) -> Authenticator<bloom_storefront::ApiClient> {
    Authenticator::new(
        ctx.api.clone(),
        ctx.session.clone(),
        ctx.config.routes.clone(),
        ctx.notifier(),
    )
}

/// Sign in with email and password.
pub async fn login_with_password(
    ctx: &Context,
    email: &Email,
    password: String,
) -> Result<(), CommandError> {
    let password = SecretString::from(password);
    let result = authenticator(ctx)
        .login_with_password(email.as_str(), &password)
        .await;
    flush_notices(&ctx.notices);

    let outcome = result?;
    tracing::info!(role = %outcome.role, destination = %outcome.destination, "signed in");
    Ok(())
}

/// Sign in with a Google access token.
pub async fn login_with_google(
    ctx: &Context,
    access_token: Option<String>,
) -> Result<(), CommandError> {
    let provider = StaticTokenProvider::from_option(access_token);
    let result = authenticator(ctx).login_with_provider(&provider).await;
    flush_notices(&ctx.notices);

    let outcome = result?;
    tracing::info!(role = %outcome.role, destination = %outcome.destination, "signed in");
    Ok(())
}

/// Forget the stored session.
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    authenticator(ctx).logout()?;
    Ok(())
}

/// Report the current session.
pub fn whoami(ctx: &Context) {
    if ctx.session.is_authenticated() {
        tracing::info!(
            role = %ctx.session.role(),
            backend = %ctx.config.backend_url,
            "signed in"
        );
    } else {
        tracing::info!(backend = %ctx.config.backend_url, "not signed in");
    }
}
