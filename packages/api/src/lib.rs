//! # API crate — shared fullstack server functions for Na Moni
//!
//! Defines every Dioxus server function the web frontend calls, together with the
//! types and validation rules both sides share.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Sign-up / sign-in / session flows over an [`IdentityService`](identity::IdentityService), password hashing for the in-memory backend |
//! | [`forms`] | — | Form modes, field specs and the mode-dependent validation schema |
//! | [`identity`] | partly `server` | Identity-service port, Appwrite adapter, in-memory adapter, backend selection |
//! | [`models`] | — | `UserInfo` and `Session` |
//!
//! ## Server functions exposed here
//!
//! Every public `async fn` in this file is a Dioxus server function, annotated with
//! `#[get(...)]` or `#[post(...)]` and compiled twice: once with full server logic
//! (behind `#[cfg(feature = "server")]`) and once as a thin client stub.
//!
//! - `get_logged_in_user`, `sign_up`, `sign_in`, `logout`
//!
//! The identity-service session secret is kept in the server session under
//! [`auth::SESSION_SECRET_KEY`] and never sent to the browser.

use dioxus::prelude::*;

pub mod auth;
pub mod forms;
pub mod identity;
pub mod models;

pub use forms::{AuthFormValues, Field, FieldSpec, FormMode, ValidationErrors};
pub use models::UserInfo;

/// Hand the browser session a new identity-service secret.
///
/// Any secret it held before is closed (best effort) and the session id is cycled,
/// so a new login never reuses an id or leaves the old identity session open.
#[cfg(feature = "server")]
async fn store_secret(
    session: &tower_sessions::Session,
    backend: &identity::Backend,
    secret: String,
) -> Result<(), ServerFnError> {
    let previous: Option<String> = session
        .get(auth::SESSION_SECRET_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    if let Err(e) = auth::replace_session(backend, previous.as_deref(), &secret).await {
        tracing::warn!(error = %e, "failed to close previous identity session");
    }

    session
        .cycle_id()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    session
        .insert(auth::SESSION_SECRET_KEY, secret)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    Ok(())
}

/// Get the user for the current session, if any.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_logged_in_user() -> Result<Option<UserInfo>, ServerFnError> {
    let secret: Option<String> = session
        .get(auth::SESSION_SECRET_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let backend = identity::get_backend()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user = auth::resolve_user(backend, secret.as_deref())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    if user.is_none() && secret.is_some() {
        // The identity service dropped the session; forget the stale secret.
        session
            .remove::<String>(auth::SESSION_SECRET_KEY)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    }

    Ok(user)
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_logged_in_user() -> Result<Option<UserInfo>, ServerFnError> {
    Ok(None)
}

/// Create an account from the sign-up form and log it in.
#[cfg(feature = "server")]
#[post("/api/auth/sign-up", session: tower_sessions::Session)]
pub async fn sign_up(values: AuthFormValues) -> Result<UserInfo, ServerFnError> {
    let backend = identity::get_backend()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let (user, identity_session) = auth::register(backend, &values).await.map_err(|e| {
        tracing::warn!(error = %e, "sign-up failed");
        ServerFnError::new(e.to_string())
    })?;

    store_secret(&session, backend, identity_session.secret).await?;

    tracing::info!(user_id = %user.id, "account created");
    Ok(user)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/sign-up")]
pub async fn sign_up(values: AuthFormValues) -> Result<UserInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log in with email and password.
#[cfg(feature = "server")]
#[post("/api/auth/sign-in", session: tower_sessions::Session)]
pub async fn sign_in(email: String, password: String) -> Result<UserInfo, ServerFnError> {
    let backend = identity::get_backend()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let (user, identity_session) = auth::authenticate(backend, &email, &password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "sign-in failed");
            ServerFnError::new(e.to_string())
        })?;

    store_secret(&session, backend, identity_session.secret).await?;

    tracing::info!(user_id = %user.id, "signed in");
    Ok(user)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/sign-in")]
pub async fn sign_in(email: String, password: String) -> Result<UserInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out: close the identity-service session and clear the local one.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    let secret: Option<String> = session
        .get(auth::SESSION_SECRET_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    if let Some(secret) = secret {
        let backend = identity::get_backend()
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
        if let Err(e) = auth::end_session(backend, &secret).await {
            tracing::warn!(error = %e, "failed to close identity session");
        }
    }

    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}
