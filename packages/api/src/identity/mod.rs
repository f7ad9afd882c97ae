//! # Identity service port
//!
//! Account creation and authentication are delegated to a hosted identity service.
//! [`IdentityService`] is the seam the server functions talk to; two adapters
//! implement it:
//!
//! | Adapter | Gate | Purpose |
//! |---------|------|---------|
//! | [`AppwriteClient`] | `server` | REST calls against an Appwrite project |
//! | [`MemoryIdentity`] | native targets | In-process accounts for tests and local development |
//!
//! [`get_backend`] picks one of them once per process, based on [`AppwriteConfig`].

mod appwrite;
mod config;
#[cfg(not(target_arch = "wasm32"))]
mod memory;
#[cfg(feature = "server")]
mod backend;

pub use appwrite::AppwriteErrorBody;
#[cfg(feature = "server")]
pub use appwrite::AppwriteClient;
#[cfg(feature = "server")]
pub use backend::{get_backend, Backend};
pub use config::AppwriteConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use memory::MemoryIdentity;

use crate::forms::{SignUpParams, ValidationErrors};
use crate::models::{Session, UserInfo};

/// Errors reported by an identity service or by the flows built on top of it.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    AccountExists,
    #[error("Session is missing or has expired")]
    Unauthorized,
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("Identity service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("Could not reach identity service: {0}")]
    Transport(String),
    #[error("Identity service is not configured: {0}")]
    Config(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[cfg(feature = "server")]
impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        IdentityError::Transport(e.to_string())
    }
}

/// Operations the application needs from the identity service.
///
/// Session-scoped calls take the session `secret` returned by
/// [`IdentityService::create_session`].
pub trait IdentityService {
    /// Create an account. Does not open a session.
    fn create_account(
        &self,
        params: &SignUpParams,
    ) -> impl std::future::Future<Output = Result<UserInfo, IdentityError>>;

    /// Open an email/password session.
    fn create_session(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Session, IdentityError>>;

    /// Look up the account owning a session.
    fn current_user(
        &self,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<UserInfo, IdentityError>>;

    /// Close a session.
    fn delete_session(
        &self,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<(), IdentityError>>;
}
