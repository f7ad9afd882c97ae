//! Sign-up, sign-in and session lookup, independent of the transport.
//!
//! The server functions in the crate root wrap these with session-cookie handling;
//! keeping the flows generic over [`IdentityService`] lets them run against
//! [`MemoryIdentity`](crate::identity::MemoryIdentity) in tests.

use crate::forms::{normalize_email, validate_sign_up, AuthFormValues};
use crate::identity::{IdentityError, IdentityService};
use crate::models::{Session, UserInfo};

/// Create an account from sign-up form values and open a session for it.
///
/// The values are validated with the sign-up schema first; nothing reaches the
/// identity service if they fail.
pub async fn register<S: IdentityService>(
    identity: &S,
    values: &AuthFormValues,
) -> Result<(UserInfo, Session), IdentityError> {
    let params = validate_sign_up(values)?;
    let user = identity.create_account(&params).await?;
    let session = identity
        .create_session(&params.email, &params.password)
        .await?;
    Ok((user, session))
}

/// Open a session for existing credentials and return its user.
pub async fn authenticate<S: IdentityService>(
    identity: &S,
    email: &str,
    password: &str,
) -> Result<(UserInfo, Session), IdentityError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(IdentityError::InvalidCredentials);
    }
    let session = identity.create_session(&email, password).await?;
    let user = identity.current_user(&session.secret).await?;
    Ok((user, session))
}

/// Resolve the user owning `secret`.
///
/// A missing secret, or one the service no longer accepts, yields `Ok(None)`;
/// any other failure is reported.
pub async fn resolve_user<S: IdentityService>(
    identity: &S,
    secret: Option<&str>,
) -> Result<Option<UserInfo>, IdentityError> {
    let Some(secret) = secret else {
        return Ok(None);
    };
    match identity.current_user(secret).await {
        Ok(user) => Ok(Some(user)),
        Err(IdentityError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Close the session for `secret`. Already-closed sessions are not an error.
pub async fn end_session<S: IdentityService>(
    identity: &S,
    secret: &str,
) -> Result<(), IdentityError> {
    match identity.delete_session(secret).await {
        Ok(()) | Err(IdentityError::Unauthorized) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Close the session a browser held before it was handed `next`.
///
/// Nothing happens when there was no previous session or it is `next` itself.
pub async fn replace_session<S: IdentityService>(
    identity: &S,
    previous: Option<&str>,
    next: &str,
) -> Result<(), IdentityError> {
    match previous {
        Some(previous) if previous != next => end_session(identity, previous).await,
        _ => Ok(()),
    }
}
