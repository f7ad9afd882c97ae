//! Server-side session keys.

/// Key under which the identity-service session secret is stored.
///
/// The secret stays in the server session store; the browser only holds the
/// opaque session cookie.
pub const SESSION_SECRET_KEY: &str = "appwrite-session";
