//! # User and session models
//!
//! ## [`UserInfo`]
//!
//! The client-safe view of an identity-service account. It is
//! `Serialize + Deserialize + PartialEq` so it can cross the server/client boundary
//! via Dioxus server functions. The UI only ever asks whether one exists (to swap
//! the form for the account-linking view) and uses [`UserInfo::display_name`] for
//! greetings.
//!
//! ## [`Session`]
//!
//! An identity-service session. The `secret` authorises later calls on behalf of
//! the user, so a `Session` stays on the server: the server functions store the
//! secret in the cookie-backed server session and hand only [`UserInfo`] back.

use serde::{Deserialize, Serialize};

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// First word of the display name, for short greetings.
    pub fn first_name(&self) -> &str {
        let name = self.display_name();
        name.split_whitespace().next().unwrap_or(name)
    }
}

/// An authenticated session with the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub secret: String,
}
