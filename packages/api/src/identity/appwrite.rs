//! # Appwrite adapter
//!
//! Talks to the Appwrite REST API:
//!
//! | Operation | Request | Auth headers |
//! |-----------|---------|--------------|
//! | create account | `POST /account` | project + API key |
//! | create session | `POST /account/sessions/email` | project + API key |
//! | current user | `GET /account` | project + session secret |
//! | delete session | `DELETE /account/sessions/current` | project + session secret |
//!
//! Sessions created with an API key carry their `secret` in the response body;
//! without the `sessions.write` scope Appwrite returns an empty secret, which is
//! reported as a configuration error rather than silently producing a dead session.
//!
//! Error bodies look like `{"message": "...", "code": 409, "type": "user_already_exists"}`
//! and are mapped onto [`IdentityError`] by [`AppwriteErrorBody::into_error`].

use serde::Deserialize;

use super::IdentityError;
#[cfg(any(feature = "server", test))]
use crate::models::{Session, UserInfo};

#[cfg(feature = "server")]
use super::{AppwriteConfig, IdentityService};
#[cfg(feature = "server")]
use crate::forms::SignUpParams;

/// Appwrite user document (only the fields we read).
#[cfg(any(feature = "server", test))]
#[derive(Debug, Deserialize)]
struct AppwriteUser {
    #[serde(rename = "$id")]
    id: String,
    email: String,
    #[serde(default)]
    name: String,
}

#[cfg(any(feature = "server", test))]
impl From<AppwriteUser> for UserInfo {
    fn from(user: AppwriteUser) -> Self {
        UserInfo {
            id: user.id,
            email: user.email,
            name: Some(user.name).filter(|n| !n.is_empty()),
        }
    }
}

/// Appwrite session document.
#[cfg(any(feature = "server", test))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppwriteSession {
    #[serde(rename = "$id")]
    id: String,
    user_id: String,
    #[serde(default)]
    secret: String,
}

#[cfg(any(feature = "server", test))]
impl TryFrom<AppwriteSession> for Session {
    type Error = IdentityError;

    fn try_from(session: AppwriteSession) -> Result<Self, Self::Error> {
        if session.secret.is_empty() {
            return Err(IdentityError::Config(
                "API key lacks the sessions.write scope".to_string(),
            ));
        }
        Ok(Session {
            id: session.id,
            user_id: session.user_id,
            secret: session.secret,
        })
    }
}

/// Error payload returned by Appwrite.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppwriteErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: u16,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl AppwriteErrorBody {
    pub fn into_error(self, status: u16) -> IdentityError {
        match self.kind.as_str() {
            "user_already_exists" | "user_email_already_exists" => IdentityError::AccountExists,
            "user_invalid_credentials" | "user_blocked" => IdentityError::InvalidCredentials,
            _ if status == 401 => IdentityError::Unauthorized,
            _ => IdentityError::Service {
                status,
                message: self.message,
            },
        }
    }
}

/// Map a non-success response body onto an [`IdentityError`].
#[cfg(any(feature = "server", test))]
pub(crate) fn error_from_body(status: u16, body: &str) -> IdentityError {
    match serde_json::from_str::<AppwriteErrorBody>(body) {
        Ok(parsed) => parsed.into_error(status),
        Err(_) if status == 401 => IdentityError::Unauthorized,
        Err(_) => IdentityError::Service {
            status,
            message: body.chars().take(200).collect(),
        },
    }
}

/// Appwrite-backed [`IdentityService`].
#[cfg(feature = "server")]
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    config: AppwriteConfig,
}

#[cfg(feature = "server")]
impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AppwriteConfig {
        &self.config
    }

    fn admin(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.config.endpoint, path))
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
    }

    fn as_session(
        &self,
        method: reqwest::Method,
        path: &str,
        secret: &str,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.config.endpoint, path))
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Session", secret)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, IdentityError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "appwrite request failed");
        Err(error_from_body(status.as_u16(), &body))
    }
}

#[cfg(feature = "server")]
impl IdentityService for AppwriteClient {
    async fn create_account(&self, params: &SignUpParams) -> Result<UserInfo, IdentityError> {
        let body = serde_json::json!({
            "userId": "unique()",
            "email": params.email,
            "password": params.password,
            "name": params.full_name(),
        });
        let user: AppwriteUser =
            Self::send(self.admin(reqwest::Method::POST, "/account").json(&body)).await?;
        Ok(user.into())
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session: AppwriteSession = Self::send(
            self.admin(reqwest::Method::POST, "/account/sessions/email")
                .json(&body),
        )
        .await?;
        session.try_into()
    }

    async fn current_user(&self, secret: &str) -> Result<UserInfo, IdentityError> {
        let user: AppwriteUser =
            Self::send(self.as_session(reqwest::Method::GET, "/account", secret)).await?;
        Ok(user.into())
    }

    async fn delete_session(&self, secret: &str) -> Result<(), IdentityError> {
        let response = self
            .as_session(reqwest::Method::DELETE, "/account/sessions/current", secret)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_document_maps_to_user_info() {
        let user: AppwriteUser = serde_json::from_str(
            r#"{"$id":"66a1f0","$createdAt":"2024-07-25T10:00:00.000+00:00","name":"Adaeze Okafor","email":"ada@example.com","emailVerification":false}"#,
        )
        .unwrap();
        assert_eq!(
            UserInfo::from(user),
            UserInfo {
                id: "66a1f0".into(),
                email: "ada@example.com".into(),
                name: Some("Adaeze Okafor".into()),
            }
        );

        let nameless: AppwriteUser =
            serde_json::from_str(r#"{"$id":"x","email":"a@b.co","name":""}"#).unwrap();
        assert_eq!(UserInfo::from(nameless).name, None);
    }

    #[test]
    fn test_session_requires_secret() {
        let session: AppwriteSession =
            serde_json::from_str(r#"{"$id":"s1","userId":"u1","secret":"abc"}"#).unwrap();
        let session = Session::try_from(session).unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.secret, "abc");

        let no_secret: AppwriteSession =
            serde_json::from_str(r#"{"$id":"s1","userId":"u1","secret":""}"#).unwrap();
        assert!(matches!(
            Session::try_from(no_secret),
            Err(IdentityError::Config(_))
        ));
    }

    #[test]
    fn test_error_mapping() {
        let exists = r#"{"message":"A user with the same id, email, or phone already exists","code":409,"type":"user_already_exists","version":"1.5.7"}"#;
        assert!(matches!(error_from_body(409, exists), IdentityError::AccountExists));

        let bad_login = r#"{"message":"Invalid credentials","code":401,"type":"user_invalid_credentials"}"#;
        assert!(matches!(
            error_from_body(401, bad_login),
            IdentityError::InvalidCredentials
        ));

        let guest = r#"{"message":"User (role: guests) missing scope (account)","code":401,"type":"general_unauthorized_scope"}"#;
        assert!(matches!(error_from_body(401, guest), IdentityError::Unauthorized));

        match error_from_body(503, "<html>bad gateway</html>") {
            IdentityError::Service { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "<html>bad gateway</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
