use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::distributions::{Alphanumeric, DistString};

use super::{IdentityError, IdentityService};
use crate::auth::{hash_password, verify_password};
use crate::forms::SignUpParams;
use crate::models::{Session, UserInfo};

#[derive(Debug, Clone)]
struct Account {
    user: UserInfo,
    password_hash: String,
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by lowercase email.
    accounts: HashMap<String, Account>,
    /// Keyed by session secret; value is (session id, user id).
    sessions: HashMap<String, (String, String)>,
}

/// In-memory identity service for testing and local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryIdentity {
    state: Arc<Mutex<State>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }
}

fn random_token(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), len)
}

impl IdentityService for MemoryIdentity {
    async fn create_account(&self, params: &SignUpParams) -> Result<UserInfo, IdentityError> {
        let email = params.email.to_lowercase();
        if self.lock().accounts.contains_key(&email) {
            return Err(IdentityError::AccountExists);
        }

        // Hash outside the lock; argon2 is slow on purpose.
        let password_hash = hash_password(&params.password)?;
        let user = UserInfo {
            id: random_token(20).to_lowercase(),
            email: email.clone(),
            name: Some(params.full_name()),
        };

        let mut state = self.lock();
        if state.accounts.contains_key(&email) {
            return Err(IdentityError::AccountExists);
        }
        state.accounts.insert(
            email,
            Account {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let account = self
            .lock()
            .accounts
            .get(&email.to_lowercase())
            .cloned()
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        let session = Session {
            id: random_token(20).to_lowercase(),
            user_id: account.user.id,
            secret: random_token(64),
        };
        self.lock().sessions.insert(
            session.secret.clone(),
            (session.id.clone(), session.user_id.clone()),
        );
        Ok(session)
    }

    async fn current_user(&self, secret: &str) -> Result<UserInfo, IdentityError> {
        let state = self.lock();
        let (_, user_id) = state
            .sessions
            .get(secret)
            .ok_or(IdentityError::Unauthorized)?;
        state
            .accounts
            .values()
            .find(|account| &account.user.id == user_id)
            .map(|account| account.user.clone())
            .ok_or(IdentityError::Unauthorized)
    }

    async fn delete_session(&self, secret: &str) -> Result<(), IdentityError> {
        self.lock()
            .sessions
            .remove(secret)
            .map(|_| ())
            .ok_or(IdentityError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(email: &str) -> SignUpParams {
        SignUpParams {
            first_name: "Adaeze".into(),
            last_name: "Okafor".into(),
            address1: "12 Allen Avenue".into(),
            city: "Ikeja".into(),
            state: "LA".into(),
            postal_code: "100271".into(),
            date_of_birth: "1994-03-17".into(),
            ssn: "4729920394".into(),
            email: email.into(),
            password: "correct-horse".into(),
        }
    }

    #[tokio::test]
    async fn test_account_and_session_lifecycle() {
        let identity = MemoryIdentity::new();

        let user = identity.create_account(&params("ada@example.com")).await.unwrap();
        assert_eq!(user.name.as_deref(), Some("Adaeze Okafor"));
        assert_eq!(identity.account_count(), 1);

        let session = identity
            .create_session("ADA@example.com", "correct-horse")
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(identity.current_user(&session.secret).await.unwrap(), user);

        identity.delete_session(&session.secret).await.unwrap();
        assert_eq!(identity.session_count(), 0);
        assert!(matches!(
            identity.current_user(&session.secret).await,
            Err(IdentityError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_account_rejected() {
        let identity = MemoryIdentity::new();
        identity.create_account(&params("ada@example.com")).await.unwrap();
        assert!(matches!(
            identity.create_account(&params("Ada@Example.com")).await,
            Err(IdentityError::AccountExists)
        ));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let identity = MemoryIdentity::new();
        identity.create_account(&params("ada@example.com")).await.unwrap();

        assert!(matches!(
            identity.create_session("ada@example.com", "wrong-password").await,
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            identity.create_session("nobody@example.com", "correct-horse").await,
            Err(IdentityError::InvalidCredentials)
        ));
        assert_eq!(identity.session_count(), 0);
    }
}
