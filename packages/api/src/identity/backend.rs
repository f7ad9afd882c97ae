//! Process-wide identity backend, chosen once from the environment.

use tokio::sync::OnceCell;

use super::{
    AppwriteClient, AppwriteConfig, IdentityError, IdentityService, MemoryIdentity,
};
use crate::forms::SignUpParams;
use crate::models::{Session, UserInfo};

static BACKEND: OnceCell<Backend> = OnceCell::const_new();

/// The identity service used by the server functions.
#[derive(Debug, Clone)]
pub enum Backend {
    Appwrite(AppwriteClient),
    Memory(MemoryIdentity),
}

/// Get or initialize the identity backend.
///
/// Uses Appwrite when `APPWRITE_ENDPOINT` is set, otherwise an in-memory service
/// whose accounts disappear on restart.
pub async fn get_backend() -> Result<&'static Backend, IdentityError> {
    BACKEND
        .get_or_try_init(|| async {
            let backend = match AppwriteConfig::from_env()? {
                Some(config) => {
                    tracing::info!(endpoint = %config.endpoint, "using Appwrite identity service");
                    Backend::Appwrite(AppwriteClient::new(config))
                }
                None => {
                    tracing::warn!(
                        "APPWRITE_ENDPOINT not set; accounts are kept in memory and lost on restart"
                    );
                    Backend::Memory(MemoryIdentity::new())
                }
            };
            Ok::<_, IdentityError>(backend)
        })
        .await
}

impl IdentityService for Backend {
    async fn create_account(&self, params: &SignUpParams) -> Result<UserInfo, IdentityError> {
        match self {
            Backend::Appwrite(client) => client.create_account(params).await,
            Backend::Memory(memory) => memory.create_account(params).await,
        }
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        match self {
            Backend::Appwrite(client) => client.create_session(email, password).await,
            Backend::Memory(memory) => memory.create_session(email, password).await,
        }
    }

    async fn current_user(&self, secret: &str) -> Result<UserInfo, IdentityError> {
        match self {
            Backend::Appwrite(client) => client.current_user(secret).await,
            Backend::Memory(memory) => memory.current_user(secret).await,
        }
    }

    async fn delete_session(&self, secret: &str) -> Result<(), IdentityError> {
        match self {
            Backend::Appwrite(client) => client.delete_session(secret).await,
            Backend::Memory(memory) => memory.delete_session(secret).await,
        }
    }
}
