//! Appwrite configuration from environment variables.

use super::IdentityError;

pub const ENDPOINT_VAR: &str = "APPWRITE_ENDPOINT";
pub const PROJECT_VAR: &str = "APPWRITE_PROJECT";
pub const KEY_VAR: &str = "APPWRITE_KEY";

/// Connection settings for an Appwrite project.
#[derive(Debug, Clone, PartialEq)]
pub struct AppwriteConfig {
    /// Base URL including the API version, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    pub project_id: String,
    /// Server API key; needs the `users` and `sessions` scopes.
    pub api_key: String,
}

impl AppwriteConfig {
    /// Read the configuration from the process environment (and `.env`).
    ///
    /// Returns `Ok(None)` when `APPWRITE_ENDPOINT` is not set at all.
    #[cfg(feature = "server")]
    pub fn from_env() -> Result<Option<Self>, IdentityError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, IdentityError> {
        let Some(endpoint) = lookup(ENDPOINT_VAR) else {
            return Ok(None);
        };
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(IdentityError::Config(format!("{ENDPOINT_VAR} is empty")));
        }

        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| IdentityError::Config(format!("{key} not set")))
        };

        Ok(Some(Self {
            endpoint,
            project_id: required(PROJECT_VAR)?,
            api_key: required(KEY_VAR)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_endpoint_means_unconfigured() {
        assert_eq!(AppwriteConfig::from_lookup(lookup(&[])).unwrap(), None);
    }

    #[test]
    fn test_full_config() {
        let config = AppwriteConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://cloud.appwrite.io/v1/"),
            (PROJECT_VAR, "na-moni"),
            (KEY_VAR, "secret-key"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.endpoint, "https://cloud.appwrite.io/v1");
        assert_eq!(config.project_id, "na-moni");
        assert_eq!(config.api_key, "secret-key");
    }

    #[test]
    fn test_partial_config_is_an_error() {
        let err = AppwriteConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://cloud.appwrite.io/v1"),
            (PROJECT_VAR, "na-moni"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Identity service is not configured: APPWRITE_KEY not set"
        );
    }
}
