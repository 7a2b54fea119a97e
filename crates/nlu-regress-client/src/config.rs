//! Prediction service configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a [`ServiceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
}

/// Connection settings for the prediction endpoint.
///
/// Credentials and endpoint are opaque strings passed through to the
/// HTTP client; nothing in the core ever sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the prediction service,
    /// e.g. `https://westus.api.cognitive.microsoft.com`.
    pub endpoint: String,

    /// Application id of the published model.
    pub app_id: String,

    /// Subscription key sent on every request.
    pub subscription_key: String,

    /// Query the staging slot instead of the production slot.
    pub staging: bool,

    /// Ask the service for verbose results (all intents, not just the
    /// top one).
    pub verbose: bool,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Create a config for a specific endpoint and app.
    pub fn new(endpoint: &str, app_id: &str, subscription_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            app_id: app_id.to_string(),
            subscription_key: subscription_key.to_string(),
            staging: false,
            verbose: true,
            timeout_secs: 30,
        }
    }

    /// Create a config from environment variables.
    ///
    /// Reads `NLU_ENDPOINT`, `NLU_APP_ID` and `NLU_SUBSCRIPTION_KEY`
    /// (all required) and the optional `NLU_STAGING` flag.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: require_env("NLU_ENDPOINT")?,
            app_id: require_env("NLU_APP_ID")?,
            subscription_key: require_env("NLU_SUBSCRIPTION_KEY")?,
            staging: std::env::var("NLU_STAGING")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            verbose: true,
            timeout_secs: 30,
        })
    }

    /// Target the staging slot.
    pub fn with_staging(mut self, staging: bool) -> Self {
        self.staging = staging;
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}
