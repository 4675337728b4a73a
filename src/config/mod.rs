use anyhow::{Context, Result};
use dotenv::dotenv;
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration, read once at startup from `PIXFLOW_*` environment
/// variables (a `.env` file is honoured if present).
///
/// Note that the signing key is deliberately resolved through a single path
/// for both token issuance and verification: either `PIXFLOW_TOKEN_SECRET`
/// or, when `PIXFLOW_SECRET_ENDPOINT` is set, the remote parameter source.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL under which the backend operations are reachable.
    #[serde(default = "default_invoker_base_url")]
    pub invoker_base_url: String,

    /// Per-call timeout for backend invocations, in seconds.
    #[serde(default = "default_invoke_timeout_secs")]
    pub invoke_timeout_secs: u64,

    /// Static shared signing key. Used when no secret endpoint is configured.
    #[serde(default)]
    pub token_secret: Option<String>,

    /// Remote parameter source for the signing key, queried per issuance.
    #[serde(default)]
    pub secret_endpoint: Option<String>,

    #[serde(default = "default_secret_parameter")]
    pub secret_parameter: String,

    /// Credential forwarded to the parameter source, if it requires one.
    #[serde(default)]
    pub secret_access_token: Option<String>,

    #[serde(default = "default_object_container")]
    pub object_container: String,

    #[serde(default = "default_resized_container")]
    pub resized_container: String,
}

fn default_invoker_base_url() -> String {
    "http://localhost:8000/ops".to_string()
}

fn default_invoke_timeout_secs() -> u64 {
    30
}

fn default_secret_parameter() -> String {
    "TokenSigningKey".to_string()
}

fn default_object_container() -> String {
    "pixflow-objects".to_string()
}

fn default_resized_container() -> String {
    "resized-pixflow-objects".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        envy::prefixed("PIXFLOW_")
            .from_env()
            .context("failed to read PIXFLOW_* configuration from the environment")
    }

    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.invoke_timeout_secs)
    }
}
