use crate::config::AppConfig;
use anyhow::{Context, Result, anyhow};
use log::info;
use serde::Deserialize;
use std::time::Duration;

/// Reply contract of the remote parameter source.
#[derive(Debug, Deserialize)]
struct ParameterReply {
    #[serde(rename = "Parameter")]
    parameter: Parameter,
}

#[derive(Debug, Deserialize)]
struct Parameter {
    #[serde(rename = "Value")]
    value: String,
}

/// Resolves the shared token signing key. Both token issuance and
/// verification consult the same provider, so the two directions cannot
/// drift apart.
#[derive(Debug, Clone)]
pub struct SecretProvider {
    client: reqwest::Client,
    endpoint: Option<String>,
    parameter: String,
    access_token: Option<String>,
    static_key: Option<String>,
}

impl SecretProvider {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for the secret provider")?;
        Ok(Self {
            client,
            endpoint: config.secret_endpoint.clone(),
            parameter: config.secret_parameter.clone(),
            access_token: config.secret_access_token.clone(),
            static_key: config.token_secret.clone(),
        })
    }

    /// Resolve the signing key, fetching it fresh from the parameter source
    /// when one is configured, otherwise falling back to the static key.
    pub async fn resolve(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return self.fetch_parameter(endpoint).await;
        }
        self.static_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow!("no signing key configured; set PIXFLOW_TOKEN_SECRET or PIXFLOW_SECRET_ENDPOINT")
            })
    }

    async fn fetch_parameter(&self, endpoint: &str) -> Result<String> {
        let mut request = self.client.get(endpoint).query(&[
            ("name", self.parameter.as_str()),
            ("withDecryption", "true"),
        ]);
        if let Some(token) = &self.access_token {
            request = request.header("X-Aws-Parameters-Secrets-Token", token);
        }
        let reply: ParameterReply = request
            .send()
            .await
            .context("secret parameter request failed")?
            .error_for_status()
            .context("secret parameter source refused the request")?
            .json()
            .await
            .context("secret parameter reply was not the expected JSON shape")?;
        info!("resolved signing key from parameter {}", self.parameter);
        Ok(reply.parameter.value)
    }
}
