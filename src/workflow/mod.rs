pub mod delete;
pub mod key;
pub mod list;
pub mod types;
pub mod upload;

use crate::common::OP_CHECK_TOKEN;
use crate::config::AppConfig;
use crate::invoker::InvokeOperation;
use crate::secrets::SecretProvider;
use log::warn;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

use types::StepReport;

/// Everything a workflow handler needs, built once in `main` and managed by
/// Rocket. The invoker is owned here rather than living in a process-wide
/// singleton.
pub struct WorkflowContext {
    pub config: AppConfig,
    pub invoker: Arc<dyn InvokeOperation>,
    pub secrets: SecretProvider,
}

#[derive(Debug, Error)]
pub enum WorkflowFailure {
    /// The gate refused the caller, or the verification call itself errored.
    /// Either way this is a denial, not a system fault.
    #[error("Invalid token. Access denied.")]
    Denied,
    /// The orchestration itself faulted (a stage task aborted). Degrades the
    /// whole workflow to a single error outcome.
    #[error("workflow execution fault: {0:#}")]
    Fatal(#[from] anyhow::Error),
}

pub type WorkflowResult = Result<Vec<StepReport>, WorkflowFailure>;

/// Mandatory authorization gate. Invokes the token-check operation and
/// inspects the `success` flag of its reply body; anything short of an
/// explicit true is a denial.
pub async fn authorize(invoker: &Arc<dyn InvokeOperation>, email: &str, token: &str) -> bool {
    let payload = json!({ "email": email, "token": token });
    let reply = invoker.call(OP_CHECK_TOKEN, payload).await;
    if !reply.success {
        warn!("token verification call failed: {}", reply.body);
        return false;
    }
    let verified = serde_json::from_str::<Value>(&reply.body)
        .ok()
        .and_then(|value| value.get("success").and_then(Value::as_bool))
        .unwrap_or(false);
    if !verified {
        warn!("token verification rejected caller {email}");
    }
    verified
}
