use crate::config::AppConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of one backend invocation. Exactly one meaning applies: on
/// success `body` is the extracted reply payload, on failure it is the
/// captured error text. Transport problems never surface as `Err` — the
/// orchestrators must not crash because one dependency is down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeReply {
    pub success: bool,
    pub body: String,
}

impl InvokeReply {
    pub fn completed(body: impl Into<String>) -> Self {
        Self {
            success: true,
            body: body.into(),
        }
    }

    pub fn failed(body: impl Into<String>) -> Self {
        Self {
            success: false,
            body: body.into(),
        }
    }
}

/// Uniform invocation of a named backend operation. The trait seam exists
/// so the orchestrators can be exercised against a scripted stub.
#[async_trait]
pub trait InvokeOperation: Send + Sync {
    async fn call(&self, operation: &str, payload: Value) -> InvokeReply;
}

/// Schedule a call onto the runtime for concurrent execution. The caller
/// owns the handle and must await it at its stage barrier.
pub fn spawn_call(
    invoker: &Arc<dyn InvokeOperation>,
    operation: &'static str,
    payload: Value,
) -> JoinHandle<InvokeReply> {
    let invoker = Arc::clone(invoker);
    tokio::spawn(async move { invoker.call(operation, payload).await })
}

/// Wrap the actual arguments in the `{"body": "<json string>"}` envelope the
/// backends expect. A null payload means "no arguments" and is sent as an
/// empty body (the listing operation's contract).
pub fn wrap_envelope(payload: &Value) -> String {
    if payload.is_null() {
        return String::new();
    }
    json!({ "body": payload.to_string() }).to_string()
}

/// Pull the designated result field out of a reply envelope. A missing or
/// non-string `body` yields an empty result rather than an error; a reply
/// that is not a JSON object is a malformed envelope.
pub fn extract_body(reply_text: &str) -> Result<String> {
    let reply: Value =
        serde_json::from_str(reply_text).context("reply is not a valid JSON envelope")?;
    if !reply.is_object() {
        bail!("reply is not a JSON object envelope");
    }
    Ok(reply
        .get("body")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

/// HTTP-backed invoker: POSTs the envelope to `{base_url}/{operation}` with
/// a bounded timeout.
pub struct HttpInvoker {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInvoker {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.invoke_timeout())
            .build()
            .context("failed to build the operation HTTP client")?;
        Ok(Self {
            client,
            base_url: config.invoker_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn try_call(&self, operation: &str, payload: &Value) -> Result<String> {
        let url = format!("{}/{}", self.base_url, operation);
        let request_body = wrap_envelope(payload);
        let mut request = self.client.post(&url);
        if !request_body.is_empty() {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(request_body);
        }
        let response = request.send().await.context("transport error")?;
        let status = response.status();
        let reply_text = response.text().await.context("failed to read reply")?;
        if !status.is_success() {
            bail!("operation returned status {status}: {reply_text}");
        }
        extract_body(&reply_text)
    }
}

#[async_trait]
impl InvokeOperation for HttpInvoker {
    async fn call(&self, operation: &str, payload: Value) -> InvokeReply {
        match self.try_call(operation, &payload).await {
            Ok(body) => {
                debug!("response from {operation}: {body}");
                InvokeReply::completed(body)
            }
            Err(err) => {
                let message = format!("Error calling {operation}: {err:#}");
                warn!("{message}");
                InvokeReply::failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_double_encodes_the_payload() {
        let payload = json!({"email": "a@b.com", "token": "t"});
        let wrapped = wrap_envelope(&payload);
        let outer: Value = serde_json::from_str(&wrapped).unwrap();
        let inner: Value = serde_json::from_str(outer["body"].as_str().unwrap()).unwrap();
        assert_eq!(inner["email"], "a@b.com");
        assert_eq!(inner["token"], "t");
    }

    #[test]
    fn null_payload_is_an_empty_body() {
        assert_eq!(wrap_envelope(&Value::Null), "");
    }

    #[test]
    fn body_field_is_extracted() {
        let body = extract_body(r#"{"statusCode": 200, "body": "stored"}"#).unwrap();
        assert_eq!(body, "stored");
    }

    #[test]
    fn missing_body_defaults_to_empty() {
        assert_eq!(extract_body(r#"{"statusCode": 200}"#).unwrap(), "");
    }

    #[test]
    fn non_string_body_defaults_to_empty() {
        assert_eq!(extract_body(r#"{"body": 17}"#).unwrap(), "");
    }

    #[test]
    fn malformed_envelopes_are_errors() {
        assert!(extract_body("not json at all").is_err());
        assert!(extract_body(r#""just a string""#).is_err());
        assert!(extract_body("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn transport_errors_become_failed_replies() {
        // Nothing listens on this port; the call must degrade to data.
        let vars = vec![(
            "PIXFLOW_INVOKER_BASE_URL".to_string(),
            "http://127.0.0.1:1/ops".to_string(),
        )];
        let config: AppConfig = envy::prefixed("PIXFLOW_").from_iter(vars).unwrap();
        let invoker = HttpInvoker::new(&config).unwrap();
        let reply = invoker.call("store-object", json!({"key": "k"})).await;
        assert!(!reply.success);
        assert!(reply.body.starts_with("Error calling store-object:"));
    }
}
