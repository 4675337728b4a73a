use crate::api::{RequestEnvelope, ResponseEnvelope};
use crate::common::KEEPALIVE_SENTINEL;
use crate::token;
use crate::workflow::WorkflowContext;
use anyhow::{Context, Result};
use log::{error, info};
use rocket::State;
use rocket::post;
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct IssueTokenRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
struct CheckTokenRequest {
    email: String,
    token: String,
}

/// Token issuance operation. The signing key comes from the secret
/// provider, the same source verification uses.
#[post("/auth/token", format = "json", data = "<envelope>")]
pub async fn issue_token(
    context: &State<WorkflowContext>,
    envelope: Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    if envelope.body == KEEPALIVE_SENTINEL {
        return Json(ResponseEnvelope::keepalive());
    }

    let request: IssueTokenRequest = match serde_json::from_str(&envelope.body) {
        Ok(request) => request,
        Err(err) => {
            return Json(ResponseEnvelope::error(
                400,
                json!({ "success": false, "error": err.to_string() }).to_string(),
            ));
        }
    };
    if request.email.is_empty() {
        return Json(ResponseEnvelope::error(
            400,
            json!({ "success": false, "error": "Email is required" }).to_string(),
        ));
    }

    match issue_for(context, &request.email).await {
        Ok(token) => {
            info!("issued token for {}", request.email);
            Json(ResponseEnvelope::ok_json(json!({ "token": token }).to_string()))
        }
        Err(err) => {
            error!("token issuance failed: {err:#}");
            Json(ResponseEnvelope::error(
                500,
                json!({ "success": false, "error": err.to_string() }).to_string(),
            ))
        }
    }
}

async fn issue_for(context: &WorkflowContext, email: &str) -> Result<String> {
    let secret = context
        .secrets
        .resolve()
        .await
        .context("failed to resolve the signing key")?;
    Ok(token::issue(email, &secret)?)
}

/// Token verification operation — the target of the orchestrators' gate
/// calls. Always replies 200 with a `success` flag; verification failures
/// are denials, not faults.
#[post("/auth/check", format = "json", data = "<envelope>")]
pub async fn check_token(
    context: &State<WorkflowContext>,
    envelope: Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    if envelope.body == KEEPALIVE_SENTINEL {
        return Json(ResponseEnvelope::keepalive());
    }

    match verify_inner(context, &envelope.body).await {
        Ok(true) => Json(ResponseEnvelope::ok_json(
            json!({ "success": true }).to_string(),
        )),
        Ok(false) => Json(ResponseEnvelope::ok_json(
            json!({ "success": false, "error": "Invalid token" }).to_string(),
        )),
        Err(err) => {
            error!("token check failed: {err:#}");
            Json(ResponseEnvelope::error(
                500,
                json!({ "success": false, "error": err.to_string() }).to_string(),
            ))
        }
    }
}

async fn verify_inner(context: &WorkflowContext, inner: &str) -> Result<bool> {
    let request: CheckTokenRequest =
        serde_json::from_str(inner).context("check-token arguments are not valid JSON")?;
    let secret = context
        .secrets
        .resolve()
        .await
        .context("failed to resolve the signing key")?;
    Ok(token::verify(&request.email, &secret, &request.token))
}
