pub mod handlers;

use crate::common::KEEPALIVE_RESPONSE;
use crate::workflow::types::{StepReport, all_succeeded};
use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;

// ────────────────────────────────────────────────────────────────
// Infrastructure error responder
// ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AppError {
    pub status: Status,
    pub error: anyhow::Error,
}

impl AppError {
    pub fn bad_request(error: impl Into<anyhow::Error>) -> Self {
        Self {
            status: Status::BadRequest,
            error: error.into(),
        }
    }
}

#[rocket::async_trait]
impl<'r, 'o: 'r> Responder<'r, 'o> for AppError {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'o> {
        let outer_msg = self.error.to_string();
        let chain: Vec<String> = self.error.chain().map(|cause| cause.to_string()).collect();

        let body = json!({
            "error": outer_msg,
            "chain": chain,
        })
        .to_string();

        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl<E> From<E> for AppError
where
    anyhow::Error: From<E>,
{
    fn from(err: E) -> Self {
        AppError {
            status: Status::InternalServerError,
            error: anyhow::Error::from(err),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ────────────────────────────────────────────────────────────────
// Workflow response
// ────────────────────────────────────────────────────────────────

/// Front-door workflow response: status, content type and an opaque body
/// (base64 of the serialized step reports on the success paths).
#[derive(Debug)]
pub struct WorkflowResponse {
    pub status: Status,
    pub content_type: ContentType,
    pub body: String,
}

impl WorkflowResponse {
    /// 200 when every step succeeded, 207 when some failed — partial
    /// failure stays distinguishable without parsing the body.
    pub fn from_steps(steps: &[StepReport]) -> Result<Self> {
        let serialized = serde_json::to_string(steps)?;
        Ok(Self {
            status: if all_succeeded(steps) {
                Status::Ok
            } else {
                Status::MultiStatus
            },
            content_type: ContentType::Plain,
            body: BASE64_STANDARD.encode(serialized),
        })
    }

    pub fn denied() -> Self {
        Self {
            status: Status::Forbidden,
            content_type: ContentType::Plain,
            body: "Invalid token. Access denied.".to_string(),
        }
    }

    pub fn fatal(error: &anyhow::Error) -> Self {
        Self {
            status: Status::InternalServerError,
            content_type: ContentType::Plain,
            body: format!("Error: {error:#}"),
        }
    }

    pub fn keepalive() -> Self {
        Self {
            status: Status::Ok,
            content_type: ContentType::Plain,
            body: KEEPALIVE_RESPONSE.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for WorkflowResponse {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .status(self.status)
            .header(self.content_type)
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

// ────────────────────────────────────────────────────────────────
// Backend operation envelopes
// ────────────────────────────────────────────────────────────────

/// Invocation envelope the backend operations receive: the real arguments
/// live JSON-encoded inside `body`.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    pub body: String,
}

/// Reply envelope the backend operations produce. The invoker consumes only
/// the `body` field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub body: String,
    pub is_base64_encoded: bool,
    pub headers: HashMap<&'static str, &'static str>,
}

impl ResponseEnvelope {
    fn with_content_type(
        status_code: u16,
        body: String,
        is_base64_encoded: bool,
        content_type: &'static str,
    ) -> Self {
        Self {
            status_code,
            body,
            is_base64_encoded,
            headers: HashMap::from([("Content-Type", content_type)]),
        }
    }

    pub fn ok_json(body: String) -> Self {
        Self::with_content_type(200, body, false, "application/json")
    }

    pub fn ok_base64(body: String, content_type: &'static str) -> Self {
        Self::with_content_type(200, body, true, content_type)
    }

    pub fn error(status_code: u16, body: String) -> Self {
        Self::with_content_type(status_code, body, false, "application/json")
    }

    pub fn keepalive() -> Self {
        Self::with_content_type(200, KEEPALIVE_RESPONSE.to_string(), false, "text/plain")
    }
}
