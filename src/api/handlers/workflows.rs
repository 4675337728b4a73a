use crate::api::{AppError, AppResult, WorkflowResponse};
use crate::common::KEEPALIVE_SENTINEL;
use crate::workflow::types::{DeleteRequest, ListRequest, UploadRequest};
use crate::workflow::{WorkflowContext, WorkflowFailure, WorkflowResult, delete, list, upload};
use log::{error, info};
use rocket::State;
use rocket::post;
use serde::de::DeserializeOwned;

/// Parse the front-door body, which is either the keepalive sentinel or the
/// workflow's JSON arguments.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<Option<T>, AppError> {
    if body == KEEPALIVE_SENTINEL {
        info!("keepalive trigger, no action taken");
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(AppError::bad_request)
}

fn respond(result: WorkflowResult) -> AppResult<WorkflowResponse> {
    match result {
        Ok(steps) => Ok(WorkflowResponse::from_steps(&steps)?),
        Err(WorkflowFailure::Denied) => Ok(WorkflowResponse::denied()),
        Err(WorkflowFailure::Fatal(err)) => {
            error!("workflow degraded to a fatal outcome: {err:#}");
            Ok(WorkflowResponse::fatal(&err))
        }
    }
}

#[post("/workflow/upload", data = "<body>")]
pub async fn upload_workflow(
    context: &State<WorkflowContext>,
    body: String,
) -> AppResult<WorkflowResponse> {
    let Some(request) = parse_body::<UploadRequest>(&body)? else {
        return Ok(WorkflowResponse::keepalive());
    };
    respond(upload::run(&context.invoker, &context.config, request).await)
}

#[post("/workflow/delete", data = "<body>")]
pub async fn delete_workflow(
    context: &State<WorkflowContext>,
    body: String,
) -> AppResult<WorkflowResponse> {
    let Some(request) = parse_body::<DeleteRequest>(&body)? else {
        return Ok(WorkflowResponse::keepalive());
    };
    respond(delete::run(&context.invoker, &context.config, request).await)
}

#[post("/workflow/list", data = "<body>")]
pub async fn list_workflow(
    context: &State<WorkflowContext>,
    body: String,
) -> AppResult<WorkflowResponse> {
    let Some(request) = parse_body::<ListRequest>(&body)? else {
        return Ok(WorkflowResponse::keepalive());
    };
    respond(list::run(&context.invoker, request).await)
}
