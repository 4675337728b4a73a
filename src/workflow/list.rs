use super::types::{ListRequest, STAGE_SINGLE, StepReport};
use super::{WorkflowFailure, WorkflowResult, authorize};
use crate::common::OP_LIST_DESCRIPTIONS;
use crate::invoker::InvokeOperation;
use log::info;
use serde_json::Value;
use std::sync::Arc;

/// List workflow: gate, then a single sequential call to the metadata
/// listing operation. Its reply body is passed through verbatim as the one
/// step report.
pub async fn run(invoker: &Arc<dyn InvokeOperation>, request: ListRequest) -> WorkflowResult {
    if !authorize(invoker, &request.email, &request.token).await {
        return Err(WorkflowFailure::Denied);
    }
    info!("listing descriptions for {}", request.email);

    let reply = invoker.call(OP_LIST_DESCRIPTIONS, Value::Null).await;
    Ok(vec![StepReport::from_reply(
        STAGE_SINGLE,
        OP_LIST_DESCRIPTIONS,
        reply,
    )])
}
