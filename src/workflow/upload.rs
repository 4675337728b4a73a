use super::key::ObjectKey;
use super::types::{STAGE_A, STAGE_B, StepReport, UploadRequest};
use super::{WorkflowFailure, WorkflowResult, authorize};
use crate::common::{OP_INSERT_DESCRIPTION, OP_RESIZE_IMAGE, OP_STORE_OBJECT};
use crate::config::AppConfig;
use crate::invoker::{InvokeOperation, spawn_call};
use anyhow::Context;
use log::info;
use serde_json::json;
use std::sync::Arc;

/// Upload workflow: gate, then two barrier-synchronized stages.
///
/// Stage A stores the original bytes and produces the thumbnail; the two are
/// independent and run concurrently. Stage B stores the thumbnail under the
/// derived key and inserts the metadata record, each depending only on stage
/// A outputs. The barrier is unconditional: a failed stage A sub-operation
/// does not stop stage B, so its error text can compound downstream. There
/// is no rollback of already-applied steps.
pub async fn run(
    invoker: &Arc<dyn InvokeOperation>,
    config: &AppConfig,
    request: UploadRequest,
) -> WorkflowResult {
    if !authorize(invoker, &request.email, &request.token).await {
        return Err(WorkflowFailure::Denied);
    }

    let object_key = ObjectKey::generate(&request.key)?;
    info!("upload for {} assigned key {object_key}", request.email);

    // Stage A: store the original and downscale, concurrently.
    let store_original = spawn_call(
        invoker,
        OP_STORE_OBJECT,
        json!({
            "content": &request.content,
            "key": object_key.as_str(),
            "bucket": &config.object_container,
        }),
    );
    let resize = spawn_call(invoker, OP_RESIZE_IMAGE, json!({ "content": &request.content }));

    let (store_original, resize) = tokio::join!(store_original, resize);
    let store_original = store_original.context("store-object task aborted")?;
    let resize = resize.context("resize-image task aborted")?;

    let mut steps = vec![
        StepReport::from_reply(STAGE_A, OP_STORE_OBJECT, store_original),
        StepReport::from_reply(STAGE_A, OP_RESIZE_IMAGE, resize.clone()),
    ];

    // Stage B: the resize output feeds the derived store as-is, even when
    // the resize failed.
    let store_resized = spawn_call(
        invoker,
        OP_STORE_OBJECT,
        json!({
            "content": &resize.body,
            "key": object_key.resized(),
            "bucket": &config.resized_container,
        }),
    );
    let insert_description = spawn_call(
        invoker,
        OP_INSERT_DESCRIPTION,
        json!({
            "imageKey": object_key.as_str(),
            "description": &request.description,
            "email": &request.email,
        }),
    );

    let (store_resized, insert_description) = tokio::join!(store_resized, insert_description);
    let store_resized = store_resized.context("store-object task aborted")?;
    let insert_description = insert_description.context("insert-description task aborted")?;

    steps.push(StepReport::from_reply(STAGE_B, OP_STORE_OBJECT, store_resized));
    steps.push(StepReport::from_reply(
        STAGE_B,
        OP_INSERT_DESCRIPTION,
        insert_description,
    ));

    Ok(steps)
}
