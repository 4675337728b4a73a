use super::types::{DeleteRequest, STAGE_SINGLE, StepReport};
use super::{WorkflowFailure, WorkflowResult, authorize};
use crate::common::{OP_DELETE_DESCRIPTION, OP_DELETE_OBJECT, RESIZED_PREFIX};
use crate::config::AppConfig;
use crate::invoker::{InvokeOperation, spawn_call};
use anyhow::Context;
use futures::future::join_all;
use log::info;
use serde_json::json;
use std::sync::Arc;

/// Delete workflow: gate, then one parallel stage removing the original
/// object, the metadata record and the `resized-` variant. Derived
/// artifacts produced by external triggers are not this workflow's concern.
/// Partial failures are reported, not compensated.
pub async fn run(
    invoker: &Arc<dyn InvokeOperation>,
    config: &AppConfig,
    request: DeleteRequest,
) -> WorkflowResult {
    if !authorize(invoker, &request.email, &request.token).await {
        return Err(WorkflowFailure::Denied);
    }
    info!("delete for {} on key {}", request.email, request.key);

    let resized_key = format!("{RESIZED_PREFIX}{}", request.key);
    let tasks = [
        (
            OP_DELETE_OBJECT,
            spawn_call(
                invoker,
                OP_DELETE_OBJECT,
                json!({ "key": &request.key, "bucket": &config.object_container }),
            ),
        ),
        (
            OP_DELETE_DESCRIPTION,
            spawn_call(
                invoker,
                OP_DELETE_DESCRIPTION,
                json!({ "imageKey": &request.key }),
            ),
        ),
        (
            OP_DELETE_OBJECT,
            spawn_call(
                invoker,
                OP_DELETE_OBJECT,
                json!({ "key": resized_key, "bucket": &config.resized_container }),
            ),
        ),
    ];

    let (operations, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
    let replies = join_all(handles).await;

    let mut steps = Vec::with_capacity(replies.len());
    for (operation, reply) in operations.into_iter().zip(replies) {
        let reply = reply.context("delete task aborted")?;
        steps.push(StepReport::from_reply(STAGE_SINGLE, operation, reply));
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::OP_CHECK_TOKEN;
    use crate::workflow::testing::StubInvoker;

    fn delete_request() -> DeleteRequest {
        DeleteRequest {
            email: "a@b.com".to_string(),
            token: "valid".to_string(),
            key: "123_abc.png".to_string(),
        }
    }

    fn test_config() -> AppConfig {
        envy::prefixed("PIXFLOW_")
            .from_iter(std::iter::empty::<(String, String)>())
            .unwrap()
    }

    fn as_invoker(stub: &Arc<StubInvoker>) -> Arc<dyn InvokeOperation> {
        Arc::clone(stub) as Arc<dyn InvokeOperation>
    }

    #[tokio::test]
    async fn all_three_deletes_are_issued_after_the_gate() {
        let stub = Arc::new(StubInvoker::accepting());
        let steps = run(&as_invoker(&stub), &test_config(), delete_request())
            .await
            .unwrap();

        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|step| step.success));

        let calls = stub.recorded_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].0, OP_CHECK_TOKEN);

        let deleted_keys: Vec<String> = calls
            .iter()
            .filter(|(op, _)| op == OP_DELETE_OBJECT)
            .map(|(_, payload)| payload["key"].as_str().unwrap().to_string())
            .collect();
        assert!(deleted_keys.contains(&"123_abc.png".to_string()));
        assert!(deleted_keys.contains(&"resized-123_abc.png".to_string()));

        let description_key = calls
            .iter()
            .find(|(op, _)| op == OP_DELETE_DESCRIPTION)
            .map(|(_, payload)| payload["imageKey"].as_str().unwrap().to_string())
            .unwrap();
        assert_eq!(description_key, "123_abc.png");
    }

    #[tokio::test]
    async fn invalid_token_issues_no_deletes() {
        let stub = Arc::new(StubInvoker::rejecting());
        let result = run(&as_invoker(&stub), &test_config(), delete_request()).await;
        assert!(matches!(result, Err(WorkflowFailure::Denied)));
        assert_eq!(stub.sub_operation_count(), 0);
    }

    #[tokio::test]
    async fn one_failed_delete_does_not_drop_the_others() {
        let stub = Arc::new(StubInvoker {
            failing: [OP_DELETE_DESCRIPTION].into_iter().collect(),
            ..StubInvoker::accepting()
        });
        let steps = run(&as_invoker(&stub), &test_config(), delete_request())
            .await
            .unwrap();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps.iter().filter(|step| step.success).count(), 2);
        let failed = steps.iter().find(|step| !step.success).unwrap();
        assert_eq!(failed.operation, OP_DELETE_DESCRIPTION);
        assert!(failed.output.contains("Error calling delete-description"));
    }
}
