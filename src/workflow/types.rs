use serde::{Deserialize, Serialize};

use crate::invoker::InvokeReply;

pub const STAGE_A: &str = "stage-a";
pub const STAGE_B: &str = "stage-b";
pub const STAGE_SINGLE: &str = "stage";

/// Inbound upload workflow request. `key` is the caller's file name and is
/// only used to derive the stored object's extension.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub email: String,
    pub token: String,
    pub key: String,
    pub content: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    pub email: String,
    pub token: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListRequest {
    pub email: String,
    pub token: String,
}

/// One sub-operation's tagged outcome. The aggregated workflow response is
/// the ordered list of these records, serialized; this replaces the string
/// concatenation the service used to return.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub stage: &'static str,
    pub operation: &'static str,
    pub success: bool,
    pub output: String,
}

impl StepReport {
    pub fn from_reply(stage: &'static str, operation: &'static str, reply: InvokeReply) -> Self {
        Self {
            stage,
            operation,
            success: reply.success,
            output: reply.body,
        }
    }
}

pub fn all_succeeded(steps: &[StepReport]) -> bool {
    steps.iter().all(|step| step.success)
}
