// ────────────────────────────────────────────────────────────────
// Wire-level constants shared by the orchestrators and the
// collaborator endpoints
// ────────────────────────────────────────────────────────────────

/// Literal body sent by the scheduler keepalive trigger. Requests carrying
/// this sentinel are answered with 200 and perform no work.
pub const KEEPALIVE_SENTINEL: &str = "EventBridgeInvoke";

pub const KEEPALIVE_RESPONSE: &str = "No action taken for keepalive invocation.";

/// Prefix applied to the object key of the downscaled variant.
pub const RESIZED_PREFIX: &str = "resized-";

// Backend operation names, resolved by the invoker to `{base_url}/{name}`.

pub const OP_CHECK_TOKEN: &str = "check-token";

pub const OP_STORE_OBJECT: &str = "store-object";

pub const OP_DELETE_OBJECT: &str = "delete-object";

pub const OP_RESIZE_IMAGE: &str = "resize-image";

pub const OP_INSERT_DESCRIPTION: &str = "insert-description";

pub const OP_DELETE_DESCRIPTION: &str = "delete-description";

pub const OP_LIST_DESCRIPTIONS: &str = "list-descriptions";
