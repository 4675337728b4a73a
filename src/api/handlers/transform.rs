use crate::api::{RequestEnvelope, ResponseEnvelope};
use crate::common::KEEPALIVE_SENTINEL;
use crate::operations::resize::shrink_to_thumbnail;
use anyhow::{Context, Result};
use log::error;
use rocket::post;
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::json;
use tokio::task::spawn_blocking;

#[derive(Debug, Deserialize)]
struct ResizeRequest {
    content: String,
}

/// Image transform operation: base64 image in, base64 JPEG thumbnail out.
/// Decoding and re-encoding run on a blocking task.
#[post("/transform/resize", format = "json", data = "<envelope>")]
pub async fn resize_image(envelope: Json<RequestEnvelope>) -> Json<ResponseEnvelope> {
    if envelope.body == KEEPALIVE_SENTINEL {
        return Json(ResponseEnvelope::keepalive());
    }

    match resize_inner(&envelope.body).await {
        Ok(encoded) => Json(ResponseEnvelope::ok_base64(encoded, "image/jpeg")),
        Err(err) => {
            error!("resize failed: {err:#}");
            Json(ResponseEnvelope::error(
                500,
                json!({ "error": "Resize failed" }).to_string(),
            ))
        }
    }
}

async fn resize_inner(inner: &str) -> Result<String> {
    let request: ResizeRequest =
        serde_json::from_str(inner).context("resize arguments are not valid JSON")?;
    spawn_blocking(move || shrink_to_thumbnail(&request.content))
        .await
        .context("resize task aborted")?
}
