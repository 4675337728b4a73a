use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use pixflow::api::handlers::{
    generate_auth_routes, generate_transform_routes, generate_workflow_routes,
};
use pixflow::config::AppConfig;
use pixflow::invoker::HttpInvoker;
use pixflow::secrets::SecretProvider;
use pixflow::workflow::WorkflowContext;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

#[rocket::main]
async fn main() -> Result<()> {
    init_logger();

    let config = AppConfig::load()?;
    info!(
        "dispatching backend operations via {}",
        config.invoker_base_url
    );

    let invoker = Arc::new(HttpInvoker::new(&config)?) as Arc<dyn pixflow::invoker::InvokeOperation>;
    let secrets = SecretProvider::from_config(&config)?;
    let context = WorkflowContext {
        invoker,
        secrets,
        config,
    };

    let _ = rocket::build()
        .manage(context)
        .mount("/", generate_workflow_routes())
        .mount("/", generate_auth_routes())
        .mount("/", generate_transform_routes())
        .launch()
        .await
        .context("rocket failed to launch")?;

    Ok(())
}
