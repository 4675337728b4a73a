pub mod auth;
pub mod transform;
pub mod workflows;

use rocket::{Route, routes};

pub fn generate_workflow_routes() -> Vec<Route> {
    routes![
        workflows::upload_workflow,
        workflows::delete_workflow,
        workflows::list_workflow
    ]
}

pub fn generate_auth_routes() -> Vec<Route> {
    routes![auth::issue_token, auth::check_token]
}

pub fn generate_transform_routes() -> Vec<Route> {
    routes![transform::resize_image]
}
