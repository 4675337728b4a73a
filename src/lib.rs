pub mod api;
pub mod common;
pub mod config;
pub mod invoker;
pub mod operations;
pub mod secrets;
pub mod token;
pub mod workflow;
