// src/lib.rs
pub mod classify;
pub mod config;
pub mod fetch;
pub mod identity;
pub mod notify;
pub mod orchestrator;
pub mod parse;
pub mod pipeline;
pub mod rotation;
pub mod store;
pub mod types;
pub mod web;

pub use config::WatchConfig;
pub use orchestrator::{Orchestrator, RunSummary};
pub use web::start_web_server;
