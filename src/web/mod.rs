// src/web/mod.rs
//! Trigger surface: a liveness endpoint that performs no I/O and a
//! run-once endpoint wrapping the orchestrator.

use crate::config::WatchConfig;
use crate::orchestrator::{Orchestrator, RunSummary};
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use serde::Serialize;
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub summary: Option<RunSummary>,
    pub error: Option<String>,
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[post("/run")]
pub async fn run(config: &State<WatchConfig>) -> Json<RunResponse> {
    match Orchestrator::new(config.inner().clone()) {
        Ok(orchestrator) => {
            let summary = orchestrator.run().await;
            Json(RunResponse {
                success: true,
                summary: Some(summary),
                error: None,
            })
        }
        Err(e) => {
            error!("Failed to start run: {}", e);
            Json(RunResponse {
                success: false,
                summary: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[options("/<_..>")]
pub async fn preflight() -> Status {
    Status::Ok
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<RunResponse> {
    Json(RunResponse {
        success: false,
        summary: None,
        error: Some("Internal server error".to_string()),
    })
}

pub async fn start_web_server(config: WatchConfig, port: u16) -> Result<()> {
    info!("Starting jobwatch trigger server on port {}", port);

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(config)
        .register("/", catchers![internal_error])
        .mount("/", routes![health, run, preflight])
        .launch()
        .await
        .context("Trigger server failed")?;

    Ok(())
}
