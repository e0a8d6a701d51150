// src/main.rs
use anyhow::Result;
use clap::{Parser, Subcommand};
use job_watcher::{start_web_server, Orchestrator, WatchConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(about = "Watch job-listing searches and notify on new matches")]
struct Cli {
    #[command(subcommand)]
    command: Option<WatchCommand>,
}

#[derive(Subcommand)]
enum WatchCommand {
    /// Start the HTTP trigger server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one crawl and exit
    RunOnce,
}

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("job_watcher=info,jobwatch=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    let config = WatchConfig::load()?;

    match cli.command.unwrap_or(WatchCommand::Serve { port: None }) {
        WatchCommand::Serve { port } => {
            let port = port
                .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
                .unwrap_or(8080);
            start_web_server(config, port).await
        }
        WatchCommand::RunOnce => {
            let orchestrator = Orchestrator::new(config)?;
            let summary = orchestrator.run().await;
            info!(
                "{} new postings across {} categories",
                summary.new_postings, summary.categories
            );
            Ok(())
        }
    }
}
