//! Control-panel HTTP server for browser recording sessions.
//!
//! Exposes a small JSON API to start and stop a recording and to fetch the
//! generated test script.

mod api;
mod session;
mod types;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::{GeneratorCommand, SessionManager};

#[derive(Parser, Debug)]
#[command(name = "webscribe-server", about = "Recording control server")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Enable permissive CORS (for a control panel served from another origin)
    #[arg(long)]
    cors: bool,

    /// Override the code generator command line
    #[arg(long)]
    generator: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let generator = match args.generator.as_deref() {
        Some(override_line) => GeneratorCommand::parse(override_line)
            .context("generator override must contain a program name")?,
        None => GeneratorCommand::default(),
    };

    let manager = Arc::new(SessionManager::new(generator));

    let mut app = Router::new()
        .route("/api/health", get(api::health))
        .route("/api/start", post(api::start_recording))
        .route("/api/stop", post(api::stop_recording))
        .route("/api/code", get(api::get_code))
        .with_state(manager);

    if args.cors {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("listening on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
