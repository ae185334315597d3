//! Gistbin Serve - HTTP server for creating and reading gists.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::Request;
use clap::Parser;
use gistbin_core::metrics::{init_metrics, start_metrics_server};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gistbin_serve::{AppState, Config, router};

/// Gist and short URL server.
#[derive(Parser, Debug)]
#[command(name = "gistbin-serve")]
#[command(about = "HTTP server for creating and reading gists", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Path to the JSON configuration file. Created if missing.
    #[arg(long, env = "GISTBIN_CONFIG", default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(&args.config)?;
    let bind_addr = config.bind_addr();

    if config.metrics_port > 0 {
        let handle = init_metrics();
        start_metrics_server(config.metrics_port, handle).await?;
    }

    let state = AppState::open(config)?;

    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
