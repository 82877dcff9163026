//! HTTP server exposing the Gantt scheduling backend.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gantt_core::Core;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;

#[derive(Parser)]
#[command(name = "gantt-server", about = "Scheduling data backend for a Gantt chart frontend")]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Directory holding the SQLite database file.
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load the demo project into the database and exit.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gantt_core=debug,gantt_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    let core = Core::open(&cli.data_dir)
        .await
        .context("Failed to open database")?;

    if let Some(Command::Seed) = cli.command {
        core.seed_demo().await.context("Failed to seed database")?;
        return Ok(());
    }

    let app = routes::router(Arc::new(core));

    // Listens on IPv6 and IPv4.
    let mut addr = "[::]:3001".parse::<SocketAddr>()?;
    addr.set_port(cli.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://localhost:{}", cli.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
