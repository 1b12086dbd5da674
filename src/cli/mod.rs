use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "thomas-crud")]
#[command(about = "Cliente/Logradouro CRUD API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides API_PORT/PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Use the in-process store instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, memory } => serve(config, port, memory).await,
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config).await?;
            DatabaseManager::migrate(&pool).await?;
            pool.close().await;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, port: Option<u16>, memory: bool) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.api.port);
    tracing::info!("Starting API in {:?} mode", config.environment);

    let state = if memory {
        tracing::warn!("Using in-process store; data is lost on exit");
        AppState::in_memory(config)?
    } else {
        let pool = DatabaseManager::connect(&config).await?;
        AppState::postgres(config, pool)?
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, crate::app::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
