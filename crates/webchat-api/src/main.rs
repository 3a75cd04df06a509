//! WebChat AI core: HTTP API and operator CLI entry point.
//!
//! Binary name: `webchat-ai`
//!
//! Loads `.env`, parses CLI arguments, reads the service configuration, then
//! dispatches to a memory command or starts the HTTP server.

mod cli;
mod http;
mod state;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, MemoryAction};
use state::AppState;
use webchat_infra::config::ServiceConfig;
use webchat_observe::tracing_setup::{init_tracing_with_filter, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Shell completions need neither config nor tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "webchat-ai", &mut std::io::stdout());
        return Ok(());
    }

    let config = ServiceConfig::from_env().context("invalid configuration")?;

    init_tracing_with_filter(config.enable_otel, cli.log_filter())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli, config).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, mut config: ServiceConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config, cli.quiet).await?;
        }

        Commands::Memory { action } => {
            let store = state::open_store(&config).await?;
            match action {
                MemoryAction::List { user, limit } => {
                    cli::memory::list_memories(&store, &user, limit, cli.json).await?;
                }
                MemoryAction::Add {
                    user,
                    session,
                    actor,
                    text,
                } => {
                    cli::memory::add_memory(&store, &user, &session, actor, &text, cli.json)
                        .await?;
                }
                MemoryAction::Block { user, limit } => {
                    cli::memory::print_block(&store, &user, limit, cli.json).await?;
                }
            }
        }

        // Handled in main before config is loaded
        Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn serve(config: ServiceConfig, quiet: bool) -> anyhow::Result<()> {
    let state = AppState::init(&config).await?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, model = %config.model, "WebChat AI listening");
    if !quiet {
        println!(
            "  {} WebChat AI listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let timeout = config.request_timeout_secs.map(Duration::from_secs);
    let router = http::router::build_router(state, timeout);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
