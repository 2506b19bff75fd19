//! doc-qa web server binary
//!
//! Run with: cargo run -p doc-qa --bin doc-qa-server

use std::path::PathBuf;

use clap::Parser;
use doc_qa::{config::QaConfig, server::QaServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Web UI for asking questions about a single document
#[derive(Parser, Debug)]
#[command(name = "doc-qa-server", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = QaConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Chunk size: {} chars ({:?})", config.chunking.max_chars, config.chunking.strategy);
    tracing::info!("  - PDF layout: {:?}", config.extraction.pdf_layout);

    let server = QaServer::new(config.clone())?;

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    match server.state().pipeline().llm().health_check().await {
        Ok(true) => tracing::info!("Ollama is running"),
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("  Start it with `ollama serve` and pull the model: ollama pull {}", config.llm.model);
        }
    }

    println!("\nServer starting...");
    println!("  UI: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
