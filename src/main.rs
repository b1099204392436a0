mod charts;
mod config;
mod data;
mod error;
mod processing;
mod server;
mod state;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServerConfig;
use server::Server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    // Stdout carries the protocol, so logs go to stderr.
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("chartjs_mcp=info"));
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting {} v{}", config.server_name, env!("CARGO_PKG_VERSION"));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Server::new(config.server_name).serve(stdin.lock(), stdout.lock())?;
    Ok(())
}
