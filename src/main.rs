use std::process::ExitCode;

use clap::Parser;

use argon_proxy::config::{Cli, ObservabilityConfig, ProxyConfig};
use argon_proxy::lifecycle::{signals, startup, Shutdown};
use argon_proxy::{net, observability, samples, HttpServer};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_configs {
        for name in samples::names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            observability::logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    observability::logging::init(&config.observability);
    tracing::info!("argon-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = net::listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr()?;

    let server = HttpServer::new(config)?;
    startup::log_startup(server.config(), local_addr);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
