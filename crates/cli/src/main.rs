use clap::{Parser, Subcommand};
use ferrous_route_domain::{CliOverrides, Config};
use ferrous_route_infrastructure::dns::{DnsServer, TracingObserver};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

mod bootstrap;
mod di;
mod lookup;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-route")]
#[command(version)]
#[command(about = "Ferrous Route - pattern-routed DNS proxy")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long, global = true)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Per-upstream timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the UDP and TCP listeners (default)
    Serve,
    /// Resolve one question against the configured upstreams
    Lookup {
        /// Question fields, e.g. name=example.com type=AAAA
        #[arg(value_name = "FIELD=VALUE", required = true)]
        fields: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        timeout_ms: cli.timeout,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    let services = di::DnsServices::new(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, services).await,
        Command::Lookup { fields } => lookup::run(&services.resolver, &fields).await,
    }
}

async fn serve(config: &Config, services: di::DnsServices) -> anyhow::Result<()> {
    info!("Starting Ferrous Route v{}", env!("CARGO_PKG_VERSION"));

    let dns_server = Arc::new(DnsServer::new(services.router, Arc::new(TracingObserver)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for shutdown signal");
                // Keep the sender alive so listeners are not stopped by its drop.
                std::future::pending::<()>().await;
            }
        }
    });

    server::start_dns_server(&config.server, dns_server, shutdown_rx).await?;

    info!("Server shutdown complete");
    Ok(())
}
