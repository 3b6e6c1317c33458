//! authgate token service
//!
//! Runs the bundled token routes behind the authorization gate.

use authgate::{
    config::{LogFormat, load_config},
    gate::GateBuilder,
    server,
    transport::{HttpConfig, run_http_blocking},
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// authgate - JWT authorization gate for HTTP services
#[derive(Parser, Debug)]
#[command(name = "authgate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "AUTHGATE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "AUTHGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// HTTP server host; overrides `server.host`
    #[arg(long, env = "AUTHGATE_HTTP_HOST")]
    http_host: Option<String>,

    /// HTTP server port; overrides `server.port`
    #[arg(long, env = "AUTHGATE_HTTP_PORT")]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logging isn't up yet, so a config failure goes to stderr directly
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.logging.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting authgate");

    let gate = GateBuilder::from_config(&config.gate)
        .build()
        .inspect_err(|e| error!(error = %e, "Failed to build authorization gate"))?;

    let host = args.http_host.as_deref().unwrap_or(&config.server.host);
    let port = args.http_port.unwrap_or(config.server.port);
    let http_config = HttpConfig::from_host_port(host, port)
        .inspect_err(|e| error!(error = %e, "Invalid listen address"))?;

    run_http_blocking(server::router(gate), http_config).await
}
