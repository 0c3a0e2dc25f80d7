//! GeoJSON proxy (v1)
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http::server ──▶ query::builder            │
//!                             │        │            ($ params, Next-Page)    │
//!                             │        ▼                                     │
//!                             │  http::upstream ────────────────────────────┼──▶ Open-data API
//!                             │        │                                     │
//!                             │        ▼                                     │
//!     Client Response         │  transform (titles, GeoJSON)                 │
//!     ◀───────────────────────┼── FeatureCollection + Next-Page             │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use geojson_proxy::lifecycle::{signals, startup, Shutdown, StartupError};
use geojson_proxy::observability::logging;
use geojson_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "geojson-proxy")]
#[command(about = "Serve open-data records as paginated GeoJSON", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();

    // The log level lives in the config file, so read it before tracing is up.
    let loaded = startup::configure(cli.config.as_deref());
    let observability = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_default();
    logging::init_tracing(&observability);

    tracing::info!("geojson-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let config = loaded.inspect_err(|e| tracing::error!(error = %e, "Configuration rejected"))?;
    startup::report(cli.config.as_deref(), &config);
    startup::start_metrics(&config)?;
    let listener = startup::bind(&config).await?;

    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::trigger_on_termination(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
