//! Startup orchestration.
//!
//! Config is loaded and validated first, then the metrics exporter, then the
//! listener. Any failure here is fatal.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ProxyConfig};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),

    #[error("invalid metrics address '{address}': {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Load the configuration file, or the defaults when no path is given.
///
/// Runs before tracing is installed, since the log level comes from the
/// loaded file; call [`report`] once logging is up.
pub fn configure(path: Option<&Path>) -> Result<ProxyConfig, StartupError> {
    Ok(load_config(path)?)
}

/// Log the effective configuration.
pub fn report(path: Option<&Path>, config: &ProxyConfig) {
    tracing::info!(
        path = ?path,
        bind_address = %config.listener.bind_address,
        target_host = %config.upstream.target_host,
        dataset = ?config.dataset.kind,
        ceiling = config.pagination.ceiling,
        "Configuration loaded"
    );
}

/// Start the metrics exporter if enabled.
pub fn start_metrics(config: &ProxyConfig) -> Result<(), StartupError> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }
    let address = &config.observability.metrics_address;
    let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
        address: address.clone(),
        source,
    })?;
    metrics::init_metrics(addr)?;
    Ok(())
}

/// Bind the inbound listener.
pub async fn bind(config: &ProxyConfig) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(listener)
}
