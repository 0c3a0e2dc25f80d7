//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the GeoJSON proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, public URL).
    pub listener: ListenerConfig,

    /// Upstream open-data API settings.
    pub upstream: UpstreamConfig,

    /// Pagination ceiling.
    pub pagination: PaginationConfig,

    /// Which dataset is served and how records become features.
    pub dataset: DatasetConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Externally visible base URL used for `Next-Page` links.
    /// When unset, the base URL is derived from the inbound request headers.
    pub public_url: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            public_url: None,
        }
    }
}

/// Upstream open-data API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host of the upstream API (e.g., "https://data.cityofnewyork.us").
    pub target_host: String,

    /// Total timeout for one upstream fetch in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Honour HTTP(S)_PROXY environment variables for upstream calls.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target_host: "https://data.cityofnewyork.us".to_string(),
            timeout_secs: 30,
            connect_secs: 5,
            use_system_proxy: true,
        }
    }
}

/// Pagination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Largest `offset + limit` for which a `Next-Page` link is advertised.
    pub ceiling: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { ceiling: 10_000 }
    }
}

/// Kind of dataset served by this deployment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// 311 service requests, paginated through inbound `$` parameters.
    #[default]
    ServiceRequests,
    /// Mobile food facility permits, fetched with a fixed query.
    FoodFacilities,
}

/// Dataset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub kind: DatasetKind,

    /// Record field copied into the feature `id`.
    pub id_field: String,

    /// IANA time zone used for timestamps embedded in titles.
    pub time_zone: String,

    /// Food facility variant settings.
    pub food: FoodFacilityConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            kind: DatasetKind::ServiceRequests,
            id_field: "unique_key".to_string(),
            time_zone: "America/New_York".to_string(),
            food: FoodFacilityConfig::default(),
        }
    }
}

/// Food facility variant configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FoodFacilityConfig {
    /// Inbound route served by the proxy.
    pub route: String,

    /// Upstream dataset path.
    pub upstream_path: String,

    /// Only permits approved within this many days are requested.
    pub window_days: u32,

    /// Fixed `$limit` sent upstream.
    pub limit: u64,
}

impl Default for FoodFacilityConfig {
    fn default() -> Self {
        Self {
            route: "/food-trucks".to_string(),
            upstream_path: "/resource/rqzj-sfat.json".to_string(),
            window_days: 30,
            limit: 1000,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str("[pagination]\nceiling = 5000\n").unwrap();
        assert_eq!(config.pagination.ceiling, 5000);
        assert_eq!(config.dataset.kind, DatasetKind::ServiceRequests);
        assert_eq!(config.dataset.id_field, "unique_key");
        assert_eq!(config.upstream.target_host, "https://data.cityofnewyork.us");
    }

    #[test]
    fn test_food_dataset_kind() {
        let config: ProxyConfig = toml::from_str(
            "[dataset]\nkind = \"food_facilities\"\nid_field = \"objectid\"\n\n[dataset.food]\nwindow_days = 7\n",
        )
        .unwrap();
        assert_eq!(config.dataset.kind, DatasetKind::FoodFacilities);
        assert_eq!(config.dataset.food.window_days, 7);
        assert_eq!(config.dataset.food.route, "/food-trucks");
    }
}
