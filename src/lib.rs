//! GeoJSON proxy for Socrata-style open-data APIs.
//!
//! Fetches a page of records from the upstream dataset, turns every record
//! into a GeoJSON `Feature` with a readable title, and advertises the next
//! page through a `Next-Page` header until the configured ceiling.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod query;
pub mod transform;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
