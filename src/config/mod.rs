//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to QueryBuilder, Transformer and UpstreamClient at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DatasetConfig, DatasetKind, FoodFacilityConfig, ListenerConfig, ObservabilityConfig,
    PaginationConfig, ProxyConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
