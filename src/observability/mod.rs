//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, EnvFilter)
//!     → metrics.rs (counters, histograms → Prometheus scrape)
//!
//! Request spans come from tower_http's TraceLayer and carry x-request-id.
//! ```

pub mod logging;
pub mod metrics;
