//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (request ID, base URL for Next-Page)
//!     → upstream.rs (GET against the open-data API)
//!     → server.rs (FeatureCollection body + Next-Page header)
//!     → Send to client
//! ```

pub mod request;
pub mod server;
pub mod upstream;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer, NEXT_PAGE};
pub use upstream::{UpstreamClient, UpstreamError};
