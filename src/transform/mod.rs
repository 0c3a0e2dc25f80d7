//! Feature transformation subsystem.
//!
//! # Data Flow
//! ```text
//! upstream JSON array (Vec<Record>)
//!     → transformer.rs (per record, in order)
//!         → timestamp.rs (created_date → configured zone)
//!         → title.rs (AddressKind template + complaint sentence)
//!     → features.rs (geojson Feature / FeatureCollection, pretty JSON)
//! ```
//!
//! # Design Decisions
//! - One bad record fails the whole response; nothing is skipped silently
//! - Unparsable coordinates become 0.0 instead of failing

pub mod features;
pub mod timestamp;
pub mod title;
pub mod transformer;
pub mod types;

pub use features::{located_feature, point, to_pretty_json};
pub use title::{titleize, AddressKind};
pub use transformer::Transformer;
pub use types::{Record, TransformError};
