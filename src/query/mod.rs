//! Query building subsystem.
//!
//! # Data Flow
//! ```text
//! inbound query string
//!     → builder.rs (QueryParams, `$` filtering, upstream URL)
//!     → builder.rs (PageCursor advance, ceiling check → Next-Page URL)
//!
//! food facility variant:
//!     today's date → static_query.rs (fixed $where/$order/$limit)
//! ```

pub mod builder;
pub mod static_query;

pub use builder::{
    build_next_page_params, build_url, PageCursor, ParameterError, QueryBuilder, QueryParams,
    DEFAULT_LIMIT, DEFAULT_OFFSET,
};
pub use static_query::FoodFacilityQuery;
