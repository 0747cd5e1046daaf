//! SOQL query building
//!
//! Query (reusable) and QueryBuilder (fluent), plus the filters and response
//! parsing they rely on.

pub mod builder;
pub mod filters;
pub mod result;

pub use builder::{Query, QueryBuilder};
pub use filters::{Filter, FilterValue};
pub use result::{QueryResponse, Record};
