//! Salesforce API access
//!
//! SOAP login, a REST client for queries and multi-record inserts, SOQL
//! building, and the `PlatformSession` trait the loader is written against.

pub mod auth;
pub mod client;
pub mod constants;
pub mod query;
pub mod resilience;
pub mod session;

pub use auth::LoginSession;
pub use client::SalesforceClient;
pub use query::{Filter, FilterValue, Query, QueryBuilder, QueryResponse, Record};
pub use resilience::{RetryConfig, RetryPolicy, RetryableError};
pub use session::{InsertError, InsertResult, PlatformSession, SessionError};
