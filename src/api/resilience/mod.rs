//! Retry handling for transient API failures

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy, RetryableError};
