//! Access to the bracket-hosting JSON API.
//!
//! [`ChallongeClient`] maps one method to one REST call. Calls are
//! sequential and each one is wrapped in a [`RetryPolicy`]: transport
//! failures, 429 and 5xx answers are retried with a fixed delay, anything
//! else is returned at once.

pub mod client;
pub mod errors;
pub mod retry;

pub use client::ChallongeClient;
pub use errors::{ApiError, ApiResult, Transient};
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};
