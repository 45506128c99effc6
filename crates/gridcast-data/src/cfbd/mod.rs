//! CollegeFootballData (CFBD) acquisition.
//!
//! Fetches the primary game list and the supplemental datasets for one
//! season. Requests are spaced by a rate limiter and retried with
//! exponential backoff on transient failures.

pub mod client;
pub mod retry;

pub use client::{CfbdClient, SeasonType};
pub use retry::RetryPolicy;
