//! Configuration, retry and request pacing.
//!
//! - [`HokusaiConfig`] layers the bundled `hokusai.toml` under user overrides.
//! - [`with_backoff`] is the single classify-and-backoff utility every
//!   external call goes through. Only transient failures are retried;
//!   rate limits, safety blocks and permanent errors surface immediately.
//! - [`RequestLimiter`] optionally paces requests per minute.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod retry;

pub use config::{BatchConfig, GenerationConfig, HokusaiConfig, StorageConfig};
pub use limiter::RequestLimiter;
pub use retry::{RetryPolicy, with_backoff, with_backoff_classified};
