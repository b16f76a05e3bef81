//! Rate limiting functionality for Lexbridge.
//!
//! Every upstream call is admitted against a sliding window of recent calls
//! kept per client identity. The window lives in process memory and is lost
//! on restart.

#![deny(missing_docs)]

mod error;
mod manager;
mod storage;

pub use error::RateLimitError;
pub use manager::RateLimitManager;
pub use storage::{InMemoryStorage, RateLimitResult, RateLimitStorage};
