//! Outbound client for the CourtListener REST API.
//!
//! One tool invocation maps to at most one bounded-time `GET`. Whatever goes
//! wrong on the way, a malformed credential, a throttled caller, a dead
//! network, a slow or failing upstream, an unparseable body, the caller only
//! ever sees [`Unavailable`]. The reason is written to the local log and
//! nowhere else, so the server cannot be used to probe credentials or the
//! upstream infrastructure.

#![deny(missing_docs)]

mod client;
mod error;
mod normalize;
mod page;

pub use client::UpstreamClient;
pub use error::Unavailable;
pub use normalize::normalize;
pub use page::Page;
