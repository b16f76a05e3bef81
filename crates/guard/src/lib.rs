//! Request guard for Lexbridge.
//!
//! Everything a caller sends is untrusted. Before any value leaves the process
//! it passes through this crate: credentials are checked for format, strings
//! are stripped of markup and script-like fragments and capped in length, and
//! each client identity is admitted against the sliding-window rate limit.
//!
//! Nothing in here fails loudly. Checks return booleans, cleaned values or a
//! [`Rejection`] that the caller turns into its own failure signal.

#![deny(missing_docs)]

mod credential;
mod identity;
mod parameters;
mod redact;
mod request_guard;
mod sanitize;

pub use credential::validate_credential;
pub use identity::ClientIdentity;
pub use parameters::{sanitize_parameter_set, sanitize_parameter_set_with_limit};
pub use redact::redact;
pub use request_guard::{Admission, Rejection, RequestGuard};
pub use sanitize::{DEFAULT_MAX_LENGTH, sanitize, sanitize_with_limit};
