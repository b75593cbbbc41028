//! Error types and result aliases for sift.
//!
//! Every fallible operation in the workspace returns [`SiftResult`]. Errors are
//! contract violations detected eagerly at the point of failure; none of them
//! are transient, so callers never retry.

mod error;

pub use error::{SiftError, SiftResult};
