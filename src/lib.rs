//! Sift - row filtering over in-memory columnar batches
//!
//! Sift compiles boolean conditions built from field references, literals and
//! registered functions, evaluates them against record batches, and records
//! the matching row positions in compact selection vectors that drive
//! zero-copy views of any column.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export member crates
pub use common_config as config;
pub use common_error as error;
pub use sift_core as core;
pub use sift_engine as engine;
pub use sift_expr as expr;

/// Sift version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
