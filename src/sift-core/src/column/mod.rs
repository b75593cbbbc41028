//! Arrow-backed columns and the read interface shared with derived views.

mod access;
#[allow(clippy::module_inception)]
mod column;

pub use access::{ColumnAccess, ColumnValues};
pub use column::{Column, NativeType};
