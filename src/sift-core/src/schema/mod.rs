//! Schema definitions: named, typed fields in a fixed order.

mod field;
#[allow(clippy::module_inception)]
mod schema;

pub use field::Field;
pub use schema::{Schema, SchemaRef};
