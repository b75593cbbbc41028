//! Type system for sift values and columns.

mod data_type;
mod value;

pub use data_type::DataType;
pub use value::Value;
