//! Core value model for sift.
//!
//! This crate provides the columnar data the filter engine reads:
//! - `DataType` and `Value` for the type system
//! - `Field` and `Schema` for column declarations
//! - `Column`, an arrow array of one supported type, and the `ColumnAccess`
//!   read interface
//! - `RecordBatch`, an arrow record batch checked against a sift schema
//!
//! Arrow arrays and record batches come in and go out without copying.

#![forbid(unsafe_code)]

mod arrow_conversion;
pub mod batch;
pub mod column;
pub mod schema;
pub mod types;

pub use batch::RecordBatch;
pub use column::{Column, ColumnAccess, ColumnValues, NativeType};
pub use schema::{Field, Schema, SchemaRef};
pub use types::{DataType, Value};
