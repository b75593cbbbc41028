//! Typed, immutable columns backed by arrow arrays.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array};
use arrow::datatypes::DataType as ArrowDataType;

use common_error::{SiftError, SiftResult};

use super::ColumnAccess;
use crate::types::{DataType, Value};

/// Native Rust type a column can be built from.
pub trait NativeType: Copy + Into<Value> + std::fmt::Debug {
    /// Logical type of a column holding this native type.
    const DATA_TYPE: DataType;

    /// Build the matching column from optional values, `None` becoming null.
    fn column_from_options(values: Vec<Option<Self>>) -> Column;

    /// Build the matching column from non-null values.
    fn column_from_values(values: Vec<Self>) -> Column;
}

impl NativeType for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn column_from_options(values: Vec<Option<Self>>) -> Column {
        Column::Int64(Int64Array::from(values))
    }

    fn column_from_values(values: Vec<Self>) -> Column {
        Column::Int64(Int64Array::from(values))
    }
}

impl NativeType for f64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn column_from_options(values: Vec<Option<Self>>) -> Column {
        Column::Float64(Float64Array::from(values))
    }

    fn column_from_values(values: Vec<Self>) -> Column {
        Column::Float64(Float64Array::from(values))
    }
}

impl NativeType for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn column_from_options(values: Vec<Option<Self>>) -> Column {
        Column::Bool(BooleanArray::from(values))
    }

    fn column_from_values(values: Vec<Self>) -> Column {
        Column::Bool(BooleanArray::from(values))
    }
}

/// An immutable, typed column.
///
/// Each variant owns an arrow array; validity comes from the array's null
/// buffer. Cloning and converting to or from arrow share the underlying
/// buffers instead of copying them.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 64-bit signed integers.
    Int64(Int64Array),
    /// 64-bit floats.
    Float64(Float64Array),
    /// Booleans.
    Bool(BooleanArray),
}

impl Column {
    /// Create a column from non-null native values.
    pub fn from_values<T: NativeType>(values: Vec<T>) -> Self {
        T::column_from_values(values)
    }

    /// Create a column from optional native values.
    pub fn from_options<T, I>(values: I) -> Self
    where
        T: NativeType,
        I: IntoIterator<Item = Option<T>>,
    {
        T::column_from_options(values.into_iter().collect())
    }

    /// Wrap an arrow array without copying its buffers.
    ///
    /// Accepts `Int64`, `Float64` and `Boolean` arrays; anything else fails
    /// with `TypeMismatch`.
    pub fn try_from_arrow(array: &dyn Array) -> SiftResult<Self> {
        match array.data_type() {
            ArrowDataType::Int64 => Ok(Self::Int64(downcast::<Int64Array>(array)?.clone())),
            ArrowDataType::Float64 => Ok(Self::Float64(downcast::<Float64Array>(array)?.clone())),
            ArrowDataType::Boolean => Ok(Self::Bool(downcast::<BooleanArray>(array)?.clone())),
            other => Err(SiftError::type_mismatch(format!(
                "cannot build a column from arrow type {other}"
            ))),
        }
    }

    /// Shared arrow array holding this column.
    pub fn to_arrow(&self) -> ArrayRef {
        match self {
            Self::Int64(arr) => Arc::new(arr.clone()),
            Self::Float64(arr) => Arc::new(arr.clone()),
            Self::Bool(arr) => Arc::new(arr.clone()),
        }
    }

    /// Borrow the backing array.
    pub fn as_array(&self) -> &dyn Array {
        match self {
            Self::Int64(arr) => arr,
            Self::Float64(arr) => arr,
            Self::Bool(arr) => arr,
        }
    }

    /// Number of null rows.
    pub fn null_count(&self) -> usize {
        self.as_array().null_count()
    }

    pub fn as_int64(&self) -> Option<&Int64Array> {
        match self {
            Self::Int64(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_float64(&self) -> Option<&Float64Array> {
        match self {
            Self::Float64(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&BooleanArray> {
        match self {
            Self::Bool(arr) => Some(arr),
            _ => None,
        }
    }
}

impl ColumnAccess for Column {
    fn data_type(&self) -> DataType {
        match self {
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::Bool(_) => DataType::Bool,
        }
    }

    fn len(&self) -> usize {
        self.as_array().len()
    }

    fn get(&self, row: usize) -> SiftResult<Value> {
        if row >= self.len() {
            return Err(SiftError::index_out_of_bounds(format!(
                "row {row} out of bounds for column of length {}",
                self.len()
            )));
        }
        if self.as_array().is_null(row) {
            return Ok(Value::Null);
        }
        Ok(match self {
            Self::Int64(arr) => Value::Int64(arr.value(row)),
            Self::Float64(arr) => Value::Float64(arr.value(row)),
            Self::Bool(arr) => Value::Bool(arr.value(row)),
        })
    }

    fn as_arrow(&self) -> Option<&dyn Array> {
        Some(self.as_array())
    }
}

fn downcast<T: Array + 'static>(array: &dyn Array) -> SiftResult<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        SiftError::internal(format!(
            "arrow array of type {} failed to downcast",
            array.data_type()
        ))
    })
}
