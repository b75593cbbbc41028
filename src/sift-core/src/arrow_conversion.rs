//! Conversions between sift's type declarations and arrow's.

use arrow::datatypes::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema};

use common_error::{SiftError, SiftResult};

use crate::schema::{Field, Schema};
use crate::types::DataType;

impl DataType {
    /// Map an arrow type onto a sift type.
    ///
    /// Only `Null`, `Boolean`, `Int64` and `Float64` are representable; any
    /// other arrow type fails with `TypeMismatch`. No widening is applied.
    pub fn try_from_arrow(data_type: &ArrowDataType) -> SiftResult<Self> {
        match data_type {
            ArrowDataType::Null => Ok(Self::Null),
            ArrowDataType::Boolean => Ok(Self::Bool),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::Float64 => Ok(Self::Float64),
            other => Err(SiftError::type_mismatch(format!(
                "arrow type {other} has no sift equivalent"
            ))),
        }
    }

    /// Arrow type with the same layout.
    pub fn to_arrow(&self) -> ArrowDataType {
        match self {
            Self::Null => ArrowDataType::Null,
            Self::Bool => ArrowDataType::Boolean,
            Self::Int64 => ArrowDataType::Int64,
            Self::Float64 => ArrowDataType::Float64,
        }
    }
}

impl Field {
    /// Convert an arrow field.
    pub fn try_from_arrow(field: &ArrowField) -> SiftResult<Self> {
        let data_type = DataType::try_from_arrow(field.data_type())?;
        Ok(Self::new(field.name().clone(), data_type).with_nullable(field.is_nullable()))
    }

    /// Convert into an arrow field.
    pub fn to_arrow(&self) -> ArrowField {
        ArrowField::new(self.name.clone(), self.data_type.to_arrow(), self.nullable)
    }
}

impl Schema {
    /// Convert an arrow schema. Field metadata is dropped.
    pub fn try_from_arrow(schema: &ArrowSchema) -> SiftResult<Self> {
        let fields = schema
            .fields()
            .iter()
            .map(|f| Field::try_from_arrow(f))
            .collect::<SiftResult<Vec<_>>>()?;
        Self::try_new(fields)
    }

    /// Convert into an arrow schema.
    pub fn to_arrow(&self) -> ArrowSchema {
        ArrowSchema::new(self.fields().iter().map(Field::to_arrow).collect::<Vec<_>>())
    }
}
