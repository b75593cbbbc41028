//! Logical data types.

use serde::{Deserialize, Serialize};

/// Logical type of a column, literal or expression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of an untyped null. Never a column type.
    Null,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
}

impl DataType {
    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// Check if this type is boolean.
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Check if columns may be declared with this type.
    pub const fn is_column_type(&self) -> bool {
        !matches!(self, Self::Null)
    }

    /// Width in bytes of one value of this type in a column buffer.
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Bool => 1,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Get the display name for this type.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int64 => "Int64",
            Self::Float64 => "Float64",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
