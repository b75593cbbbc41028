//! Core error types for sift.

use thiserror::Error;

/// Result type alias using `SiftError`.
pub type SiftResult<T> = std::result::Result<T, SiftError>;

/// Core error type for sift operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SiftError {
    /// Function name is not present in the function registry.
    #[error("UnknownFunction: {0}")]
    UnknownFunction(String),

    /// Operand or result types do not satisfy a function signature.
    #[error("TypeMismatch: {0}")]
    TypeMismatch(String),

    /// A condition root does not evaluate to a boolean.
    #[error("NotBoolean: {0}")]
    NotBoolean(String),

    /// Field reference could not be resolved by name.
    #[error("UnknownField: {0}")]
    UnknownField(String),

    /// Batch or schema layout disagrees with what was declared.
    #[error("SchemaMismatch: {0}")]
    SchemaMismatch(String),

    /// Selection vector is full.
    #[error("CapacityExceeded: {0}")]
    CapacityExceeded(String),

    /// Capacity or index does not fit the selection vector's index width.
    #[error("CapacityTooLarge: {0}")]
    CapacityTooLarge(String),

    /// Position outside the addressed column or vector.
    #[error("IndexOutOfBounds: {0}")]
    IndexOutOfBounds(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Memory accounting refused a reservation.
    #[error("ResourceExhausted: {0}")]
    ResourceExhausted(String),

    /// Internal error (bug in sift).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// Arrow error.
    #[error("ArrowError: {0}")]
    ArrowError(#[from] arrow_schema::ArrowError),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl SiftError {
    /// Create a new `UnknownFunction` error.
    pub fn unknown_function<S: Into<String>>(msg: S) -> Self {
        Self::UnknownFunction(msg.into())
    }

    /// Create a new `TypeMismatch` error.
    pub fn type_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Create a new `NotBoolean` error.
    pub fn not_boolean<S: Into<String>>(msg: S) -> Self {
        Self::NotBoolean(msg.into())
    }

    /// Create a new `UnknownField` error.
    pub fn unknown_field<S: Into<String>>(msg: S) -> Self {
        Self::UnknownField(msg.into())
    }

    /// Create a new `SchemaMismatch` error.
    pub fn schema_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Create a new `CapacityExceeded` error.
    pub fn capacity_exceeded<S: Into<String>>(msg: S) -> Self {
        Self::CapacityExceeded(msg.into())
    }

    /// Create a new `CapacityTooLarge` error.
    pub fn capacity_too_large<S: Into<String>>(msg: S) -> Self {
        Self::CapacityTooLarge(msg.into())
    }

    /// Create a new `IndexOutOfBounds` error.
    pub fn index_out_of_bounds<S: Into<String>>(msg: S) -> Self {
        Self::IndexOutOfBounds(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a resource exhausted error.
    pub fn resource_exhausted<S: Into<String>>(msg: S) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// Short, stable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownFunction(_) => "UnknownFunction",
            Self::TypeMismatch(_) => "TypeMismatch",
            Self::NotBoolean(_) => "NotBoolean",
            Self::UnknownField(_) => "UnknownField",
            Self::SchemaMismatch(_) => "SchemaMismatch",
            Self::CapacityExceeded(_) => "CapacityExceeded",
            Self::CapacityTooLarge(_) => "CapacityTooLarge",
            Self::IndexOutOfBounds(_) => "IndexOutOfBounds",
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::ResourceExhausted(_) => "ResourceExhausted",
            Self::InternalError(_) => "InternalError",
            Self::ArrowError(_) => "ArrowError",
            Self::SerdeJsonError(_) => "SerdeJsonError",
        }
    }
}

/// Ensure a condition holds, returning the named error variant if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::SiftError::$variant(format!($($msg)*)));
        }
    };
}

/// Return early with a `TypeMismatch`.
#[macro_export]
macro_rules! type_err {
    ($($arg:tt)*) => {
        return Err($crate::SiftError::TypeMismatch(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_capacity(capacity: usize) -> SiftResult<usize> {
        ensure!(capacity <= 10, CapacityTooLarge: "capacity {} exceeds {}", capacity, 10);
        Ok(capacity)
    }

    fn reject_string() -> SiftResult<()> {
        type_err!("expected {}, got {}", "Int64", "String")
    }

    #[test]
    fn test_error_display() {
        let err = SiftError::type_mismatch("expected Int64, got Bool");
        assert_eq!(err.to_string(), "TypeMismatch: expected Int64, got Bool");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(SiftError::not_boolean("x").kind(), "NotBoolean");
        assert_eq!(SiftError::capacity_exceeded("x").kind(), "CapacityExceeded");
        assert_eq!(SiftError::index_out_of_bounds("x").kind(), "IndexOutOfBounds");
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(checked_capacity(3).unwrap(), 3);
        let err = checked_capacity(11).unwrap_err();
        assert!(matches!(err, SiftError::CapacityTooLarge(_)));
        assert_eq!(err.to_string(), "CapacityTooLarge: capacity 11 exceeds 10");
    }

    #[test]
    fn test_type_err_macro() {
        let err = reject_string().unwrap_err();
        assert!(matches!(err, SiftError::TypeMismatch(_)));
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: SiftError = parse.unwrap_err().into();
        assert_eq!(err.kind(), "SerdeJsonError");
    }
}
