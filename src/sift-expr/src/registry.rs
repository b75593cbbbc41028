//! Function registry: name -> signatures, each bound to a builtin kernel.
//!
//! The set of kernels is closed. The table of signatures is open: callers may
//! register more names or overloads on a registry they own, but once the
//! registry is shared behind an `Arc` it can no longer change, so nothing is
//! registered while an evaluation is running.

use std::collections::HashMap;
use std::sync::Arc;

use common_error::{SiftError, SiftResult};
use sift_core::{DataType, Value};

/// Builtin function names.
pub mod builtin {
    /// Addition.
    pub const ADD: &str = "add";
    /// Subtraction.
    pub const SUBTRACT: &str = "subtract";
    /// Multiplication.
    pub const MULTIPLY: &str = "multiply";
    /// Division.
    pub const DIVIDE: &str = "divide";
    /// Remainder of truncated division.
    pub const MOD: &str = "mod";
    /// Arithmetic negation.
    pub const NEGATIVE: &str = "negative";
    /// Equality.
    pub const EQUAL: &str = "equal";
    /// Inequality.
    pub const NOT_EQUAL: &str = "not_equal";
    /// Less than.
    pub const LESS_THAN: &str = "less_than";
    /// Less than or equal.
    pub const LESS_THAN_OR_EQUAL_TO: &str = "less_than_or_equal_to";
    /// Greater than.
    pub const GREATER_THAN: &str = "greater_than";
    /// Greater than or equal.
    pub const GREATER_THAN_OR_EQUAL_TO: &str = "greater_than_or_equal_to";
    /// Boolean negation.
    pub const NOT: &str = "not";
    /// Boolean conjunction.
    pub const AND: &str = "and";
    /// Boolean disjunction.
    pub const OR: &str = "or";
    /// Null test.
    pub const IS_NULL: &str = "isnull";
    /// Non-null test.
    pub const IS_NOT_NULL: &str = "isnotnull";
}

/// How a function treats null operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullHandling {
    /// Any null operand makes the result null. The kernel never sees nulls.
    Propagate,
    /// The kernel receives nulls and decides the result itself.
    Internal,
}

/// Evaluation rule behind a function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Sum; integer overflow wraps.
    Add,
    /// Difference; integer overflow wraps.
    Subtract,
    /// Product; integer overflow wraps.
    Multiply,
    /// Division; a zero divisor yields null.
    Divide,
    /// Remainder with the sign of the dividend; a zero divisor yields null.
    Mod,
    /// Arithmetic negation; `i64::MIN` wraps to itself.
    Negative,
    /// Equality of two same-typed operands. NaN equals nothing.
    Equal,
    /// Negated equality.
    NotEqual,
    /// Strict ordering; false when either operand is NaN.
    LessThan,
    /// Non-strict ordering; false when either operand is NaN.
    LessThanOrEqual,
    /// Strict ordering, reversed.
    GreaterThan,
    /// Non-strict ordering, reversed.
    GreaterThanOrEqual,
    /// Boolean negation.
    Not,
    /// Kleene AND: false dominates null, null dominates true.
    And,
    /// Kleene OR: true dominates null, null dominates false.
    Or,
    /// True exactly when the operand is null. Never null itself.
    IsNull,
    /// True exactly when the operand is not null. Never null itself.
    IsNotNull,
}

impl Kernel {
    /// Null handling this kernel is written for.
    pub const fn null_handling(&self) -> NullHandling {
        match self {
            Self::And | Self::Or | Self::IsNull | Self::IsNotNull => NullHandling::Internal,
            _ => NullHandling::Propagate,
        }
    }

    /// Check that this kernel can run with the given operand and result types.
    pub fn accepts(&self, arg_types: &[DataType], return_type: DataType) -> bool {
        use DataType::{Bool, Float64, Int64};
        match (self, arg_types) {
            (
                Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Mod,
                [l, r],
            ) => l == r && l.is_numeric() && return_type == *l,
            (Self::Negative, [t]) => t.is_numeric() && return_type == *t,
            (Self::Equal | Self::NotEqual, [l, r]) => {
                l == r && matches!(l, Bool | Int64 | Float64) && return_type == Bool
            }
            (
                Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual,
                [l, r],
            ) => l == r && l.is_numeric() && return_type == Bool,
            (Self::Not, [Bool]) | (Self::And | Self::Or, [Bool, Bool]) => return_type == Bool,
            (Self::IsNull | Self::IsNotNull, [t]) => t.is_column_type() && return_type == Bool,
            _ => false,
        }
    }

    /// Apply the kernel to one row's operands.
    ///
    /// Operands have already been checked against the signature, so a shape
    /// this kernel cannot handle is an internal error.
    pub fn invoke(&self, args: &[Value]) -> SiftResult<Value> {
        use Value::{Bool, Float64, Int64, Null};
        let result = match (self, args) {
            (Self::Add, [Int64(a), Int64(b)]) => Int64(a.wrapping_add(*b)),
            (Self::Add, [Float64(a), Float64(b)]) => Float64(a + b),
            (Self::Subtract, [Int64(a), Int64(b)]) => Int64(a.wrapping_sub(*b)),
            (Self::Subtract, [Float64(a), Float64(b)]) => Float64(a - b),
            (Self::Multiply, [Int64(a), Int64(b)]) => Int64(a.wrapping_mul(*b)),
            (Self::Multiply, [Float64(a), Float64(b)]) => Float64(a * b),
            (Self::Divide | Self::Mod, [Int64(_), Int64(0)]) => Null,
            (Self::Divide | Self::Mod, [Float64(_), Float64(b)]) if *b == 0.0 => Null,
            (Self::Divide, [Int64(a), Int64(b)]) => Int64(a.wrapping_div(*b)),
            (Self::Divide, [Float64(a), Float64(b)]) => Float64(a / b),
            (Self::Mod, [Int64(a), Int64(b)]) => Int64(a.wrapping_rem(*b)),
            (Self::Mod, [Float64(a), Float64(b)]) => Float64(a % b),
            (Self::Negative, [Int64(a)]) => Int64(a.wrapping_neg()),
            (Self::Negative, [Float64(a)]) => Float64(-a),

            (Self::Equal, [a, b]) => Bool(values_equal(a, b)?),
            (Self::NotEqual, [a, b]) => Bool(!values_equal(a, b)?),
            (Self::LessThan, [a, b]) => Bool(compare(a, b)?.is_some_and(|o| o.is_lt())),
            (Self::LessThanOrEqual, [a, b]) => Bool(compare(a, b)?.is_some_and(|o| o.is_le())),
            (Self::GreaterThan, [a, b]) => Bool(compare(a, b)?.is_some_and(|o| o.is_gt())),
            (Self::GreaterThanOrEqual, [a, b]) => {
                Bool(compare(a, b)?.is_some_and(|o| o.is_ge()))
            }

            (Self::Not, [Bool(a)]) => Bool(!a),
            (Self::And, [a, b]) => match (a.as_bool(), b.as_bool()) {
                (Some(false), _) | (_, Some(false)) => Bool(false),
                (Some(true), Some(true)) => Bool(true),
                _ => Null,
            },
            (Self::Or, [a, b]) => match (a.as_bool(), b.as_bool()) {
                (Some(true), _) | (_, Some(true)) => Bool(true),
                (Some(false), Some(false)) => Bool(false),
                _ => Null,
            },
            (Self::IsNull, [a]) => Bool(a.is_null()),
            (Self::IsNotNull, [a]) => Bool(!a.is_null()),

            _ => {
                return Err(SiftError::internal(format!(
                    "kernel {self:?} cannot be applied to {args:?}"
                )))
            }
        };
        Ok(result)
    }
}

fn values_equal(a: &Value, b: &Value) -> SiftResult<bool> {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int64(a), Value::Int64(b)) => Ok(a == b),
        (Value::Float64(a), Value::Float64(b)) => Ok(a == b),
        _ => Err(SiftError::internal(format!(
            "cannot compare {} with {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// `None` when the operands are unordered (NaN).
fn compare(a: &Value, b: &Value) -> SiftResult<Option<std::cmp::Ordering>> {
    match (a, b) {
        (Value::Int64(a), Value::Int64(b)) => Ok(Some(a.cmp(b))),
        (Value::Float64(a), Value::Float64(b)) => Ok(a.partial_cmp(b)),
        _ => Err(SiftError::internal(format!(
            "cannot order {} against {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// One overload of a named function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    name: String,
    arg_types: Vec<DataType>,
    return_type: DataType,
    kernel: Kernel,
}

impl FunctionSignature {
    /// Describe an overload.
    ///
    /// Fails with `TypeMismatch` if `kernel` cannot run with these types.
    pub fn try_new(
        name: impl Into<String>,
        arg_types: Vec<DataType>,
        return_type: DataType,
        kernel: Kernel,
    ) -> SiftResult<Self> {
        let name = name.into();
        if !kernel.accepts(&arg_types, return_type) {
            return Err(SiftError::type_mismatch(format!(
                "kernel {kernel:?} does not accept {name}({}) -> {return_type}",
                type_list(&arg_types)
            )));
        }
        Ok(Self {
            name,
            arg_types,
            return_type,
            kernel,
        })
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared operand types.
    pub fn arg_types(&self) -> &[DataType] {
        &self.arg_types
    }

    /// Declared result type.
    pub const fn return_type(&self) -> DataType {
        self.return_type
    }

    /// Evaluation rule.
    pub const fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Null handling of the kernel.
    pub const fn null_handling(&self) -> NullHandling {
        self.kernel.null_handling()
    }
}

impl std::fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) -> {}",
            self.name,
            type_list(&self.arg_types),
            self.return_type
        )
    }
}

pub(crate) fn type_list(types: &[DataType]) -> String {
    types
        .iter()
        .map(DataType::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table of function signatures addressable by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Vec<Arc<FunctionSignature>>>,
}

impl FunctionRegistry {
    /// Create a registry with no functions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin function.
    pub fn builtin() -> Self {
        use DataType::{Bool, Float64, Int64};

        let mut functions: HashMap<String, Vec<Arc<FunctionSignature>>> = HashMap::new();
        let mut add = |name: &str, arg_types: Vec<DataType>, return_type: DataType, kernel| {
            functions
                .entry(name.to_string())
                .or_default()
                .push(Arc::new(FunctionSignature {
                    name: name.to_string(),
                    arg_types,
                    return_type,
                    kernel,
                }));
        };

        for t in [Int64, Float64] {
            add(builtin::ADD, vec![t, t], t, Kernel::Add);
            add(builtin::SUBTRACT, vec![t, t], t, Kernel::Subtract);
            add(builtin::MULTIPLY, vec![t, t], t, Kernel::Multiply);
            add(builtin::DIVIDE, vec![t, t], t, Kernel::Divide);
            add(builtin::MOD, vec![t, t], t, Kernel::Mod);
            add(builtin::NEGATIVE, vec![t], t, Kernel::Negative);
            add(builtin::LESS_THAN, vec![t, t], Bool, Kernel::LessThan);
            add(builtin::LESS_THAN_OR_EQUAL_TO, vec![t, t], Bool, Kernel::LessThanOrEqual);
            add(builtin::GREATER_THAN, vec![t, t], Bool, Kernel::GreaterThan);
            add(builtin::GREATER_THAN_OR_EQUAL_TO, vec![t, t], Bool, Kernel::GreaterThanOrEqual);
        }
        for t in [Bool, Int64, Float64] {
            add(builtin::EQUAL, vec![t, t], Bool, Kernel::Equal);
            add(builtin::NOT_EQUAL, vec![t, t], Bool, Kernel::NotEqual);
            add(builtin::IS_NULL, vec![t], Bool, Kernel::IsNull);
            add(builtin::IS_NOT_NULL, vec![t], Bool, Kernel::IsNotNull);
        }
        add(builtin::NOT, vec![Bool], Bool, Kernel::Not);
        add(builtin::AND, vec![Bool, Bool], Bool, Kernel::And);
        add(builtin::OR, vec![Bool, Bool], Bool, Kernel::Or);

        Self { functions }
    }

    /// Wrap this registry in an `Arc`, freezing its contents.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Add an overload.
    ///
    /// Fails with `InvalidParameter` if the name already has an overload with
    /// the same operand types.
    pub fn register(&mut self, signature: FunctionSignature) -> SiftResult<()> {
        let overloads = self.functions.entry(signature.name.clone()).or_default();
        if overloads
            .iter()
            .any(|existing| existing.arg_types == signature.arg_types)
        {
            return Err(SiftError::invalid_parameter(format!(
                "function {signature} is already registered"
            )));
        }
        overloads.push(Arc::new(signature));
        Ok(())
    }

    /// Check if any overload is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All overloads registered under `name`.
    pub fn signatures(&self, name: &str) -> &[Arc<FunctionSignature>] {
        self.functions.get(name).map_or(&[], Vec::as_slice)
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Find the overload of `name` whose operand types are exactly `arg_types`.
    ///
    /// Fails with `UnknownFunction` when the name is not registered and with
    /// `TypeMismatch` when no overload takes these operand types.
    pub fn resolve(&self, name: &str, arg_types: &[DataType]) -> SiftResult<Arc<FunctionSignature>> {
        let overloads = self
            .functions
            .get(name)
            .ok_or_else(|| SiftError::unknown_function(format!("no function named '{name}'")))?;

        overloads
            .iter()
            .find(|sig| sig.arg_types == arg_types)
            .cloned()
            .ok_or_else(|| {
                let candidates = overloads
                    .iter()
                    .map(|sig| sig.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                SiftError::type_mismatch(format!(
                    "{name}({}) matches no signature, candidates: {candidates}",
                    type_list(arg_types)
                ))
            })
    }
}
