//! Row-at-a-time interpreter over a bound expression tree.
//!
//! Binding happens once per filter: field references become positions in the
//! filter's input list and function calls keep the overload chosen at build
//! time. Evaluation then walks the tree bottom-up for each row.

use std::sync::Arc;

use common_error::{SiftError, SiftResult};
use sift_core::{Column, ColumnAccess, DataType, Field, Schema, Value};
use sift_expr::{FunctionSignature, Node, NullHandling};

/// Widest operand list any kernel accepts.
const MAX_ARITY: usize = 2;

/// Expression tree with names resolved.
#[derive(Debug, Clone)]
pub(crate) enum BoundExpr {
    /// Position in the filter's input list.
    Input(usize),
    Literal(Value),
    Call {
        signature: Arc<FunctionSignature>,
        args: Vec<BoundExpr>,
    },
}

impl BoundExpr {
    /// Bind `node` against `schema`. Referenced fields are appended to
    /// `inputs` on first sight.
    ///
    /// Fails with `UnknownField` when a field is not in the schema and with
    /// `SchemaMismatch` when the schema declares it with another type.
    pub(crate) fn bind(node: &Node, schema: &Schema, inputs: &mut Vec<Field>) -> SiftResult<Self> {
        match node {
            Node::Field(field) => {
                let declared = schema.field_with_name(&field.name).ok_or_else(|| {
                    SiftError::unknown_field(format!(
                        "field '{}' not found in schema {schema}",
                        field.name
                    ))
                })?;
                check_field_type(field, declared.data_type)?;

                let position = match inputs.iter().position(|f| f.name == field.name) {
                    Some(position) => position,
                    None => {
                        inputs.push(field.clone());
                        inputs.len() - 1
                    }
                };
                Ok(Self::Input(position))
            }
            Node::Literal(lit) => Ok(Self::Literal(lit.value())),
            Node::Function(func) => {
                if func.args().len() > MAX_ARITY {
                    return Err(SiftError::internal(format!(
                        "{} has {} operands, kernels take at most {MAX_ARITY}",
                        func.name(),
                        func.args().len()
                    )));
                }
                let args = func
                    .args()
                    .iter()
                    .map(|arg| Self::bind(arg, schema, inputs))
                    .collect::<SiftResult<Vec<_>>>()?;
                Ok(Self::Call {
                    signature: Arc::clone(func.signature()),
                    args,
                })
            }
        }
    }

    /// Evaluate this subtree for one row.
    ///
    /// `columns[i]` is the column bound to input `i`; `row` is in range for
    /// every one of them.
    pub(crate) fn evaluate(&self, columns: &[&Column], row: usize) -> SiftResult<Value> {
        match self {
            Self::Input(position) => {
                let column = columns.get(*position).ok_or_else(|| {
                    SiftError::internal(format!("input {position} was not resolved"))
                })?;
                column.get(row)
            }
            Self::Literal(value) => Ok(*value),
            Self::Call { signature, args } => {
                let mut operands = [Value::Null; MAX_ARITY];
                for (operand, arg) in operands.iter_mut().zip(args) {
                    *operand = arg.evaluate(columns, row)?;
                }
                let operands = &operands[..args.len()];

                if signature.null_handling() == NullHandling::Propagate
                    && operands.iter().any(Value::is_null)
                {
                    return Ok(Value::Null);
                }
                signature.kernel().invoke(operands)
            }
        }
    }
}

/// `SchemaMismatch` unless the field node and the schema agree on the type.
pub(crate) fn check_field_type(field: &Field, actual: DataType) -> SiftResult<()> {
    if field.data_type != actual {
        return Err(SiftError::schema_mismatch(format!(
            "field '{}' referenced as {} but schema declares {}",
            field.name, field.data_type, actual
        )));
    }
    Ok(())
}
