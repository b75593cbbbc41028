//! Builder for expression trees and conditions.

use std::sync::Arc;

use common_error::{SiftError, SiftResult};
use sift_core::{DataType, Field, Value};

use crate::condition::Condition;
use crate::node::{FunctionNode, LiteralNode, Node, NodeRef};
use crate::registry::{builtin, type_list, FunctionRegistry};

/// Builds type-checked expression nodes against a function registry.
///
/// Every node returned is immutable. A failed call leaves nothing behind.
#[derive(Debug, Clone)]
pub struct TreeExprBuilder {
    registry: Arc<FunctionRegistry>,
}

impl Default for TreeExprBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeExprBuilder {
    /// Builder over the builtin function table.
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::builtin().into_shared())
    }

    /// Builder over a caller-supplied, frozen registry.
    pub fn with_registry(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    /// Registry used to resolve function calls.
    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    /// Reference to a column.
    pub fn make_field(&self, field: &Field) -> NodeRef {
        Arc::new(Node::Field(field.clone()))
    }

    /// Constant whose type is taken from the value.
    ///
    /// `Value::Null` carries no type; it fails with `TypeMismatch`, use
    /// [`Self::make_null`] instead.
    pub fn make_literal(&self, value: impl Into<Value>) -> SiftResult<NodeRef> {
        let value = value.into();
        if value.is_null() {
            return Err(SiftError::type_mismatch(
                "untyped null literal, use make_null with a data type",
            ));
        }
        Ok(Arc::new(Node::Literal(LiteralNode {
            value,
            data_type: value.data_type(),
        })))
    }

    /// Null constant of the given type.
    pub fn make_null(&self, data_type: DataType) -> SiftResult<NodeRef> {
        if !data_type.is_column_type() {
            return Err(SiftError::type_mismatch(format!(
                "null literal needs a concrete type, got {data_type}"
            )));
        }
        Ok(Arc::new(Node::Literal(LiteralNode {
            value: Value::Null,
            data_type,
        })))
    }

    /// Call of a registered function.
    ///
    /// Fails with `UnknownFunction` if `name` is not registered, and with
    /// `TypeMismatch` if no overload takes the children's types or the
    /// overload's result type differs from `result_type`.
    pub fn make_function(
        &self,
        name: &str,
        children: Vec<NodeRef>,
        result_type: DataType,
    ) -> SiftResult<NodeRef> {
        let arg_types: Vec<DataType> = children.iter().map(|c| c.data_type()).collect();
        let signature = self.registry.resolve(name, &arg_types)?;

        if signature.return_type() != result_type {
            return Err(SiftError::type_mismatch(format!(
                "{name}({}) returns {}, not {result_type}",
                type_list(&arg_types),
                signature.return_type()
            )));
        }

        Ok(Arc::new(Node::Function(FunctionNode {
            signature,
            args: children,
        })))
    }

    /// Conjunction of two or more boolean nodes.
    ///
    /// Operands are combined pairwise into a balanced tree of binary `and`
    /// calls, keeping their left-to-right order, so the tree is only
    /// logarithmically deep in the number of operands.
    pub fn make_and(&self, children: Vec<NodeRef>) -> SiftResult<NodeRef> {
        self.reduce_balanced(builtin::AND, children)
    }

    /// Disjunction of two or more boolean nodes, balanced like
    /// [`make_and`](Self::make_and).
    pub fn make_or(&self, children: Vec<NodeRef>) -> SiftResult<NodeRef> {
        self.reduce_balanced(builtin::OR, children)
    }

    fn reduce_balanced(&self, name: &str, children: Vec<NodeRef>) -> SiftResult<NodeRef> {
        if children.len() < 2 {
            return Err(SiftError::invalid_parameter(format!(
                "{name} needs at least two operands, got {}",
                children.len()
            )));
        }

        let mut level = children;
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut operands = level.into_iter();
            while let Some(left) = operands.next() {
                match operands.next() {
                    Some(right) => {
                        next.push(self.make_function(name, vec![left, right], DataType::Bool)?)
                    }
                    None => next.push(left),
                }
            }
            level = next;
        }
        level
            .pop()
            .ok_or_else(|| SiftError::internal(format!("{name} reduction lost its operands")))
    }

    /// Wrap a boolean-typed root as a condition.
    ///
    /// Fails with `NotBoolean` for any other root type.
    pub fn make_condition(&self, root: NodeRef) -> SiftResult<Condition> {
        let root_type = root.data_type();
        if root_type != DataType::Bool {
            return Err(SiftError::not_boolean(format!(
                "condition root {root} has type {root_type}"
            )));
        }
        Ok(Condition { root })
    }
}
