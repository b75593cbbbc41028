//! Immutable expression tree nodes.

use std::sync::Arc;

use sift_core::{DataType, Field, Value};

use crate::registry::FunctionSignature;

/// Shared reference to an expression node. Subtrees may appear under more
/// than one parent.
pub type NodeRef = Arc<Node>;

/// A node of a type-checked expression tree.
///
/// Nodes are built through [`crate::TreeExprBuilder`], which checks every
/// function call against the registry, so a tree that exists is well typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Reference to a batch column by field.
    Field(Field),
    /// Constant value, possibly a typed null.
    Literal(LiteralNode),
    /// Call of a registered function.
    Function(FunctionNode),
}

/// Literal payload: a value together with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub(crate) value: Value,
    pub(crate) data_type: DataType,
}

impl LiteralNode {
    /// Constant value. `Value::Null` for a typed null.
    pub const fn value(&self) -> Value {
        self.value
    }

    /// Declared type.
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }
}

/// Function call payload: the resolved overload and its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub(crate) signature: Arc<FunctionSignature>,
    pub(crate) args: Vec<NodeRef>,
}

impl FunctionNode {
    /// Function name.
    pub fn name(&self) -> &str {
        self.signature.name()
    }

    /// Overload chosen when the node was built.
    pub fn signature(&self) -> &Arc<FunctionSignature> {
        &self.signature
    }

    /// Operands in call order.
    pub fn args(&self) -> &[NodeRef] {
        &self.args
    }
}

impl Node {
    /// Result type of this node.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Field(field) => field.data_type,
            Self::Literal(lit) => lit.data_type,
            Self::Function(func) => func.signature.return_type(),
        }
    }

    /// Direct children.
    pub fn children(&self) -> &[NodeRef] {
        match self {
            Self::Function(func) => &func.args,
            Self::Field(_) | Self::Literal(_) => &[],
        }
    }

    /// Every field referenced in this subtree, in first-seen pre-order,
    /// without repeats.
    pub fn referenced_fields(&self) -> Vec<&Field> {
        let mut fields: Vec<&Field> = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a Field>) {
        match self {
            Self::Field(field) => {
                if !out.iter().any(|f| f.name == field.name) {
                    out.push(field);
                }
            }
            Self::Literal(_) => {}
            Self::Function(func) => {
                for arg in &func.args {
                    arg.collect_fields(out);
                }
            }
        }
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    /// Nodes on the longest path from this node down to a leaf.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{}", field.name),
            Self::Literal(lit) => write!(f, "{}", lit.value),
            Self::Function(func) => {
                write!(f, "{}(", func.name())?;
                for (i, arg) in func.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
