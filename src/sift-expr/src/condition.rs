//! Boolean conditions: the root of a filter predicate.

use sift_core::Field;

use crate::node::NodeRef;

/// A type-checked expression whose root evaluates to a boolean.
///
/// Build with [`crate::TreeExprBuilder::make_condition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub(crate) root: NodeRef,
}

impl Condition {
    /// Root node of the predicate.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Fields the predicate reads.
    pub fn referenced_fields(&self) -> Vec<&Field> {
        self.root.referenced_fields()
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "condition({})", self.root)
    }
}
