//! Expression trees for sift predicates.
//!
//! Trees are made of three node kinds: field references, typed literals and
//! calls of registered functions. [`TreeExprBuilder`] type-checks every call
//! against a [`FunctionRegistry`] while the tree is being built, and
//! [`TreeExprBuilder::make_condition`] wraps a boolean root as a
//! [`Condition`].
//!
//! # Example
//!
//! ```rust
//! use sift_core::{DataType, Field};
//! use sift_expr::TreeExprBuilder;
//!
//! let builder = TreeExprBuilder::new();
//! let f0 = builder.make_field(&Field::new("f0", DataType::Int64));
//! let two = builder.make_literal(2i64)?;
//! let remainder = builder.make_function("mod", vec![f0, two], DataType::Int64)?;
//! let zero = builder.make_literal(0i64)?;
//! let even = builder.make_function("equal", vec![remainder, zero], DataType::Bool)?;
//! let condition = builder.make_condition(even)?;
//! assert_eq!(condition.to_string(), "condition(equal(mod(f0, 2), 0))");
//! # Ok::<(), common_error::SiftError>(())
//! ```

#![forbid(unsafe_code)]

mod builder;
mod condition;
pub mod node;
pub mod registry;

pub use builder::TreeExprBuilder;
pub use condition::Condition;
pub use node::{FunctionNode, LiteralNode, Node, NodeRef};
pub use registry::{builtin, FunctionRegistry, FunctionSignature, Kernel, NullHandling};
