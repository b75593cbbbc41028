//! Filter execution for sift.
//!
//! This crate evaluates a [`Condition`](sift_expr::Condition) against a
//! [`RecordBatch`](sift_core::RecordBatch) and records the matching rows in a
//! [`SelectionVector`], which then drives zero-copy [`IndexedView`]s of any
//! column of the batch.
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌─────────────────┐   ┌─────────────┐
//! │ Condition │──▶│  Filter  │──▶│ SelectionVector │──▶│ IndexedView │
//! └───────────┘   └──────────┘   └─────────────────┘   └─────────────┘
//!                      ▲                                      ▲
//!                 RecordBatch ────────────── Column ──────────┘
//! ```
//!
//! # Key Components
//!
//! - [`Filter`]: binds field names once, then interprets the tree row by row
//! - [`SelectionVector`]: fixed-capacity, strictly increasing row positions
//!   stored as `u16`, `u32` or `u64`
//! - [`IndexedView`]: a column read through a selection vector
//! - [`MemoryManager`]: accounting for selection vector allocations
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sift_core::{Column, ColumnAccess, DataType, Field, RecordBatch, Schema, Value};
//! use sift_engine::{view_by_index, Filter, NoopMemoryManager, SelectionVector};
//! use sift_expr::TreeExprBuilder;
//!
//! let field = Field::new("f0", DataType::Int64);
//! let schema = Schema::try_new(vec![field.clone()])?.into_ref();
//! let batch = RecordBatch::try_new(
//!     Arc::clone(&schema),
//!     4,
//!     vec![Column::from_values(vec![3i64, 8, 5, 10])],
//! )?;
//!
//! let builder = TreeExprBuilder::new();
//! let f0 = builder.make_field(&field);
//! let two = builder.make_literal(2i64)?;
//! let remainder = builder.make_function("mod", vec![f0, two], DataType::Int64)?;
//! let zero = builder.make_literal(0i64)?;
//! let even = builder.make_function("equal", vec![remainder, zero], DataType::Bool)?;
//! let filter = Filter::make(schema, builder.make_condition(even)?)?;
//!
//! let mut selection = SelectionVector::make_int16(batch.num_rows(), Arc::new(NoopMemoryManager::new()))?;
//! filter.evaluate(&batch, &mut selection)?;
//!
//! let view = view_by_index(&batch.columns()[0], &selection)?;
//! let evens = view.values().collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(evens, vec![Value::Int64(8), Value::Int64(10)]);
//! # Ok::<(), common_error::SiftError>(())
//! ```

#![forbid(unsafe_code)]

mod evaluator;
pub mod filter;
pub mod memory;
pub mod selection;
pub mod view;

pub use filter::Filter;
pub use memory::{
    memory_manager_from_config, MemoryManager, MemoryReservation, NoopMemoryManager,
    TrackingMemoryManager,
};
pub use selection::{IndexType, SelectionIter, SelectionVector};
pub use view::{take_by_selection, view_by_index, IndexedView};
