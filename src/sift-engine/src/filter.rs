//! Filter: a condition bound to a schema, evaluated into selection vectors.

use std::sync::Arc;

use log::debug;

use common_error::{SiftError, SiftResult};
use sift_core::{Column, Field, RecordBatch, SchemaRef, Value};
use sift_expr::Condition;

use crate::evaluator::{check_field_type, BoundExpr};
use crate::selection::SelectionVector;

/// A condition bound once to a schema.
///
/// Holds no mutable state, so one filter may evaluate independent batches on
/// several threads at once, each into its own selection vector.
#[derive(Debug, Clone)]
pub struct Filter {
    schema: SchemaRef,
    condition: Condition,
    /// Fields the condition reads, in binding order.
    inputs: Vec<Field>,
    /// Column index of each input within `schema`.
    input_slots: Vec<usize>,
    expr: BoundExpr,
}

impl Filter {
    /// Bind `condition` to `schema`.
    ///
    /// Every field reference is resolved by name here, once. Fails with
    /// `UnknownField` if a name is absent and with `SchemaMismatch` if the
    /// schema declares a field with a different type than the reference.
    pub fn make(schema: SchemaRef, condition: Condition) -> SiftResult<Self> {
        let mut inputs = Vec::new();
        let expr = BoundExpr::bind(condition.root(), &schema, &mut inputs)?;
        let input_slots = inputs
            .iter()
            .map(|field| {
                schema.index_of(&field.name).ok_or_else(|| {
                    SiftError::internal(format!("bound field '{}' vanished", field.name))
                })
            })
            .collect::<SiftResult<Vec<_>>>()?;

        debug!(
            "bound {condition} to schema {schema} reading {} column(s)",
            inputs.len()
        );

        Ok(Self {
            schema,
            condition,
            inputs,
            input_slots,
            expr,
        })
    }

    /// Schema the filter was bound to.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// The bound condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Evaluate against `batch`, writing matching row positions into
    /// `selection` in ascending order.
    ///
    /// Returns the number of matches, which is also `selection.len()`. A row
    /// whose predicate is null is not selected.
    ///
    /// Fails with `UnknownField`/`SchemaMismatch` if the batch lacks a
    /// referenced column or types it differently, with `CapacityTooLarge` if
    /// the batch's last row position does not fit the selection's index type,
    /// and with `CapacityExceeded` once more rows match than the selection can
    /// hold. After a failure the selection's contents are unspecified; the
    /// filter and batch are untouched.
    pub fn evaluate(&self, batch: &RecordBatch, selection: &mut SelectionVector) -> SiftResult<usize> {
        let columns = self.resolve_columns(batch)?;
        let num_rows = batch.num_rows();

        if let Some(last_row) = num_rows.checked_sub(1) {
            if last_row as u64 > selection.max_supported_value() {
                return Err(SiftError::capacity_too_large(format!(
                    "batch of {num_rows} rows cannot be addressed by a {} selection vector",
                    selection.index_type()
                )));
            }
        }

        let capacity = selection.capacity();
        selection.reset();
        for row in 0..num_rows {
            match self.expr.evaluate(&columns, row)? {
                Value::Bool(true) => selection.append(row).map_err(|e| match e {
                    SiftError::CapacityExceeded(_) => SiftError::capacity_exceeded(format!(
                        "row {row} matched but selection capacity {capacity} is exhausted"
                    )),
                    other => other,
                })?,
                Value::Bool(false) | Value::Null => {}
                other => {
                    return Err(SiftError::internal(format!(
                        "condition produced non-boolean {} at row {row}",
                        other.type_name()
                    )))
                }
            }
        }

        debug!(
            "{} selected {} of {num_rows} row(s)",
            self.condition,
            selection.len()
        );
        Ok(selection.len())
    }

    /// Columns for every input, in input order.
    fn resolve_columns<'b>(&self, batch: &'b RecordBatch) -> SiftResult<Vec<&'b Column>> {
        if Arc::ptr_eq(batch.schema(), &self.schema) || **batch.schema() == *self.schema {
            return self
                .input_slots
                .iter()
                .map(|&slot| {
                    batch.column(slot).ok_or_else(|| {
                        SiftError::internal(format!("batch is missing column {slot}"))
                    })
                })
                .collect();
        }

        let schema = batch.schema();
        self.inputs
            .iter()
            .map(|field| {
                let slot = schema.index_of(&field.name).ok_or_else(|| {
                    SiftError::unknown_field(format!(
                        "field '{}' not found in batch schema {schema}",
                        field.name
                    ))
                })?;
                let declared = schema
                    .field(slot)
                    .ok_or_else(|| SiftError::internal(format!("schema has no field {slot}")))?;
                check_field_type(field, declared.data_type)?;
                batch
                    .column(slot)
                    .ok_or_else(|| SiftError::internal(format!("batch is missing column {slot}")))
            })
            .collect()
    }
}
