//! Record batches: an arrow record batch paired with the sift schema that
//! describes it.

use std::sync::Arc;

use arrow::record_batch::{RecordBatch as ArrowRecordBatch, RecordBatchOptions};

use common_error::{SiftError, SiftResult};

use crate::column::{Column, ColumnAccess};
use crate::schema::{Schema, SchemaRef};

/// A fixed-size, columnar, in-memory table fragment.
///
/// Data lives in an arrow record batch. Every column's length equals
/// `num_rows` and every column's type equals its field's declared type; both
/// are checked at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    schema: SchemaRef,
    columns: Vec<Column>,
    inner: ArrowRecordBatch,
}

impl RecordBatch {
    /// Create a batch, validating columns against the schema and row count.
    pub fn try_new(schema: SchemaRef, num_rows: usize, columns: Vec<Column>) -> SiftResult<Self> {
        validate(&schema, num_rows, &columns)?;

        let arrays = columns.iter().map(Column::to_arrow).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
        let inner =
            ArrowRecordBatch::try_new_with_options(Arc::new(schema.to_arrow()), arrays, &options)?;

        Ok(Self {
            schema,
            columns,
            inner,
        })
    }

    /// Wrap an arrow record batch without copying its buffers.
    ///
    /// Fails with `TypeMismatch` if a field has a type sift cannot represent
    /// and with `SchemaMismatch` if the field names repeat.
    pub fn try_from_arrow(batch: &ArrowRecordBatch) -> SiftResult<Self> {
        let schema = Schema::try_from_arrow(batch.schema().as_ref())?.into_ref();
        let columns = batch
            .columns()
            .iter()
            .map(|array| Column::try_from_arrow(array.as_ref()))
            .collect::<SiftResult<Vec<_>>>()?;
        validate(&schema, batch.num_rows(), &columns)?;

        Ok(Self {
            schema,
            columns,
            inner: batch.clone(),
        })
    }

    /// Borrow the backing arrow record batch.
    pub fn as_arrow(&self) -> &ArrowRecordBatch {
        &self.inner
    }

    /// Shared arrow record batch holding this batch's data.
    pub fn to_arrow(&self) -> ArrowRecordBatch {
        self.inner.clone()
    }

    /// Schema shared by this batch.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Declared row count.
    pub fn num_rows(&self) -> usize {
        self.inner.num_rows()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns in schema order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at `index`, if present.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Column whose field is called `name`, if present.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.schema
            .index_of(name)
            .and_then(|index| self.columns.get(index))
    }
}

fn validate(schema: &Schema, num_rows: usize, columns: &[Column]) -> SiftResult<()> {
    if columns.len() != schema.len() {
        return Err(SiftError::schema_mismatch(format!(
            "schema declares {} fields but {} columns were supplied",
            schema.len(),
            columns.len()
        )));
    }

    for (field, column) in schema.fields().iter().zip(columns) {
        if column.data_type() != field.data_type {
            return Err(SiftError::schema_mismatch(format!(
                "column '{}' declared {} but array holds {}",
                field.name,
                field.data_type,
                column.data_type()
            )));
        }
        if column.len() != num_rows {
            return Err(SiftError::schema_mismatch(format!(
                "column '{}' has {} rows, batch declares {}",
                field.name,
                column.len(),
                num_rows
            )));
        }
        if !field.nullable && column.null_count() > 0 {
            return Err(SiftError::schema_mismatch(format!(
                "non-nullable column '{}' contains {} nulls",
                field.name,
                column.null_count()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema};

    use crate::schema::Field;
    use crate::types::{DataType, Value};

    fn schema() -> SchemaRef {
        Schema::try_new(vec![
            Field::new("id", DataType::Int64).with_nullable(false),
            Field::new("flag", DataType::Bool),
        ])
        .unwrap()
        .into_ref()
    }

    #[test]
    fn test_try_new() {
        let batch = RecordBatch::try_new(
            schema(),
            3,
            vec![
                Column::from_values(vec![1i64, 2, 3]),
                Column::from_options(vec![Some(true), None, Some(false)]),
            ],
        )
        .unwrap();

        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.as_arrow().num_columns(), 2);
        assert_eq!(
            batch.column_by_name("flag").unwrap().get(1).unwrap(),
            Value::Null
        );
        assert!(batch.column_by_name("missing").is_none());
    }

    #[test]
    fn test_empty_schema_keeps_row_count() {
        let batch = RecordBatch::try_new(Schema::empty().into_ref(), 4, vec![]).unwrap();
        assert_eq!(batch.num_rows(), 4);
        assert_eq!(batch.num_columns(), 0);
    }

    #[test]
    fn test_column_count_mismatch() {
        let err = RecordBatch::try_new(schema(), 1, vec![Column::from_values(vec![1i64])])
            .unwrap_err();
        assert!(matches!(err, SiftError::SchemaMismatch(_)));
    }

    #[test]
    fn test_column_type_mismatch() {
        let err = RecordBatch::try_new(
            schema(),
            1,
            vec![
                Column::from_values(vec![1.0f64]),
                Column::from_values(vec![true]),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("declared Int64"));
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = RecordBatch::try_new(
            schema(),
            2,
            vec![
                Column::from_values(vec![1i64, 2]),
                Column::from_values(vec![true]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SiftError::SchemaMismatch(_)));
    }

    #[test]
    fn test_nulls_in_non_nullable_column() {
        let err = RecordBatch::try_new(
            schema(),
            1,
            vec![
                Column::from_options(vec![None::<i64>]),
                Column::from_values(vec![true]),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-nullable"));
    }

    #[test]
    fn test_from_arrow_shares_data() {
        let arrow_schema = Arc::new(ArrowSchema::new(vec![
            ArrowField::new("f0", ArrowDataType::Int64, false),
            ArrowField::new("f1", ArrowDataType::Float64, true),
        ]));
        let arrow_batch = ArrowRecordBatch::try_new(
            arrow_schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Float64Array::from(vec![Some(0.5), None])),
            ],
        )
        .unwrap();

        let batch = RecordBatch::try_from_arrow(&arrow_batch).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field_names(), vec!["f0", "f1"]);
        assert!(!batch.schema().field(0).unwrap().nullable);
        assert_eq!(batch.column(1).unwrap().get(1).unwrap(), Value::Null);
        assert_eq!(batch.to_arrow(), arrow_batch);
    }

    #[test]
    fn test_from_arrow_unsupported_type() {
        let arrow_schema = Arc::new(ArrowSchema::new(vec![ArrowField::new(
            "name",
            ArrowDataType::Utf8,
            true,
        )]));
        let arrow_batch =
            ArrowRecordBatch::try_new(arrow_schema, vec![Arc::new(StringArray::from(vec!["a"]))])
                .unwrap();

        let err = RecordBatch::try_from_arrow(&arrow_batch).unwrap_err();
        assert!(matches!(err, SiftError::TypeMismatch(_)));
    }
}
