//! Read interface for anything that looks like a column.

use arrow::array::Array;

use common_error::SiftResult;

use crate::types::{DataType, Value};

/// Row-addressed, read-only access to a typed column.
///
/// Implemented by owned column buffers and by derived views, so downstream
/// consumers treat both the same way.
pub trait ColumnAccess {
    /// Logical type of every value in the column.
    fn data_type(&self) -> DataType;

    /// Number of rows.
    fn len(&self) -> usize;

    /// Value at `row`. Null rows yield `Value::Null`.
    ///
    /// Fails with `IndexOutOfBounds` when `row >= len()`.
    fn get(&self, row: usize) -> SiftResult<Value>;

    /// Check if the column holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if `row` is null.
    fn is_null(&self, row: usize) -> SiftResult<bool> {
        self.get(row).map(|v| v.is_null())
    }

    /// Backing arrow array, when the rows are stored in one directly.
    fn as_arrow(&self) -> Option<&dyn Array> {
        None
    }

    /// Iterate all rows in order. Read errors are yielded, not skipped.
    fn values(&self) -> ColumnValues<'_, Self>
    where
        Self: Sized,
    {
        ColumnValues {
            column: self,
            next: 0,
        }
    }
}

/// Iterator over the rows of a [`ColumnAccess`] implementation.
#[derive(Debug)]
pub struct ColumnValues<'a, C: ColumnAccess + ?Sized> {
    column: &'a C,
    next: usize,
}

impl<C: ColumnAccess + ?Sized> Iterator for ColumnValues<'_, C> {
    type Item = SiftResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.column.len() {
            return None;
        }
        let row = self.next;
        self.next += 1;
        Some(self.column.get(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<C: ColumnAccess + ?Sized> ExactSizeIterator for ColumnValues<'_, C> {}
