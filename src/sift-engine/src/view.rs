//! Indexed views: a column re-addressed through a selection vector.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array};
use arrow::compute::take;

use common_error::{SiftError, SiftResult};
use sift_core::{Column, ColumnAccess, ColumnValues, DataType, Value};

use crate::selection::SelectionVector;

/// Read-only projection of `source` onto the rows named by a selection.
///
/// Position `i` maps to `source[selection[i]]`. Nothing is copied; the view
/// borrows both inputs and cannot outlive them. Because the selection is
/// strictly increasing, the view keeps the source's relative row order.
#[derive(Debug, Clone, Copy)]
pub struct IndexedView<'a, C: ColumnAccess + ?Sized = Column> {
    source: &'a C,
    selection: &'a SelectionVector,
}

/// Build a view of `source` through `selection`.
///
/// Every index is checked against the source length here, not on access:
/// fails with `IndexOutOfBounds` naming the first offending index.
pub fn view_by_index<'a, C: ColumnAccess + ?Sized>(
    source: &'a C,
    selection: &'a SelectionVector,
) -> SiftResult<IndexedView<'a, C>> {
    check_bounds(source.len(), selection)?;
    Ok(IndexedView { source, selection })
}

impl<'a, C: ColumnAccess + ?Sized> IndexedView<'a, C> {
    /// Column being viewed.
    pub fn source(&self) -> &'a C {
        self.source
    }

    /// Selection driving the view.
    pub fn selection(&self) -> &'a SelectionVector {
        self.selection
    }

    /// Copy the viewed rows into a single arrow array.
    ///
    /// Arrow-backed sources are gathered with [`take_by_selection`]; other
    /// sources, such as nested views, are rebuilt value by value.
    pub fn to_arrow(&self) -> SiftResult<ArrayRef> {
        if let Some(array) = self.source.as_arrow() {
            return take_by_selection(array, self.selection);
        }
        let array: ArrayRef = match self.data_type() {
            DataType::Int64 => Arc::new(
                self.iter()
                    .map(|v| v.map(|v| v.as_int64()))
                    .collect::<SiftResult<Int64Array>>()?,
            ),
            DataType::Float64 => Arc::new(
                self.iter()
                    .map(|v| v.map(|v| v.as_float64()))
                    .collect::<SiftResult<Float64Array>>()?,
            ),
            DataType::Bool => Arc::new(
                self.iter()
                    .map(|v| v.map(|v| v.as_bool()))
                    .collect::<SiftResult<BooleanArray>>()?,
            ),
            DataType::Null => {
                return Err(SiftError::type_mismatch(
                    "cannot materialize a view of a Null-typed column",
                ))
            }
        };
        Ok(array)
    }

    /// Iterate viewed values in order.
    ///
    /// Bounds were checked when the view was built, so reads only fail if the
    /// source itself does.
    pub fn iter(&self) -> ColumnValues<'_, Self> {
        self.values()
    }
}

impl<C: ColumnAccess + ?Sized> ColumnAccess for IndexedView<'_, C> {
    fn data_type(&self) -> DataType {
        self.source.data_type()
    }

    fn len(&self) -> usize {
        self.selection.len()
    }

    fn get(&self, i: usize) -> SiftResult<Value> {
        let row = self.selection.get(i).ok_or_else(|| {
            SiftError::index_out_of_bounds(format!(
                "position {i} out of bounds for view of length {}",
                self.selection.len()
            ))
        })?;
        self.source.get(row)
    }
}

/// Gather the rows of an arrow array named by `selection` into a new array.
///
/// The array-level counterpart of [`view_by_index`] for data that never left
/// arrow. Bounds are checked the same way.
pub fn take_by_selection(array: &dyn Array, selection: &SelectionVector) -> SiftResult<ArrayRef> {
    check_bounds(array.len(), selection)?;
    let indices = selection.to_array();
    Ok(take(array, indices.as_ref(), None)?)
}

fn check_bounds(source_len: usize, selection: &SelectionVector) -> SiftResult<()> {
    if let Some((position, row)) = selection
        .indices()
        .enumerate()
        .find(|&(_, row)| row >= source_len)
    {
        return Err(SiftError::index_out_of_bounds(format!(
            "selection[{position}] = {row} is out of bounds for source of length {source_len}"
        )));
    }
    Ok(())
}
