//! Selection vectors: dense, strictly increasing lists of row positions.

use std::sync::Arc;

use arrow::array::{ArrayRef, UInt16Array, UInt32Array, UInt64Array};
use log::trace;

use common_config::{IndexWidth, SelectionConfig};
use common_error::{SiftError, SiftResult};

use crate::memory::{MemoryManager, MemoryReservation};

/// Concrete integer type a selection vector stores its indices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// `u16` indices.
    UInt16,
    /// `u32` indices.
    UInt32,
    /// `u64` indices.
    UInt64,
}

impl IndexType {
    /// Largest index (and largest capacity) this type can hold.
    pub const fn max_value(&self) -> u64 {
        match self {
            Self::UInt16 => u16::MAX as u64,
            Self::UInt32 => u32::MAX as u64,
            Self::UInt64 => u64::MAX,
        }
    }

    /// Bytes per stored index.
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::UInt16 => 2,
            Self::UInt32 => 4,
            Self::UInt64 => 8,
        }
    }

    /// Narrowest type whose range covers `capacity`.
    pub fn narrowest_for(capacity: usize) -> Self {
        let capacity = capacity as u64;
        [Self::UInt16, Self::UInt32]
            .into_iter()
            .find(|t| capacity <= t.max_value())
            .unwrap_or(Self::UInt64)
    }
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UInt16 => f.write_str("UInt16"),
            Self::UInt32 => f.write_str("UInt32"),
            Self::UInt64 => f.write_str("UInt64"),
        }
    }
}

#[derive(Debug)]
enum IndexBuffer {
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
}

impl IndexBuffer {
    fn try_allocate(index_type: IndexType, capacity: usize) -> SiftResult<Self> {
        fn alloc<T>(capacity: usize) -> SiftResult<Vec<T>> {
            let mut buffer = Vec::new();
            buffer.try_reserve_exact(capacity).map_err(|e| {
                SiftError::resource_exhausted(format!(
                    "cannot allocate selection vector of {capacity} slots: {e}"
                ))
            })?;
            Ok(buffer)
        }

        Ok(match index_type {
            IndexType::UInt16 => Self::UInt16(alloc(capacity)?),
            IndexType::UInt32 => Self::UInt32(alloc(capacity)?),
            IndexType::UInt64 => Self::UInt64(alloc(capacity)?),
        })
    }

    fn len(&self) -> usize {
        match self {
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
        }
    }

    fn get(&self, i: usize) -> Option<usize> {
        match self {
            Self::UInt16(v) => v.get(i).map(|&x| usize::from(x)),
            Self::UInt32(v) => v.get(i).map(|&x| x as usize),
            Self::UInt64(v) => v.get(i).map(|&x| x as usize),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::UInt16(v) => v.clear(),
            Self::UInt32(v) => v.clear(),
            Self::UInt64(v) => v.clear(),
        }
    }
}

/// Ordered row positions selected from one batch.
///
/// The capacity is fixed at allocation and its bytes are reserved from a
/// [`MemoryManager`] for the vector's lifetime. Indices are unique and
/// strictly increasing; [`SelectionVector::append`] rejects anything else.
#[derive(Debug)]
pub struct SelectionVector {
    indices: IndexBuffer,
    index_type: IndexType,
    capacity: usize,
    _reservation: MemoryReservation,
}

impl SelectionVector {
    /// Allocate a vector of `capacity` slots with the given index type.
    ///
    /// Fails with `CapacityTooLarge` if `capacity` exceeds the type's
    /// maximum value and with `ResourceExhausted` if the memory manager
    /// refuses the reservation.
    pub fn try_new(
        capacity: usize,
        index_type: IndexType,
        memory: Arc<dyn MemoryManager>,
    ) -> SiftResult<Self> {
        if capacity as u64 > index_type.max_value() {
            return Err(SiftError::capacity_too_large(format!(
                "capacity {capacity} exceeds {index_type} maximum {}",
                index_type.max_value()
            )));
        }
        let bytes = capacity.checked_mul(index_type.byte_width()).ok_or_else(|| {
            SiftError::capacity_too_large(format!("capacity {capacity} overflows byte size"))
        })?;

        let reservation = MemoryReservation::try_new(memory, bytes)?;
        let indices = IndexBuffer::try_allocate(index_type, capacity)?;
        trace!("allocated {index_type} selection vector, capacity {capacity}");

        Ok(Self {
            indices,
            index_type,
            capacity,
            _reservation: reservation,
        })
    }

    /// Allocate with 16-bit indices (capacity at most 65535).
    pub fn make_int16(capacity: usize, memory: Arc<dyn MemoryManager>) -> SiftResult<Self> {
        Self::try_new(capacity, IndexType::UInt16, memory)
    }

    /// Allocate with 32-bit indices.
    pub fn make_int32(capacity: usize, memory: Arc<dyn MemoryManager>) -> SiftResult<Self> {
        Self::try_new(capacity, IndexType::UInt32, memory)
    }

    /// Allocate with 64-bit indices.
    pub fn make_int64(capacity: usize, memory: Arc<dyn MemoryManager>) -> SiftResult<Self> {
        Self::try_new(capacity, IndexType::UInt64, memory)
    }

    /// Allocate with the narrowest index type that fits `capacity`.
    pub fn make(capacity: usize, memory: Arc<dyn MemoryManager>) -> SiftResult<Self> {
        Self::try_new(capacity, IndexType::narrowest_for(capacity), memory)
    }

    /// Allocate with the index width named by `config`.
    pub fn make_with_config(
        capacity: usize,
        config: &SelectionConfig,
        memory: Arc<dyn MemoryManager>,
    ) -> SiftResult<Self> {
        match config.index_width {
            IndexWidth::Auto => Self::make(capacity, memory),
            IndexWidth::Int16 => Self::make_int16(capacity, memory),
            IndexWidth::Int32 => Self::make_int32(capacity, memory),
            IndexWidth::Int64 => Self::make_int64(capacity, memory),
        }
    }

    /// Append a row position.
    ///
    /// Fails with `CapacityExceeded` when full, `CapacityTooLarge` when the
    /// position does not fit the index type, and `InvalidParameter` when the
    /// position is not greater than the last one.
    pub fn append(&mut self, row: usize) -> SiftResult<()> {
        if self.len() == self.capacity {
            return Err(SiftError::capacity_exceeded(format!(
                "selection vector full at capacity {}",
                self.capacity
            )));
        }
        if row as u64 > self.index_type.max_value() {
            return Err(SiftError::capacity_too_large(format!(
                "row {row} does not fit a {} index",
                self.index_type
            )));
        }
        if let Some(last) = self.last() {
            if row <= last {
                return Err(SiftError::invalid_parameter(format!(
                    "row {row} appended after {last}, indices must increase"
                )));
            }
        }

        match &mut self.indices {
            IndexBuffer::UInt16(v) => v.push(row as u16),
            IndexBuffer::UInt32(v) => v.push(row as u32),
            IndexBuffer::UInt64(v) => v.push(row as u64),
        }
        Ok(())
    }

    /// Drop every stored index, keeping the allocation.
    pub fn reset(&mut self) {
        self.indices.clear();
    }

    /// Number of stored indices.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if no index is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Integer type of the stored indices.
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// Largest row position this vector can hold.
    pub fn max_supported_value(&self) -> u64 {
        self.index_type.max_value()
    }

    /// Index stored at position `i`.
    pub fn get(&self, i: usize) -> Option<usize> {
        self.indices.get(i)
    }

    /// Last (largest) stored index.
    pub fn last(&self) -> Option<usize> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate stored indices in order.
    pub fn indices(&self) -> SelectionIter<'_> {
        SelectionIter {
            selection: self,
            next: 0,
        }
    }

    /// Read-only arrow snapshot of the stored indices, typed by index width.
    pub fn to_array(&self) -> ArrayRef {
        match &self.indices {
            IndexBuffer::UInt16(v) => Arc::new(UInt16Array::from(v.clone())),
            IndexBuffer::UInt32(v) => Arc::new(UInt32Array::from(v.clone())),
            IndexBuffer::UInt64(v) => Arc::new(UInt64Array::from(v.clone())),
        }
    }
}

/// Iterator over the indices of a [`SelectionVector`].
#[derive(Debug, Clone)]
pub struct SelectionIter<'a> {
    selection: &'a SelectionVector,
    next: usize,
}

impl Iterator for SelectionIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.selection.get(self.next)?;
        self.next += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.selection.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SelectionIter<'_> {}
