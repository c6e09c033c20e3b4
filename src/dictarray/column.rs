use arrow::array::{Array, ArrayRef};

use super::convert::IntoArrayRef;
use crate::error::MerlinError;
use crate::types::{DType, DTypeRegistry};

/// A single array plus the `DType` describing its elements.
#[derive(Debug, Clone)]
pub struct Column {
    values: ArrayRef,
    dtype: DType,
}

impl Column {
    /// Wraps `values`, inferring the dtype through the global registry.
    pub fn new(values: impl IntoArrayRef) -> Result<Self, MerlinError> {
        Self::infer_in(DTypeRegistry::global(), values)
    }

    /// Wraps `values`, inferring the dtype through `registry`.
    pub fn infer_in(registry: &DTypeRegistry, values: impl IntoArrayRef) -> Result<Self, MerlinError> {
        let values = values.into_array_ref();
        let dtype = registry.from_arrow(values.data_type())?;
        Ok(Self { values, dtype })
    }

    /// Wraps `values` with an explicit dtype, skipping inference.
    pub fn with_dtype(values: impl IntoArrayRef, dtype: DType) -> Self {
        Self {
            values: values.into_array_ref(),
            dtype,
        }
    }

    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    pub fn into_values(self) -> ArrayRef {
        self.values
    }

    pub fn dtype(&self) -> &DType {
        &self.dtype
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A zero-copy slice of this column, keeping its dtype.
    ///
    /// # Panics
    /// If `offset + length` is past the end of the column, the same as
    /// Arrow's `Array::slice`.
    pub fn slice(&self, offset: usize, length: usize) -> Column {
        Column {
            values: self.values.slice(offset, length),
            dtype: self.dtype.clone(),
        }
    }
}

/// Equal when the dtypes match and the arrays are equal elementwise.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype && self.values.as_ref() == other.values.as_ref()
    }
}
