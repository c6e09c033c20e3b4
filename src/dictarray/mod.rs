//! This module defines `DictArray`, a minimal ordered name→array container that
//! stands in for a dataframe where a real dataframe library is unnecessary.
//!
//! Arrays are Arrow `ArrayRef`s, so storing or copying a `DictArray` never
//! copies column data. Every column carries a `DType`; the name→array and
//! name→dtype maps always hold exactly the same keys.

use std::ops::Index;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use hashbrown::HashMap;

use crate::error::MerlinError;
use crate::types::{DType, DTypeRegistry};

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod column;
pub mod convert;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use column::Column;
pub use convert::IntoArrayRef;

//==================================================================================
// 3. DictArray
//==================================================================================

#[derive(Debug, Clone, Default)]
pub struct DictArray {
    /// Column names in insertion order.
    order: Vec<String>,
    arrays: HashMap<String, ArrayRef>,
    dtypes: HashMap<String, DType>,
}

impl DictArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a `DictArray` from name/array pairs, inferring every dtype.
    ///
    /// A name given twice keeps its first position and its last array.
    pub fn from_arrays<I, K, V>(arrays: I) -> Result<Self, MerlinError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoArrayRef,
    {
        let mut dict = Self::new();
        for (name, values) in arrays {
            dict.insert(name, values)?;
        }
        Ok(dict)
    }

    /// Builds a `DictArray` from name/array pairs, using the dtype given in
    /// `dtypes` for a column when there is one and inferring the rest.
    ///
    /// Columns with an explicit dtype never go through inference, so arrays
    /// the registry can't map (binary blobs as `OBJECT`, say) are accepted.
    ///
    /// # Errors
    /// `ColumnNotFound` if `dtypes` names a column missing from `arrays`, or
    /// the inference error of any column left without a dtype.
    pub fn from_arrays_with_dtypes<I, K, V, D, N>(arrays: I, dtypes: D) -> Result<Self, MerlinError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoArrayRef,
        D: IntoIterator<Item = (N, DType)>,
        N: Into<String>,
    {
        let mut explicit: HashMap<String, DType> = dtypes
            .into_iter()
            .map(|(name, dtype)| (name.into(), dtype))
            .collect();
        let mut dict = Self::new();
        for (name, values) in arrays {
            let name = name.into();
            match explicit.remove(&name) {
                Some(dtype) => {
                    dict.insert_column(name, Column::with_dtype(values, dtype));
                }
                None if dict.contains(&name) => {
                    // A repeated name keeps the dtype it was given explicitly.
                    let dtype = dict.dtypes[&name].clone();
                    dict.insert_column(name, Column::with_dtype(values, dtype));
                }
                None => {
                    dict.insert(name, values)?;
                }
            }
        }
        match explicit.into_keys().next() {
            Some(name) => Err(MerlinError::ColumnNotFound(name)),
            None => Ok(dict),
        }
    }

    /// Replaces the inferred dtypes of the named columns.
    ///
    /// # Errors
    /// `ColumnNotFound` if a name isn't a column of this `DictArray`.
    pub fn with_dtypes<I, K>(mut self, dtypes: I) -> Result<Self, MerlinError>
    where
        I: IntoIterator<Item = (K, DType)>,
        K: Into<String>,
    {
        for (name, dtype) in dtypes {
            let name = name.into();
            match self.dtypes.get_mut(&name) {
                Some(slot) => *slot = dtype,
                None => return Err(MerlinError::ColumnNotFound(name)),
            }
        }
        Ok(self)
    }

    //==============================================================================
    // Membership & iteration
    //==============================================================================

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    pub fn columns(&self) -> &[String] {
        &self.order
    }

    /// Iterates over column names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &ArrayRef> + '_ {
        self.order.iter().map(move |name| &self.arrays[name.as_str()])
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &ArrayRef)> + '_ {
        self.order
            .iter()
            .map(move |name| (name.as_str(), &self.arrays[name.as_str()]))
    }

    pub fn dtypes(&self) -> impl Iterator<Item = (&str, &DType)> + '_ {
        self.order
            .iter()
            .map(move |name| (name.as_str(), &self.dtypes[name.as_str()]))
    }

    //==============================================================================
    // Lookup
    //==============================================================================

    pub fn get(&self, name: &str) -> Option<&ArrayRef> {
        self.arrays.get(name)
    }

    pub fn dtype(&self, name: &str) -> Option<&DType> {
        self.dtypes.get(name)
    }

    /// The named array together with its dtype.
    pub fn column(&self, name: &str) -> Result<Column, MerlinError> {
        match (self.arrays.get(name), self.dtypes.get(name)) {
            (Some(values), Some(dtype)) => Ok(Column::with_dtype(values, dtype.clone())),
            _ => Err(MerlinError::ColumnNotFound(name.to_string())),
        }
    }

    /// A new `DictArray` with only the listed columns, in the listed order.
    /// Arrays are shared with `self`.
    pub fn select<I, S>(&self, names: I) -> Result<DictArray, MerlinError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = DictArray::new();
        for name in names {
            let column = self.column(name.as_ref())?;
            selected.insert_column(name.as_ref(), column);
        }
        Ok(selected)
    }

    //==============================================================================
    // Mutation
    //==============================================================================

    /// Stores `values` under `name`, inferring its dtype. Returns the array
    /// previously stored under that name, if any. An existing name keeps its
    /// position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: impl IntoArrayRef,
    ) -> Result<Option<ArrayRef>, MerlinError> {
        let column = Column::new(values)?;
        Ok(self.insert_column(name, column))
    }

    /// Stores a column with its own dtype, skipping inference.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Option<ArrayRef> {
        let name = name.into();
        if !self.arrays.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.dtypes.insert(name.clone(), column.dtype().clone());
        self.arrays.insert(name, column.into_values())
    }

    /// Merges `other` in, overwriting existing names, then infers the dtype of
    /// every column again, including untouched ones and explicit overrides.
    ///
    /// Nothing changes if any inference fails.
    pub fn update<I, K, V>(&mut self, other: I) -> Result<(), MerlinError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoArrayRef,
    {
        let mut order = self.order.clone();
        let mut arrays = self.arrays.clone();
        for (name, values) in other {
            let name = name.into();
            if !arrays.contains_key(&name) {
                order.push(name.clone());
            }
            arrays.insert(name, values.into_array_ref());
        }

        let registry = DTypeRegistry::global();
        let dtypes = order
            .iter()
            .map(|name| -> Result<(String, DType), MerlinError> {
                let dtype = registry.from_arrow(arrays[name.as_str()].data_type())?;
                Ok((name.clone(), dtype))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        log::debug!("Updated DictArray, now holding {} columns", order.len());
        self.order = order;
        self.arrays = arrays;
        self.dtypes = dtypes;
        Ok(())
    }

    /// Removes a column and its dtype.
    ///
    /// # Errors
    /// `ColumnNotFound` if there is no such column.
    pub fn remove(&mut self, name: &str) -> Result<ArrayRef, MerlinError> {
        let values = self
            .arrays
            .remove(name)
            .ok_or_else(|| MerlinError::ColumnNotFound(name.to_string()))?;
        self.dtypes.remove(name);
        self.order.retain(|existing| existing != name);
        Ok(values)
    }

    /// A `DictArray` with independent name→array and name→dtype maps. The
    /// arrays themselves are shared.
    pub fn copy(&self) -> DictArray {
        self.clone()
    }

    //==============================================================================
    // Arrow interchange
    //==============================================================================

    /// The common length of all columns (0 when there are none).
    ///
    /// # Errors
    /// `LengthMismatch` naming the first column whose length differs from the
    /// first column's.
    pub fn num_rows(&self) -> Result<usize, MerlinError> {
        let mut expected = None;
        for (name, values) in self.items() {
            match expected {
                None => expected = Some(values.len()),
                Some(rows) if rows != values.len() => {
                    return Err(MerlinError::LengthMismatch {
                        column: name.to_string(),
                        expected: rows,
                        actual: values.len(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(expected.unwrap_or(0))
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch, MerlinError> {
        let rows = self.num_rows()?;
        let fields: Vec<Field> = self
            .items()
            .map(|(name, values)| Field::new(name, values.data_type().clone(), values.null_count() > 0))
            .collect();
        let columns: Vec<ArrayRef> = self.values().cloned().collect();
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?;
        Ok(batch)
    }

    /// Wraps every column of `batch`, in schema order, inferring dtypes.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self, MerlinError> {
        let schema = batch.schema();
        let pairs = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, values)| (field.name().clone(), Arc::clone(values)));
        Self::from_arrays(pairs)
    }
}

/// Returns the raw array stored under `name`.
///
/// # Panics
/// If there is no such column; use [`DictArray::get`] to check first.
impl Index<&str> for DictArray {
    type Output = ArrayRef;

    fn index(&self, name: &str) -> &ArrayRef {
        match self.arrays.get(name) {
            Some(values) => values,
            None => panic!("DictArray has no column named '{}'", name),
        }
    }
}

/// Two `DictArray`s are equal when they hold the same names and, for each
/// name, equal arrays and equal dtypes. Column order is not compared.
impl PartialEq for DictArray {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.items().all(|(name, values)| {
                match (other.arrays.get(name), other.dtypes.get(name)) {
                    (Some(other_values), Some(other_dtype)) => {
                        values.as_ref() == other_values.as_ref() && &self.dtypes[name] == other_dtype
                    }
                    _ => false,
                }
            })
    }
}

impl<'a> IntoIterator for &'a DictArray {
    type Item = (&'a str, &'a ArrayRef);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a ArrayRef)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.items())
    }
}

#[cfg(test)]
mod tests;
