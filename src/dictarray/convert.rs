//! Conversions from plain Rust collections into Arrow arrays.
//!
//! Plain vectors (and `ndarray` vectors) are copied into a fresh Arrow array.
//! Values that already are an `ArrayRef` are stored by reference.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use ndarray::Array1;

use super::column::Column;

/// Anything that can be stored as a column.
pub trait IntoArrayRef {
    fn into_array_ref(self) -> ArrayRef;
}

impl IntoArrayRef for ArrayRef {
    fn into_array_ref(self) -> ArrayRef {
        self
    }
}

impl IntoArrayRef for &ArrayRef {
    fn into_array_ref(self) -> ArrayRef {
        Arc::clone(self)
    }
}

impl IntoArrayRef for Column {
    fn into_array_ref(self) -> ArrayRef {
        self.into_values()
    }
}

macro_rules! impl_into_array_ref {
    ($($native:ty => $array:ty),+ $(,)?) => {
        $(
            impl IntoArrayRef for Vec<$native> {
                fn into_array_ref(self) -> ArrayRef {
                    Arc::new(<$array>::from(self))
                }
            }

            impl IntoArrayRef for Vec<Option<$native>> {
                fn into_array_ref(self) -> ArrayRef {
                    Arc::new(<$array>::from(self))
                }
            }
        )+
    };
}

impl_into_array_ref!(
    bool => BooleanArray,
    i8 => Int8Array,
    i16 => Int16Array,
    i32 => Int32Array,
    i64 => Int64Array,
    u8 => UInt8Array,
    u16 => UInt16Array,
    u32 => UInt32Array,
    u64 => UInt64Array,
    f32 => Float32Array,
    f64 => Float64Array,
    String => StringArray,
    &str => StringArray,
);

impl<T> IntoArrayRef for Array1<T>
where
    T: Clone,
    Vec<T>: IntoArrayRef,
{
    fn into_array_ref(self) -> ArrayRef {
        self.to_vec().into_array_ref()
    }
}
