//! The built-in dtype mappings.
//!
//! Order matters: `DTypeMapping::map` keeps the first registration, so the
//! preferred external type for a dtype is listed first and aliases come after.

use arrow_schema::{DataType as ArrowDataType, TimeUnit};

use super::dtype::*;
use super::external::{NativeType, NumpyDType};
use super::mapping::DTypeMapping;

pub fn arrow_mapping() -> DTypeMapping<ArrowDataType> {
    DTypeMapping::new()
        .map(BOOLEAN, ArrowDataType::Boolean)
        .map(INT8, ArrowDataType::Int8)
        .map(INT16, ArrowDataType::Int16)
        .map(INT32, ArrowDataType::Int32)
        .map(INT64, ArrowDataType::Int64)
        .map(UINT8, ArrowDataType::UInt8)
        .map(UINT16, ArrowDataType::UInt16)
        .map(UINT32, ArrowDataType::UInt32)
        .map(UINT64, ArrowDataType::UInt64)
        .map(FLOAT16, ArrowDataType::Float16)
        .map(FLOAT32, ArrowDataType::Float32)
        .map(FLOAT64, ArrowDataType::Float64)
        .map(STRING, ArrowDataType::Utf8)
        .alias(ArrowDataType::LargeUtf8, STRING)
        .alias(ArrowDataType::Utf8View, STRING)
        .map(DATETIME64_S, ArrowDataType::Timestamp(TimeUnit::Second, None))
        .map(DATETIME64_MS, ArrowDataType::Timestamp(TimeUnit::Millisecond, None))
        .map(DATETIME64_US, ArrowDataType::Timestamp(TimeUnit::Microsecond, None))
        .map(DATETIME64_NS, ArrowDataType::Timestamp(TimeUnit::Nanosecond, None))
        // Forward only: the reverse entry for nanosecond timestamps is already taken.
        .map(DATETIME64, ArrowDataType::Timestamp(TimeUnit::Nanosecond, None))
        .map(DATE32, ArrowDataType::Date32)
        .alias(ArrowDataType::Date64, DATETIME64_MS)
        .map(UNKNOWN, ArrowDataType::Null)
}

pub fn numpy_mapping() -> DTypeMapping<NumpyDType> {
    DTypeMapping::new()
        .map(BOOLEAN, NumpyDType::new("bool"))
        .map(INT8, NumpyDType::new("int8"))
        .map(INT16, NumpyDType::new("int16"))
        .map(INT32, NumpyDType::new("int32"))
        .map(INT64, NumpyDType::new("int64"))
        .map(UINT8, NumpyDType::new("uint8"))
        .map(UINT16, NumpyDType::new("uint16"))
        .map(UINT32, NumpyDType::new("uint32"))
        .map(UINT64, NumpyDType::new("uint64"))
        .map(FLOAT16, NumpyDType::new("float16"))
        .map(FLOAT32, NumpyDType::new("float32"))
        .map(FLOAT64, NumpyDType::new("float64"))
        .map(STRING, NumpyDType::new("str"))
        .map(DATETIME64, NumpyDType::new("datetime64"))
        .map(DATETIME64_S, NumpyDType::new("datetime64[s]"))
        .map(DATETIME64_MS, NumpyDType::new("datetime64[ms]"))
        .map(DATETIME64_US, NumpyDType::new("datetime64[us]"))
        .map(DATETIME64_NS, NumpyDType::new("datetime64[ns]"))
        .map(DATE32, NumpyDType::new("datetime64[D]"))
        .map(OBJECT, NumpyDType::new("object"))
}

pub fn native_mapping() -> DTypeMapping<NativeType> {
    DTypeMapping::new()
        .map(BOOLEAN, NativeType::Bool)
        .map(INT8, NativeType::I8)
        .map(INT16, NativeType::I16)
        .map(INT32, NativeType::I32)
        .map(INT64, NativeType::I64)
        .map(UINT8, NativeType::U8)
        .map(UINT16, NativeType::U16)
        .map(UINT32, NativeType::U32)
        .map(UINT64, NativeType::U64)
        .map(FLOAT32, NativeType::F32)
        .map(FLOAT64, NativeType::F64)
        .map(STRING, NativeType::String)
        .map(DATETIME64_NS, NativeType::SystemTime)
        .map(DATETIME64, NativeType::SystemTime)
}
