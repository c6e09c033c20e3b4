//! This module defines `DType`, the framework-independent description of a
//! scalar element type.
//!
//! A `DType` may describe a list column as well; in that case it describes the
//! list *elements*. Conversions to and from external type systems live in the
//! `registry` module and are looked up through a `DTypeRegistry`.

use std::borrow::Cow;
use std::fmt;

use arrow_schema::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};

use super::external::{ExternalDType, MappingKind, NativeType, NumpyDType};
use super::registry::DTypeRegistry;
use crate::error::MerlinError;

/// The scalar kind of a `DType`, irrespective of whether the column is a list.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Bool,
    Int,
    UInt,
    Float,
    String,
    DateTime,
    Object,
    Unknown,
}

/// Temporal granularity, only meaningful for `ElementType::DateTime`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

/// An immutable value describing a scalar element type.
///
/// Two `DType`s are equal iff every field is equal. The fields are private so a
/// `DType` can't be changed after construction; the `with_*` builders return new
/// values instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DType {
    name: Cow<'static, str>,
    element_type: ElementType,
    #[serde(default)]
    element_size: Option<u32>,
    #[serde(default)]
    element_unit: Option<ElementUnit>,
    #[serde(default)]
    signed: Option<bool>,
}

impl DType {
    pub const fn new(name: &'static str, element_type: ElementType) -> Self {
        Self {
            name: Cow::Borrowed(name),
            element_type,
            element_size: None,
            element_unit: None,
            signed: None,
        }
    }

    /// Builds a `DType` whose name is only known at runtime.
    pub fn named(name: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            element_type,
            element_size: None,
            element_unit: None,
            signed: None,
        }
    }

    /// Element width in bits.
    pub const fn with_size(mut self, bits: u32) -> Self {
        self.element_size = Some(bits);
        self
    }

    pub const fn with_unit(mut self, unit: ElementUnit) -> Self {
        self.element_unit = Some(unit);
        self
    }

    pub const fn with_signed(mut self, signed: bool) -> Self {
        self.signed = Some(signed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn element_size(&self) -> Option<u32> {
        self.element_size
    }

    pub fn element_unit(&self) -> Option<ElementUnit> {
        self.element_unit
    }

    pub fn signed(&self) -> Option<bool> {
        self.signed
    }

    //==============================================================================
    // Conversions
    //==============================================================================

    /// Converts this dtype to another framework's dtype using the process-wide
    /// registry.
    ///
    /// # Errors
    /// * `MappingNotFound` if no mapping is registered for `kind`.
    /// * `DTypeNotInMapping` if the mapping has no entry for this dtype.
    pub fn to(&self, kind: MappingKind) -> Result<ExternalDType, MerlinError> {
        self.to_in(DTypeRegistry::global(), kind)
    }

    /// Same as [`DType::to`] but against an explicit registry.
    pub fn to_in(
        &self,
        registry: &DTypeRegistry,
        kind: MappingKind,
    ) -> Result<ExternalDType, MerlinError> {
        registry.from_merlin(self, kind)
    }

    /// Converts using a mapping looked up by name (e.g. `"numpy"`, `"python"`).
    pub fn to_named(&self, mapping_name: &str) -> Result<ExternalDType, MerlinError> {
        let kind: MappingKind = mapping_name.parse()?;
        self.to(kind)
    }

    pub fn to_arrow(&self) -> Result<ArrowDataType, MerlinError> {
        DTypeRegistry::global().external_type(self)
    }

    pub fn to_numpy(&self) -> Result<NumpyDType, MerlinError> {
        DTypeRegistry::global().external_type(self)
    }

    /// The plain Rust scalar type this dtype corresponds to.
    pub fn to_native(&self) -> Result<NativeType, MerlinError> {
        DTypeRegistry::global().external_type(self)
    }

    //==============================================================================
    // Scalar predicates (these ignore size and signedness)
    //==============================================================================

    pub fn is_integer(&self) -> bool {
        matches!(self.element_type, ElementType::Int | ElementType::UInt)
    }

    pub fn is_signed_integer(&self) -> bool {
        self.element_type == ElementType::Int
    }

    pub fn is_float(&self) -> bool {
        self.element_type == ElementType::Float
    }

    pub fn is_bool(&self) -> bool {
        self.element_type == ElementType::Bool
    }

    pub fn is_string(&self) -> bool {
        self.element_type == ElementType::String
    }

    pub fn is_datetime(&self) -> bool {
        self.element_type == ElementType::DateTime
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

//==================================================================================
// Canonical dtypes
//==================================================================================

pub const BOOLEAN: DType = DType::new("boolean", ElementType::Bool);

pub const INT8: DType = DType::new("int8", ElementType::Int).with_size(8).with_signed(true);
pub const INT16: DType = DType::new("int16", ElementType::Int).with_size(16).with_signed(true);
pub const INT32: DType = DType::new("int32", ElementType::Int).with_size(32).with_signed(true);
pub const INT64: DType = DType::new("int64", ElementType::Int).with_size(64).with_signed(true);

pub const UINT8: DType = DType::new("uint8", ElementType::UInt).with_size(8).with_signed(false);
pub const UINT16: DType = DType::new("uint16", ElementType::UInt).with_size(16).with_signed(false);
pub const UINT32: DType = DType::new("uint32", ElementType::UInt).with_size(32).with_signed(false);
pub const UINT64: DType = DType::new("uint64", ElementType::UInt).with_size(64).with_signed(false);

pub const FLOAT16: DType = DType::new("float16", ElementType::Float).with_size(16).with_signed(true);
pub const FLOAT32: DType = DType::new("float32", ElementType::Float).with_size(32).with_signed(true);
pub const FLOAT64: DType = DType::new("float64", ElementType::Float).with_size(64).with_signed(true);

pub const STRING: DType = DType::new("string", ElementType::String);

pub const DATETIME64: DType = DType::new("datetime64", ElementType::DateTime).with_size(64);
pub const DATETIME64_S: DType = DType::new("datetime64[s]", ElementType::DateTime)
    .with_size(64)
    .with_unit(ElementUnit::Second);
pub const DATETIME64_MS: DType = DType::new("datetime64[ms]", ElementType::DateTime)
    .with_size(64)
    .with_unit(ElementUnit::Millisecond);
pub const DATETIME64_US: DType = DType::new("datetime64[us]", ElementType::DateTime)
    .with_size(64)
    .with_unit(ElementUnit::Microsecond);
pub const DATETIME64_NS: DType = DType::new("datetime64[ns]", ElementType::DateTime)
    .with_size(64)
    .with_unit(ElementUnit::Nanosecond);
pub const DATE32: DType = DType::new("date32", ElementType::DateTime)
    .with_size(32)
    .with_unit(ElementUnit::Day);

pub const OBJECT: DType = DType::new("object", ElementType::Object);
pub const UNKNOWN: DType = DType::new("unknown", ElementType::Unknown);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let built = DType::named("int32", ElementType::Int)
            .with_size(32)
            .with_signed(true);
        assert_eq!(built, INT32);
        assert_ne!(INT32, INT64);
        // Same name, different unit: not equal.
        assert_ne!(DATETIME64, DATETIME64_NS.clone());
    }

    #[test]
    fn test_predicates_ignore_size_and_sign() {
        assert!(INT8.is_integer());
        assert!(UINT64.is_integer());
        assert!(!UINT64.is_signed_integer());
        assert!(FLOAT16.is_float());
        assert!(!FLOAT64.is_integer());
        assert!(DATE32.is_datetime());
        assert!(STRING.is_string());
        assert!(BOOLEAN.is_bool());
        assert!(!OBJECT.is_float());
    }

    #[test]
    fn test_display_is_canonical_name() {
        assert_eq!(DATETIME64_MS.to_string(), "datetime64[ms]");
        assert_eq!(UNKNOWN.to_string(), "unknown");
    }

    #[test]
    fn test_serde_roundtrip_preserves_fields() {
        let json = serde_json::to_string(&DATETIME64_US).unwrap();
        let back: DType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DATETIME64_US);
        assert_eq!(back.element_unit(), Some(ElementUnit::Microsecond));
    }
}
