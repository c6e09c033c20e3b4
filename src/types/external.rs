//! External type systems a `DType` can be converted to and from.
//!
//! Each supported framework has its own native representation:
//! * `arrow`  -> `arrow_schema::DataType`
//! * `numpy`  -> `NumpyDType`, a numpy-style dtype descriptor such as `"int64"`
//! * `native` -> `NativeType`, the plain Rust scalar a column element maps to
//!
//! `ExternalDType` is the tagged union over all of them, returned when the target
//! framework is only known at runtime.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use arrow_schema::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};

use super::mapping::DTypeMapping;
use super::registry::DTypeRegistry;
use crate::error::MerlinError;

/// Identifies one of the registry's mapping slots.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    Arrow,
    Numpy,
    Native,
}

impl MappingKind {
    pub const ALL: [MappingKind; 3] = [MappingKind::Arrow, MappingKind::Numpy, MappingKind::Native];

    pub fn name(&self) -> &'static str {
        match self {
            MappingKind::Arrow => "arrow",
            MappingKind::Numpy => "numpy",
            MappingKind::Native => "native",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingKind {
    type Err = MerlinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arrow" | "pyarrow" => Ok(MappingKind::Arrow),
            "numpy" => Ok(MappingKind::Numpy),
            // "python" is accepted so code written against the host-scalar name keeps working.
            "native" | "rust" | "python" => Ok(MappingKind::Native),
            _ => Err(MerlinError::MappingNotFound(s.to_string())),
        }
    }
}

/// A numpy-style dtype descriptor, e.g. `"float32"` or `"datetime64[ns]"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumpyDType(Cow<'static, str>);

impl NumpyDType {
    pub const fn new(descr: &'static str) -> Self {
        Self(Cow::Borrowed(descr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NumpyDType {
    fn from(descr: String) -> Self {
        Self(Cow::Owned(descr))
    }
}

impl fmt::Display for NumpyDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The plain Rust scalar type a column element corresponds to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// `std::time::SystemTime`
    SystemTime,
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeType::Bool => "bool",
            NativeType::I8 => "i8",
            NativeType::I16 => "i16",
            NativeType::I32 => "i32",
            NativeType::I64 => "i64",
            NativeType::U8 => "u8",
            NativeType::U16 => "u16",
            NativeType::U32 => "u32",
            NativeType::U64 => "u64",
            NativeType::F32 => "f32",
            NativeType::F64 => "f64",
            NativeType::String => "String",
            NativeType::SystemTime => "SystemTime",
        };
        f.write_str(name)
    }
}

/// A framework-native type object produced by a registered mapping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExternalDType {
    Arrow(ArrowDataType),
    Numpy(NumpyDType),
    Native(NativeType),
}

impl ExternalDType {
    pub fn kind(&self) -> MappingKind {
        match self {
            ExternalDType::Arrow(_) => MappingKind::Arrow,
            ExternalDType::Numpy(_) => MappingKind::Numpy,
            ExternalDType::Native(_) => MappingKind::Native,
        }
    }
}

impl fmt::Display for ExternalDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalDType::Arrow(dt) => write!(f, "{}", dt),
            ExternalDType::Numpy(dt) => write!(f, "{}", dt),
            ExternalDType::Native(dt) => write!(f, "{}", dt),
        }
    }
}

//==================================================================================
// MappingTarget: ties each external type to its registry slot
//==================================================================================

/// **CONTRACT:** implemented by every external type the registry can hold a
/// mapping for. The slot accessors let the registry stay a plain struct with one
/// typed field per framework while its lookup code is written once.
pub trait MappingTarget: Clone + Eq + Hash + fmt::Debug + fmt::Display + Sized {
    const KIND: MappingKind;

    fn wrap(self) -> ExternalDType;

    /// Strips wrappers that don't change the element type before a reverse lookup.
    fn normalize(&self) -> Cow<'_, Self> {
        Cow::Borrowed(self)
    }

    fn slot(registry: &DTypeRegistry) -> &Option<DTypeMapping<Self>>;

    fn slot_mut(registry: &mut DTypeRegistry) -> &mut Option<DTypeMapping<Self>>;
}

impl MappingTarget for ArrowDataType {
    const KIND: MappingKind = MappingKind::Arrow;

    fn wrap(self) -> ExternalDType {
        ExternalDType::Arrow(self)
    }

    /// Lists describe their elements, dictionaries their values, and the time
    /// zone of a timestamp doesn't change its unit.
    fn normalize(&self) -> Cow<'_, Self> {
        let mut current = self;
        loop {
            match current {
                ArrowDataType::List(field)
                | ArrowDataType::LargeList(field)
                | ArrowDataType::FixedSizeList(field, _) => current = field.data_type(),
                ArrowDataType::Dictionary(_, value) => current = value.as_ref(),
                ArrowDataType::Timestamp(unit, Some(_)) => {
                    return Cow::Owned(ArrowDataType::Timestamp(*unit, None))
                }
                _ => return Cow::Borrowed(current),
            }
        }
    }

    fn slot(registry: &DTypeRegistry) -> &Option<DTypeMapping<Self>> {
        &registry.arrow
    }

    fn slot_mut(registry: &mut DTypeRegistry) -> &mut Option<DTypeMapping<Self>> {
        &mut registry.arrow
    }
}

impl MappingTarget for NumpyDType {
    const KIND: MappingKind = MappingKind::Numpy;

    fn wrap(self) -> ExternalDType {
        ExternalDType::Numpy(self)
    }

    fn slot(registry: &DTypeRegistry) -> &Option<DTypeMapping<Self>> {
        &registry.numpy
    }

    fn slot_mut(registry: &mut DTypeRegistry) -> &mut Option<DTypeMapping<Self>> {
        &mut registry.numpy
    }
}

impl MappingTarget for NativeType {
    const KIND: MappingKind = MappingKind::Native;

    fn wrap(self) -> ExternalDType {
        ExternalDType::Native(self)
    }

    fn slot(registry: &DTypeRegistry) -> &Option<DTypeMapping<Self>> {
        &registry.native
    }

    fn slot_mut(registry: &mut DTypeRegistry) -> &mut Option<DTypeMapping<Self>> {
        &mut registry.native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::{Field, TimeUnit};
    use std::sync::Arc;

    #[test]
    fn test_mapping_kind_from_str() {
        assert_eq!("numpy".parse::<MappingKind>().unwrap(), MappingKind::Numpy);
        assert_eq!("python".parse::<MappingKind>().unwrap(), MappingKind::Native);
        assert_eq!("Arrow".parse::<MappingKind>().unwrap(), MappingKind::Arrow);

        let err = "pandas".parse::<MappingKind>().unwrap_err();
        assert!(matches!(err, MerlinError::MappingNotFound(ref name) if name == "pandas"));
        assert!(err.to_string().contains("pandas"));
    }

    #[test]
    fn test_arrow_normalize_unwraps_lists() {
        let nested = ArrowDataType::List(Arc::new(Field::new(
            "item",
            ArrowDataType::LargeList(Arc::new(Field::new("item", ArrowDataType::Int16, true))),
            true,
        )));
        assert_eq!(*nested.normalize(), ArrowDataType::Int16);

        let zoned = ArrowDataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into()));
        assert_eq!(
            zoned.normalize().into_owned(),
            ArrowDataType::Timestamp(TimeUnit::Millisecond, None)
        );

        let dict = ArrowDataType::Dictionary(
            Box::new(ArrowDataType::Int32),
            Box::new(ArrowDataType::Utf8),
        );
        assert_eq!(*dict.normalize(), ArrowDataType::Utf8);
    }

    #[test]
    fn test_external_display() {
        assert_eq!(ExternalDType::Native(NativeType::U16).to_string(), "u16");
        assert_eq!(
            ExternalDType::Numpy(NumpyDType::new("datetime64[ns]")).to_string(),
            "datetime64[ns]"
        );
        assert_eq!(ExternalDType::Arrow(ArrowDataType::Int64).kind(), MappingKind::Arrow);
    }
}
