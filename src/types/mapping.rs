//! A bidirectional conversion table between `DType` and one external type system.

use hashbrown::HashMap;

use super::dtype::DType;
use super::external::MappingTarget;
use crate::error::MerlinError;

/// Maps `DType`s to one framework's native types and back.
///
/// The forward table holds exactly one external type per dtype (the first one
/// registered). The reverse table may hold several external types per dtype, so
/// aliases like `LargeUtf8` and `Utf8` can both map onto `string`.
#[derive(Debug, Clone)]
pub struct DTypeMapping<T: MappingTarget> {
    forward: HashMap<DType, T>,
    reverse: HashMap<T, DType>,
}

impl<T: MappingTarget> Default for DTypeMapping<T> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }
}

impl<T: MappingTarget> DTypeMapping<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `dtype <-> external` in both directions. Existing entries win.
    pub fn map(mut self, dtype: DType, external: T) -> Self {
        self.reverse.entry(external.clone()).or_insert_with(|| dtype.clone());
        self.forward.entry(dtype).or_insert(external);
        self
    }

    /// Registers `external -> dtype` only.
    pub fn alias(mut self, external: T, dtype: DType) -> Self {
        self.reverse.entry(external).or_insert(dtype);
        self
    }

    pub fn from_merlin(&self, dtype: &DType) -> Option<&T> {
        self.forward.get(dtype)
    }

    pub fn to_merlin(&self, external: &T) -> Option<&DType> {
        self.reverse.get(&*external.normalize())
    }

    /// Every `external -> dtype` pair, aliases included.
    pub fn reverse_entries(&self) -> impl Iterator<Item = (&T, &DType)> {
        self.reverse.iter()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Checks that every dtype the reverse table can produce converts back.
    pub fn validate(&self) -> Result<(), MerlinError> {
        match self
            .reverse
            .values()
            .find(|dtype| !self.forward.contains_key(*dtype))
        {
            Some(dtype) => Err(MerlinError::IncompleteMapping {
                dtype: dtype.to_string(),
                mapping: T::KIND.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Merges `other` into this mapping. Entries already present are kept.
    pub(crate) fn extend(&mut self, other: DTypeMapping<T>) {
        for (dtype, external) in other.forward {
            self.forward.entry(dtype).or_insert(external);
        }
        for (external, dtype) in other.reverse {
            self.reverse.entry(external).or_insert(dtype);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dtype::{INT64, STRING};
    use crate::types::external::NumpyDType;

    #[test]
    fn test_first_registration_wins() {
        let mapping = DTypeMapping::new()
            .map(STRING, NumpyDType::new("str"))
            .map(STRING, NumpyDType::new("object"));
        assert_eq!(mapping.from_merlin(&STRING), Some(&NumpyDType::new("str")));
        // The second external type still reverse-maps.
        assert_eq!(mapping.to_merlin(&NumpyDType::new("object")), Some(&STRING));
    }

    #[test]
    fn test_validate_rejects_alias_without_forward_entry() {
        let mapping = DTypeMapping::new()
            .map(INT64, NumpyDType::new("int64"))
            .alias(NumpyDType::new("str"), STRING);
        let err = mapping.validate().unwrap_err();
        assert!(matches!(err, MerlinError::IncompleteMapping { ref dtype, .. } if dtype == "string"));
    }

    #[test]
    fn test_extend_is_additive() {
        let mut base = DTypeMapping::new().map(INT64, NumpyDType::new("int64"));
        base.extend(
            DTypeMapping::new()
                .map(INT64, NumpyDType::new("i8"))
                .map(STRING, NumpyDType::new("str")),
        );
        assert_eq!(base.len(), 2);
        assert_eq!(base.from_merlin(&INT64), Some(&NumpyDType::new("int64")));
        assert_eq!(base.to_merlin(&NumpyDType::new("i8")), Some(&INT64));
    }
}
