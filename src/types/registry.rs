//! The dtype registry: one typed mapping slot per supported framework.
//!
//! A `DTypeRegistry` is an explicit value that can be built, extended and then
//! handed to whatever needs conversions. For code that doesn't want to carry one
//! around, `DTypeRegistry::global()` returns a process-wide instance that is
//! initialized exactly once and is read-only afterwards.

use std::sync::OnceLock;

use arrow_schema::DataType as ArrowDataType;

use super::defaults;
use super::dtype::DType;
use super::external::{ExternalDType, MappingKind, MappingTarget, NativeType, NumpyDType};
use super::mapping::DTypeMapping;
use crate::config::MerlinConfig;
use crate::error::MerlinError;

static GLOBAL_REGISTRY: OnceLock<DTypeRegistry> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct DTypeRegistry {
    pub(crate) arrow: Option<DTypeMapping<ArrowDataType>>,
    pub(crate) numpy: Option<DTypeMapping<NumpyDType>>,
    pub(crate) native: Option<DTypeMapping<NativeType>>,
}

impl DTypeRegistry {
    /// A registry with no mappings at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with every built-in mapping registered.
    pub fn with_defaults() -> Self {
        Self::with_mappings(&MappingKind::ALL)
    }

    /// A registry with only the listed built-in mappings registered.
    pub fn with_mappings(kinds: &[MappingKind]) -> Self {
        let mut registry = Self::empty();
        for kind in kinds {
            // The built-in tables are validated in tests, so these can't fail.
            let result = match kind {
                MappingKind::Arrow => registry.register_arrow(defaults::arrow_mapping()),
                MappingKind::Numpy => registry.register_numpy(defaults::numpy_mapping()),
                MappingKind::Native => registry.register_native(defaults::native_mapping()),
            };
            if let Err(err) = result {
                log::warn!("Skipping built-in {} dtype mapping: {}", kind, err);
            }
        }
        registry
    }

    pub fn from_config(config: &MerlinConfig) -> Self {
        Self::with_mappings(&config.mappings)
    }

    //==============================================================================
    // Process-wide instance
    //==============================================================================

    /// Returns the process-wide registry, building the default one on first use.
    pub fn global() -> &'static DTypeRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            log::debug!("Initializing the global dtype registry with the built-in mappings");
            DTypeRegistry::with_defaults()
        })
    }

    /// Installs `registry` as the process-wide registry.
    ///
    /// This must happen before anything calls [`DTypeRegistry::global`].
    pub fn install_global(registry: DTypeRegistry) -> Result<&'static DTypeRegistry, MerlinError> {
        GLOBAL_REGISTRY
            .set(registry)
            .map_err(|_| MerlinError::RegistryAlreadyInitialized)?;
        Ok(Self::global())
    }

    //==============================================================================
    // Registration (additive only)
    //==============================================================================

    /// Registers `mapping` into the slot for `T`, merging with any mapping
    /// already there.
    pub fn register<T: MappingTarget>(&mut self, mapping: DTypeMapping<T>) -> Result<(), MerlinError> {
        mapping.validate()?;
        log::debug!("Registering {} dtype mapping with {} entries", T::KIND, mapping.len());
        let slot = T::slot_mut(self);
        match *slot {
            Some(ref mut existing) => existing.extend(mapping),
            None => *slot = Some(mapping),
        }
        Ok(())
    }

    pub fn register_arrow(&mut self, mapping: DTypeMapping<ArrowDataType>) -> Result<(), MerlinError> {
        self.register(mapping)
    }

    pub fn register_numpy(&mut self, mapping: DTypeMapping<NumpyDType>) -> Result<(), MerlinError> {
        self.register(mapping)
    }

    pub fn register_native(&mut self, mapping: DTypeMapping<NativeType>) -> Result<(), MerlinError> {
        self.register(mapping)
    }

    pub fn is_registered(&self, kind: MappingKind) -> bool {
        match kind {
            MappingKind::Arrow => self.arrow.is_some(),
            MappingKind::Numpy => self.numpy.is_some(),
            MappingKind::Native => self.native.is_some(),
        }
    }

    //==============================================================================
    // Lookups
    //==============================================================================

    pub fn mapping<T: MappingTarget>(&self) -> Result<&DTypeMapping<T>, MerlinError> {
        T::slot(self)
            .as_ref()
            .ok_or_else(|| MerlinError::MappingNotFound(T::KIND.to_string()))
    }

    /// Converts a `DType` into the framework type `T`.
    pub fn external_type<T: MappingTarget>(&self, dtype: &DType) -> Result<T, MerlinError> {
        self.mapping::<T>()?
            .from_merlin(dtype)
            .cloned()
            .ok_or_else(|| MerlinError::DTypeNotInMapping {
                dtype: dtype.to_string(),
                mapping: T::KIND.to_string(),
            })
    }

    /// Converts a framework type `T` into a `DType`.
    pub fn merlin_type<T: MappingTarget>(&self, external: &T) -> Result<DType, MerlinError> {
        self.mapping::<T>()?
            .to_merlin(external)
            .cloned()
            .ok_or_else(|| MerlinError::ExternalTypeNotInMapping {
                external: external.to_string(),
                mapping: T::KIND.to_string(),
            })
    }

    /// Converts a `DType` into whichever framework `kind` names.
    pub fn from_merlin(&self, dtype: &DType, kind: MappingKind) -> Result<ExternalDType, MerlinError> {
        match kind {
            MappingKind::Arrow => self.external_type::<ArrowDataType>(dtype).map(MappingTarget::wrap),
            MappingKind::Numpy => self.external_type::<NumpyDType>(dtype).map(MappingTarget::wrap),
            MappingKind::Native => self.external_type::<NativeType>(dtype).map(MappingTarget::wrap),
        }
    }

    pub fn to_merlin(&self, external: &ExternalDType) -> Result<DType, MerlinError> {
        match external {
            ExternalDType::Arrow(dt) => self.merlin_type(dt),
            ExternalDType::Numpy(dt) => self.merlin_type(dt),
            ExternalDType::Native(dt) => self.merlin_type(dt),
        }
    }

    /// Shortcut for inferring the dtype of an Arrow column.
    pub fn from_arrow(&self, data_type: &ArrowDataType) -> Result<DType, MerlinError> {
        self.merlin_type(data_type)
    }
}
