//! This module defines the framework-independent scalar type system.
//!
//! It includes the canonical `DType` value, the external type systems a `DType`
//! converts to (`ExternalDType`), the per-framework `DTypeMapping` tables, and the
//! `DTypeRegistry` that holds them.

pub mod dtype;
pub mod external;
pub mod mapping;
pub mod registry;

mod defaults;

// Re-export the main type(s) for easier access.
pub use dtype::{DType, ElementType, ElementUnit};
pub use external::{ExternalDType, MappingKind, MappingTarget, NativeType, NumpyDType};
pub use mapping::DTypeMapping;
pub use registry::DTypeRegistry;
