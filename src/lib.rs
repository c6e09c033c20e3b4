//! This file is the root of the `merlin_columns` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`types`, `selector`,
//!     `dictarray`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types most callers need, so that
//!     `use merlin_columns::{ColumnSelector, DictArray, DType}` just works.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod dictarray;
pub mod error;
pub mod observability;
pub mod selector;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::MerlinConfig;
pub use dictarray::{Column, DictArray, IntoArrayRef};
pub use error::MerlinError;
pub use observability::enable_verbose_logging;
pub use selector::{ColumnGroup, ColumnSelector, GraphNode, GroupedName, Operator, SchemaLike, Tag};
pub use types::{DType, DTypeRegistry, ElementType, ElementUnit, MappingKind};
