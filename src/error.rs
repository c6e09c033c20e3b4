// In: src/error.rs

//! This module defines the single, unified error type for the merlin column layer.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerlinError {
    // =========================================================================
    // === DType Registry Errors
    // =========================================================================
    #[error(
        "There is no registered dtype mapping for '{0}'. If you'd like to register a new \
         dtype mapping, use one of the `DTypeRegistry::register_*` calls. If you're expecting \
         this mapping to already exist, was the registry built with it enabled?"
    )]
    MappingNotFound(String),

    #[error("The registered dtype mapping for '{mapping}' doesn't contain type {dtype}.")]
    DTypeNotInMapping { dtype: String, mapping: String },

    #[error("The registered dtype mapping for '{mapping}' can't convert external type {external}.")]
    ExternalTypeNotInMapping { external: String, mapping: String },

    #[error("The dtype mapping for '{mapping}' produces {dtype} but can't convert it back.")]
    IncompleteMapping { dtype: String, mapping: String },

    #[error("The global dtype registry has already been initialized")]
    RegistryAlreadyInitialized,

    // =========================================================================
    // === Structural Errors
    // =========================================================================
    #[error("Too many nested subgroups: a subgroup may not contain subgroups of its own")]
    NestedSubgroups,

    #[error("A wildcard selector can't be used as a subgroup")]
    WildcardSubgroup,

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column length mismatch: expected {expected} rows, column '{column}' has {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem (e.g. the log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during config or selector parsing.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
