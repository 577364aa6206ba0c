//! Catalog error model.

use thiserror::Error;

/// Result type used across the catalog crates.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error.
///
/// Keep this focused on deterministic failures (validation, malformed static
/// data, misuse of the comparison flow). Per-item resolution failures are not
/// errors at this level: the loader absorbs them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An identifier was invalid (e.g. empty or padded with whitespace).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The same product id appears more than once in a catalog source.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A product id is not part of the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// A comparison was requested with nothing selected.
    #[error("comparison requires at least one selected product")]
    EmptySelection,

    /// Static catalog or translation data could not be decoded.
    #[error("malformed catalog data: {0}")]
    Malformed(String),

    /// A configuration value could not be parsed or is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CatalogError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateProduct(id.into())
    }

    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownProduct(id.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
