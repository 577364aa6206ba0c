//! Strongly-typed identifiers used across the catalog.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// Identifier of a catalog product.
///
/// Stable and immutable once the product is defined in the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

/// Language tag of the active locale (`en`, `ru`, `pt-br`, ...).
///
/// Stored lower-cased so `EN` and `en` address the same translations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = CatalogError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                <$t>::new(value)
            }
        }

        impl FromStr for $t {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$t>::new(s)
                    .map_err(|e| CatalogError::invalid_id(format!("{}: {}", $name, e)))
            }
        }
    };
}

impl ProductId {
    /// Create a product id. Rejects empty ids and ids padded with whitespace.
    pub fn new(value: impl Into<String>) -> CatalogResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(CatalogError::invalid_id("product id cannot be empty"));
        }
        if value.trim() != value {
            return Err(CatalogError::invalid_id(format!(
                "product id has surrounding whitespace: {value:?}"
            )));
        }
        Ok(Self(value))
    }
}

impl Language {
    /// Create a language tag (ASCII alphanumerics and `-`), lower-cased.
    pub fn new(value: impl Into<String>) -> CatalogResult<Self> {
        let value = value.into().trim().to_ascii_lowercase();
        if value.is_empty() {
            return Err(CatalogError::invalid_id("language tag cannot be empty"));
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(CatalogError::invalid_id(format!(
                "language tag contains invalid characters: {value:?}"
            )));
        }
        Ok(Self(value))
    }

    /// Primary subtag (`pt` for `pt-br`).
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl_string_newtype!(ProductId, "ProductId");
impl_string_newtype!(Language, "Language");
