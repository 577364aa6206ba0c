//! Comparison configuration.

use vitrine_core::{CatalogError, CatalogResult};

pub const ENV_COMPARE_MAX: &str = "VITRINE_COMPARE_MAX";

/// How many products fit side by side in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonConfig {
    pub max_products: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self { max_products: 3 }
    }
}

impl ComparisonConfig {
    pub fn from_env() -> CatalogResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CatalogResult<Self> {
        let max_products = match lookup(ENV_COMPARE_MAX) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| CatalogError::config(format!("{ENV_COMPARE_MAX}={raw:?}: {e}")))?,
            _ => Self::default().max_products,
        };
        if max_products == 0 {
            return Err(CatalogError::config("max_products must be at least 1"));
        }
        Ok(Self { max_products })
    }
}
