//! Loader configuration (page size, sub-batch size, timeouts).

use std::str::FromStr;
use std::time::Duration;

use vitrine_core::{CatalogError, CatalogResult};

pub const ENV_PAGE_SIZE: &str = "VITRINE_PAGE_SIZE";
pub const ENV_BATCH_SIZE: &str = "VITRINE_BATCH_SIZE";
pub const ENV_RESOLVE_TIMEOUT_MS: &str = "VITRINE_RESOLVE_TIMEOUT_MS";
pub const ENV_FAILURE_POLICY: &str = "VITRINE_FAILURE_POLICY";

/// What to do with a product whose detail could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Render it from its raw catalog fields.
    #[default]
    Fallback,
    /// Leave it out of the visible list.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "skip" => Ok(Self::Skip),
            other => Err(CatalogError::config(format!(
                "unknown failure policy {other:?} (expected fallback|skip)"
            ))),
        }
    }
}

/// Progressive loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Products revealed per page.
    pub page_size: usize,
    /// Products resolved concurrently within a page.
    pub batch_size: usize,
    /// Per-item detail/image resolution timeout.
    pub resolve_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            batch_size: 3,
            resolve_timeout: Duration::from_secs(5),
            failure_policy: FailurePolicy::Fallback,
        }
    }
}

impl LoaderConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if self.page_size == 0 {
            return Err(CatalogError::config("page_size must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(CatalogError::config("batch_size must be at least 1"));
        }
        if self.resolve_timeout.is_zero() {
            return Err(CatalogError::config("resolve_timeout must be positive"));
        }
        Ok(())
    }

    /// Read overrides from the process environment (`VITRINE_*`).
    pub fn from_env() -> CatalogResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CatalogResult<Self> {
        let defaults = Self::default();
        let config = Self {
            page_size: parse_or(&lookup, ENV_PAGE_SIZE, defaults.page_size)?,
            batch_size: parse_or(&lookup, ENV_BATCH_SIZE, defaults.batch_size)?,
            resolve_timeout: Duration::from_millis(parse_or(
                &lookup,
                ENV_RESOLVE_TIMEOUT_MS,
                defaults.resolve_timeout.as_millis() as u64,
            )?),
            failure_policy: parse_or(&lookup, ENV_FAILURE_POLICY, defaults.failure_policy)?,
        };
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> CatalogResult<T>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| CatalogError::config(format!("{key}={raw:?}: {e}"))),
        _ => Ok(default),
    }
}
