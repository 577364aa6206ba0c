//! Resolution ports: localized product detail and renderable images.
//!
//! Both are black boxes to the loader. Any error they return is a per-item
//! resolution failure; the loader never lets one escape.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use vitrine_core::{Entity, Language, ProductId};
use vitrine_products::{ImageAsset, Product, ProductDetail, TranslationBundle};

/// Failure to resolve one product's detail or image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no translation for product {product} in {language}")]
    MissingTranslation {
        product: ProductId,
        language: Language,
    },

    #[error("invalid image reference: {0:?}")]
    InvalidImage(String),

    #[error("resolution timed out after {0:?}")]
    Timeout(Duration),

    #[error("resolution failed: {0}")]
    Failed(String),
}

impl ResolveError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Resolves the localized detail of a product.
#[async_trait]
pub trait DetailResolver: Send + Sync {
    async fn resolve(
        &self,
        product: &Product,
        language: &Language,
    ) -> Result<ProductDetail, ResolveError>;
}

/// Resolves an image reference to a renderable asset.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(&self, reference: &str) -> Result<ImageAsset, ResolveError>;
}

#[async_trait]
impl DetailResolver for TranslationBundle {
    async fn resolve(
        &self,
        product: &Product,
        language: &Language,
    ) -> Result<ProductDetail, ResolveError> {
        self.detail(product, language)
            .ok_or_else(|| ResolveError::MissingTranslation {
                product: product.id().clone(),
                language: language.clone(),
            })
    }
}

/// Detail resolver that returns the raw catalog fields unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogDetails;

#[async_trait]
impl DetailResolver for CatalogDetails {
    async fn resolve(
        &self,
        product: &Product,
        _language: &Language,
    ) -> Result<ProductDetail, ResolveError> {
        Ok(ProductDetail {
            title: product.title().to_string(),
            description: product.description().to_string(),
            features: product.features().to_vec(),
            applications: product.applications().to_vec(),
            specifications: product.specifications().clone(),
        })
    }
}

/// Resolves relative image paths against a base URL.
///
/// Absolute `http(s)://` and `data:` references pass through unchanged. An
/// empty base leaves relative paths as they are.
#[derive(Debug, Clone, Default)]
pub struct StaticImageResolver {
    base_url: String,
}

impl StaticImageResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn join(&self, reference: &str) -> Result<String, ResolveError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ResolveError::InvalidImage(reference.to_string()));
        }
        let absolute = ["http://", "https://", "data:"]
            .iter()
            .any(|scheme| reference.starts_with(scheme));
        if absolute || self.base_url.is_empty() {
            return Ok(reference.to_string());
        }
        Ok(format!("{}/{}", self.base_url, reference.trim_start_matches('/')))
    }
}

#[async_trait]
impl ImageResolver for StaticImageResolver {
    async fn resolve(&self, reference: &str) -> Result<ImageAsset, ResolveError> {
        self.join(reference).map(|src| ImageAsset { src })
    }
}
