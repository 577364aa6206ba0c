//! Translation bundles: localized product text keyed by language and id.
//!
//! Bundles are plain JSON documents:
//!
//! ```json
//! {
//!   "default_language": "en",
//!   "languages": {
//!     "en": { "c": { "title": "Manhole Covers", "features": ["EN 124"] } },
//!     "ru": { "c": { "title": "Люки канализационные" } }
//!   }
//! }
//! ```
//!
//! Every field of an entry is optional; absent fields fall back to the raw
//! catalog value. Patch bundles use the same shape and are merged field by
//! field.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use vitrine_core::{CatalogError, CatalogResult, Entity, Language, ProductId};

use crate::product::{Product, ProductDetail, Specifications};

/// Localized fields of one product in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
}

impl LocalizedEntry {
    /// Overlay `patch` onto this entry. Returns the number of fields replaced.
    fn merge(&mut self, patch: LocalizedEntry) -> usize {
        let mut changed = 0;
        if let Some(v) = patch.title {
            self.title = Some(v);
            changed += 1;
        }
        if let Some(v) = patch.description {
            self.description = Some(v);
            changed += 1;
        }
        if let Some(v) = patch.features {
            self.features = Some(v);
            changed += 1;
        }
        if let Some(v) = patch.applications {
            self.applications = Some(v);
            changed += 1;
        }
        if let Some(v) = patch.specifications {
            self.specifications = Some(v);
            changed += 1;
        }
        changed
    }

    fn detail_over(&self, product: &Product) -> ProductDetail {
        ProductDetail {
            title: self.title.clone().unwrap_or_else(|| product.title().to_string()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| product.description().to_string()),
            features: self
                .features
                .clone()
                .unwrap_or_else(|| product.features().to_vec()),
            applications: self
                .applications
                .clone()
                .unwrap_or_else(|| product.applications().to_vec()),
            specifications: self
                .specifications
                .clone()
                .unwrap_or_else(|| product.specifications().clone()),
        }
    }
}

/// Summary of a [`TranslationBundle::merge_patch`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub entries_added: usize,
    pub fields_replaced: usize,
}

/// Localized product text for every supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationBundle {
    default_language: Language,
    #[serde(default)]
    languages: BTreeMap<Language, BTreeMap<ProductId, LocalizedEntry>>,
}

impl TranslationBundle {
    pub fn new(default_language: Language) -> Self {
        Self {
            default_language,
            languages: BTreeMap::new(),
        }
    }

    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        serde_json::from_str(json).map_err(|e| CatalogError::malformed(format!("translations: {e}")))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::malformed(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> CatalogResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::malformed(format!("translations: {e}")))
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.languages.keys()
    }

    pub fn insert(&mut self, language: Language, id: ProductId, entry: LocalizedEntry) {
        self.languages.entry(language).or_default().insert(id, entry);
    }

    /// Entry for `id` in `language`, trying the exact tag before the primary
    /// subtag (`pt-br` then `pt`).
    pub fn entry(&self, id: &ProductId, language: &Language) -> Option<&LocalizedEntry> {
        if let Some(entry) = self.languages.get(language).and_then(|m| m.get(id)) {
            return Some(entry);
        }
        if language.primary() != language.as_str() {
            let primary = Language::new(language.primary()).ok()?;
            return self.languages.get(&primary).and_then(|m| m.get(id));
        }
        None
    }

    /// Localized detail of `product`, falling back to the default language.
    ///
    /// `None` when neither the requested nor the default language has an
    /// entry for the product.
    pub fn detail(&self, product: &Product, language: &Language) -> Option<ProductDetail> {
        self.entry(product.id(), language)
            .or_else(|| self.entry(product.id(), &self.default_language))
            .map(|entry| entry.detail_over(product))
    }

    /// Overlay a patch bundle onto this one, field by field.
    ///
    /// The patch's default language is ignored; only its entries are merged.
    pub fn merge_patch(&mut self, patch: TranslationBundle) -> PatchReport {
        let mut report = PatchReport::default();
        for (language, entries) in patch.languages {
            let target = self.languages.entry(language).or_default();
            for (id, entry) in entries {
                match target.get_mut(&id) {
                    Some(existing) => report.fields_replaced += existing.merge(entry),
                    None => {
                        target.insert(id, entry);
                        report.entries_added += 1;
                    }
                }
            }
        }
        tracing::debug!(
            entries_added = report.entries_added,
            fields_replaced = report.fields_replaced,
            "translation patch merged"
        );
        report
    }

    /// Ids of `products` with no entry in `language` (exact or primary
    /// subtag). Useful when maintaining bundles.
    pub fn missing<'a>(
        &self,
        products: impl IntoIterator<Item = &'a Product>,
        language: &Language,
    ) -> Vec<ProductId> {
        products
            .into_iter()
            .filter(|p| self.entry(p.id(), language).is_none())
            .map(|p| p.id().clone())
            .collect()
    }
}
