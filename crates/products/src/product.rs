//! Catalog product records and their display copies.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use vitrine_core::{Entity, ProductId};

use crate::category::{self, Category};

/// Specification table of a product: spec name → spec value.
///
/// Keys are unique. Definition order is kept so that comparison rows come
/// out in a stable first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifications(Vec<(String, String)>);

impl Specifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Specifications {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut specs = Self::new();
        for (k, v) in iter {
            specs.insert(k, v);
        }
        specs
    }
}

impl Serialize for Specifications {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct SpecificationsVisitor;

impl<'de> Visitor<'de> for SpecificationsVisitor {
    type Value = Specifications;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("a map of specification names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut specs = Specifications::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            if specs.contains_key(&key) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate specification key: {key}"
                )));
            }
            specs.0.push((key, value));
        }
        Ok(specs)
    }
}

impl<'de> Deserialize<'de> for Specifications {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SpecificationsVisitor)
    }
}

/// Catalog item as defined by the static product data.
///
/// The grid never mutates a `Product`; it filters, pages and annotates
/// read-only copies ([`DisplayProduct`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    #[serde(default, deserialize_with = "category::deserialize_optional")]
    category: Option<Category>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    applications: Vec<String>,
    #[serde(default)]
    specifications: Specifications,
    #[serde(default)]
    image: Option<String>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>) -> Self {
        Self {
            id,
            category: None,
            title: title.into(),
            description: String::new(),
            features: Vec::new(),
            applications: Vec::new(),
            specifications: Specifications::new(),
            image: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(Category::new(category));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_applications<I, S>(mut self, applications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applications = applications.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_specifications(mut self, specifications: Specifications) -> Self {
        self.specifications = specifications;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn applications(&self) -> &[String] {
        &self.applications
    }

    pub fn specifications(&self) -> &Specifications {
        &self.specifications
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Localized detail for one product in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub applications: Vec<String>,
    pub specifications: Specifications,
}

/// Renderable image asset produced by an image resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub src: String,
}

/// Image state of a display record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum DisplayImage {
    /// The product has no image reference.
    None,
    /// The reference was resolved to a renderable asset.
    Resolved(ImageAsset),
    /// Resolution failed; the raw catalog reference is passed through.
    Unresolved(String),
}

/// Where a display record's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailSource {
    Resolved,
    /// Detail resolution failed; built from the raw catalog fields.
    Fallback,
}

/// Read-only, localized copy of a product, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProduct {
    pub id: ProductId,
    pub category: Option<Category>,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub applications: Vec<String>,
    pub specifications: Specifications,
    pub image: DisplayImage,
    pub source: DetailSource,
}

impl DisplayProduct {
    pub fn resolved(product: &Product, detail: ProductDetail, image: DisplayImage) -> Self {
        Self {
            id: product.id.clone(),
            category: product.category.clone(),
            title: detail.title,
            description: detail.description,
            features: detail.features,
            applications: detail.applications,
            specifications: detail.specifications,
            image,
            source: DetailSource::Resolved,
        }
    }

    /// Best-effort record from the raw catalog fields: title, description and
    /// category as given, no features, applications or specifications.
    pub fn fallback(product: &Product, image: DisplayImage) -> Self {
        Self {
            id: product.id.clone(),
            category: product.category.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            features: Vec::new(),
            applications: Vec::new(),
            specifications: Specifications::new(),
            image,
            source: DetailSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DetailSource::Fallback
    }
}

impl Entity for DisplayProduct {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
