//! Category tags and the category half of the catalog filter.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use vitrine_core::ValueObject;

/// Canonical comparison key for a category tag.
///
/// Lower-cases and strips `-` and `_`, so `Cast-Iron`, `cast_iron` and
/// `castiron` compare equal. Tags come from several static sources with
/// different spelling conventions.
pub fn normalize(tag: &str) -> String {
    tag.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category tag attached to a product.
///
/// Keeps the spelling it was defined with for display; equality and hashing
/// use the normalized key.
#[derive(Debug, Clone)]
pub struct Category {
    raw: String,
    key: String,
}

impl Category {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = normalize(&raw);
        Self { raw, key }
    }

    /// Tag as written in the catalog source.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Category {}

impl core::hash::Hash for Category {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl ValueObject for Category {}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Category::new)
    }
}

/// Deserialize an optional category, treating `null`, a missing field and a
/// blank string alike: the product has no category.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(Category::new))
}

/// Category constraint of a filter: everything, or one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Only(Category),
}

impl CategorySelection {
    /// Parse a UI category value. `"all"` (any case) and blank input select
    /// everything.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(Category::new(trimmed))
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Products without a category only match `All`.
    pub fn matches(&self, category: Option<&Category>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => category.is_some_and(|c| c == wanted),
        }
    }
}

impl core::fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(c) => core::fmt::Display::fmt(c, f),
        }
    }
}

impl From<&str> for CategorySelection {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Category> for CategorySelection {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}

impl ValueObject for CategorySelection {}
