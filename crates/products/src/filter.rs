//! Category/search filter over the catalog.
//!
//! The filter is a pure function of `(products, category, search)`: no hidden
//! state, stable output order, safe to call on every UI state change.

use vitrine_core::ValueObject;

use crate::category::CategorySelection;
use crate::product::Product;

/// Active filter inputs of a product grid.
///
/// Immutable: a changed filter is a new value (`with_category`,
/// `with_search`, or `FilterState::default()` for "all, no search").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    category: CategorySelection,
    search: String,
}

impl FilterState {
    pub fn new(category: impl Into<CategorySelection>, search: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search: search.into(),
        }
    }

    pub fn category(&self) -> &CategorySelection {
        &self.category
    }

    /// Search text as typed.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn with_category(self, category: impl Into<CategorySelection>) -> Self {
        Self {
            category: category.into(),
            ..self
        }
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    /// `true` when the filter lets every product through.
    pub fn is_default(&self) -> bool {
        self.category.is_all() && self.search.trim().is_empty()
    }

    /// Whether both filters select the same products: equal category and
    /// search text equal up to surrounding whitespace and case.
    pub fn selects_same(&self, other: &FilterState) -> bool {
        self.category == other.category
            && self.search.trim().to_lowercase() == other.search.trim().to_lowercase()
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        filter(products, &self.category, &self.search)
    }
}

impl ValueObject for FilterState {}

/// Whether a single product passes the category and search constraints.
///
/// `search` is expected to be trimmed and lower-cased already; an empty needle
/// matches everything.
fn passes(product: &Product, category: &CategorySelection, needle: &str) -> bool {
    if !category.matches(product.category()) {
        return false;
    }
    if needle.is_empty() {
        return true;
    }
    product.title().to_lowercase().contains(needle)
        || product.description().to_lowercase().contains(needle)
}

/// Filter `products` by category and free-text search, preserving order.
///
/// Category and search are conjunctive. Search is a case-insensitive substring
/// test on title or description; blank search text imposes no constraint.
pub fn filter(products: &[Product], category: &CategorySelection, search: &str) -> Vec<Product> {
    let needle = search.trim().to_lowercase();
    let out: Vec<Product> = products
        .iter()
        .filter(|p| passes(p, category, &needle))
        .cloned()
        .collect();

    tracing::trace!(
        category = %category,
        search = %needle,
        considered = products.len(),
        matched = out.len(),
        "catalog filter applied"
    );

    out
}
