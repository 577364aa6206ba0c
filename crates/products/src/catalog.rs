//! Static product catalog: the ordered, read-only data source of the grid.

use std::collections::HashMap;
use std::path::Path;

use vitrine_core::{CatalogError, CatalogResult, Entity, ProductId};

use crate::category::Category;
use crate::filter::FilterState;
use crate::product::Product;

/// Ordered in-memory product collection.
///
/// Order is the definition order of the source data and is what filtering
/// and pagination preserve.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids.
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.insert(product.id().clone(), pos).is_some() {
                return Err(CatalogError::duplicate(product.id().as_str()));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a JSON array of product records.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| CatalogError::malformed(format!("catalog: {e}")))?;
        Self::new(products)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::malformed(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    pub fn require(&self, id: &ProductId) -> CatalogResult<&Product> {
        self.get(id).ok_or_else(|| CatalogError::unknown(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order, one entry per normalized key.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen: Vec<Category> = Vec::new();
        for category in self.products.iter().filter_map(Product::category) {
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
        seen
    }

    pub fn filter(&self, state: &FilterState) -> Vec<Product> {
        state.apply(&self.products)
    }
}
