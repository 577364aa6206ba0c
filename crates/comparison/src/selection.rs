//! Bounded selection of products for side-by-side comparison.

use vitrine_core::{CatalogError, CatalogResult, Entity, ProductId};
use vitrine_products::DisplayProduct;

use crate::config::ComparisonConfig;
use crate::view::ComparisonView;

/// Result of [`SelectionTracker::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The selection is full; nothing changed.
    LimitReached,
}

/// Ordered set of selected product ids, at most `max_products` long.
///
/// Membership does not depend on what the grid currently shows: a product
/// filtered out of view stays selected until it is toggled off or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTracker {
    max_products: usize,
    selected: Vec<ProductId>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new(ComparisonConfig::default())
    }
}

impl SelectionTracker {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            max_products: config.max_products,
            selected: Vec::with_capacity(config.max_products),
        }
    }

    pub fn max_products(&self) -> usize {
        self.max_products
    }

    /// Remove `id` if selected, otherwise add it while there is room.
    pub fn toggle(&mut self, id: &ProductId) -> ToggleOutcome {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            return ToggleOutcome::Removed;
        }
        if self.is_full() {
            tracing::debug!(product = %id, limit = self.max_products, "selection limit reached");
            return ToggleOutcome::LimitReached;
        }
        self.selected.push(id.clone());
        ToggleOutcome::Added
    }

    pub fn is_selected(&self, id: &ProductId) -> bool {
        self.selected.contains(id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected ids in selection order.
    pub fn selected(&self) -> &[ProductId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() >= self.max_products
    }

    /// Snapshot the selected products out of `candidates` for a comparison.
    ///
    /// Products are taken in selection order and the view holds exactly the
    /// selected products. `candidates` must cover the whole selection, not
    /// only what the grid currently shows; a selected id with no candidate is
    /// `UnknownProduct`.
    pub fn start_comparison<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a DisplayProduct>,
    ) -> CatalogResult<ComparisonView> {
        if self.selected.is_empty() {
            return Err(CatalogError::EmptySelection);
        }
        let candidates: Vec<&DisplayProduct> = candidates.into_iter().collect();

        let products = self
            .selected
            .iter()
            .map(|id| {
                candidates
                    .iter()
                    .find(|p| p.has_id(id))
                    .map(|p| (*p).clone())
                    .ok_or_else(|| CatalogError::unknown(id.as_str()))
            })
            .collect::<CatalogResult<Vec<_>>>()?;
        Ok(ComparisonView::new(products))
    }
}
