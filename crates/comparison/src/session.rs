//! Comparison session: the selection plus the view opened from it.

use vitrine_core::{CatalogResult, ProductId};
use vitrine_products::DisplayProduct;

use crate::config::ComparisonConfig;
use crate::selection::{SelectionTracker, ToggleOutcome};
use crate::view::ComparisonView;

/// Comparison state owned by one UI session.
///
/// Starts with an empty selection. Opening freezes the selected products
/// into a [`ComparisonView`]; closing drops the view and clears the selection.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSession {
    tracker: SelectionTracker,
    view: Option<ComparisonView>,
}

impl ComparisonSession {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            tracker: SelectionTracker::new(config),
            view: None,
        }
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn toggle(&mut self, id: &ProductId) -> ToggleOutcome {
        self.tracker.toggle(id)
    }

    pub fn is_selected(&self, id: &ProductId) -> bool {
        self.tracker.is_selected(id)
    }

    pub fn clear(&mut self) {
        self.tracker.clear();
    }

    /// Open (or reopen) the comparison over the current selection.
    pub fn open<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a DisplayProduct>,
    ) -> CatalogResult<&ComparisonView> {
        let view = self.tracker.start_comparison(candidates)?;
        tracing::debug!(view = %view.id(), products = view.products().len(), "comparison opened");
        Ok(self.view.insert(view))
    }

    pub fn view(&self) -> Option<&ComparisonView> {
        self.view.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn close(&mut self) {
        if let Some(view) = self.view.take() {
            tracing::debug!(view = %view.id(), "comparison closed");
        }
        self.tracker.clear();
    }
}
