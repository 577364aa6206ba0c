//! Product grid controller: explicit filter state + language driving a
//! progressive loader over a shared catalog.

use std::sync::Arc;

use tracing::{debug, info};

use vitrine_core::{CatalogResult, Entity, Language, ProductId};
use vitrine_products::{Catalog, CategorySelection, DisplayProduct, FilterState};

use crate::loader::ProgressiveLoader;
use crate::state::{GridSnapshot, LoadOutcome};

/// One product grid on screen.
///
/// Every change of category, search text or language re-runs the filter over
/// the catalog and restarts paging from page 1.
#[derive(Debug)]
pub struct ProductGrid {
    catalog: Arc<Catalog>,
    filter: FilterState,
    language: Language,
    loader: ProgressiveLoader,
}

impl ProductGrid {
    pub fn new(catalog: Arc<Catalog>, language: Language, loader: ProgressiveLoader) -> Self {
        Self {
            catalog,
            filter: FilterState::default(),
            language,
            loader,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Loader handle, e.g. for a sentinel driver.
    pub fn loader(&self) -> &ProgressiveLoader {
        &self.loader
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.loader.snapshot()
    }

    /// Switch category and language and start loading from page 1.
    ///
    /// Always restarts, even when nothing changed.
    pub async fn reset(
        &mut self,
        category: impl Into<CategorySelection>,
        language: Language,
    ) -> LoadOutcome {
        let filter = self.filter.clone().with_category(category);
        self.reset_with_filter(filter, language).await
    }

    /// Replace the whole filter and the language with a single restart.
    pub async fn reset_with_filter(
        &mut self,
        filter: FilterState,
        language: Language,
    ) -> LoadOutcome {
        self.filter = filter;
        self.language = language;
        self.refresh().await
    }

    pub async fn set_category(&mut self, category: impl Into<CategorySelection>) -> LoadOutcome {
        let filter = self.filter.clone().with_category(category);
        self.apply_filter(filter).await
    }

    /// Update the search text. Changes that only differ in surrounding
    /// whitespace or case do not restart the grid.
    pub async fn set_search(&mut self, search: impl Into<String>) -> LoadOutcome {
        let filter = self.filter.clone().with_search(search);
        self.apply_filter(filter).await
    }

    async fn apply_filter(&mut self, filter: FilterState) -> LoadOutcome {
        let unchanged = filter.selects_same(&self.filter);
        self.filter = filter;
        if unchanged {
            return LoadOutcome::Unchanged;
        }
        self.refresh().await
    }

    pub async fn set_language(&mut self, language: Language) -> LoadOutcome {
        if language == self.language {
            return LoadOutcome::Unchanged;
        }
        self.language = language;
        self.refresh().await
    }

    /// "Reset filters" action of the empty-result state.
    pub async fn reset_filters(&mut self) -> LoadOutcome {
        if self.filter.is_default() {
            return LoadOutcome::Unchanged;
        }
        self.filter = FilterState::default();
        self.refresh().await
    }

    pub async fn load_next_page(&self) -> LoadOutcome {
        self.loader.load_next_page().await
    }

    /// Display records for `selected`, whatever the current filter shows.
    ///
    /// Visible records are reused; selected products that are filtered out
    /// or not paged in yet are looked up in the catalog and resolved in the
    /// current language. An id missing from the catalog is an error.
    pub async fn comparison_candidates(
        &self,
        selected: &[ProductId],
    ) -> CatalogResult<Vec<DisplayProduct>> {
        let mut candidates: Vec<DisplayProduct> = self
            .loader
            .visible_products()
            .into_iter()
            .filter(|p| selected.contains(p.id()))
            .collect();

        let mut hidden = Vec::new();
        for id in selected {
            if !candidates.iter().any(|p| p.has_id(id)) {
                hidden.push(self.catalog.require(id)?.clone());
            }
        }
        if !hidden.is_empty() {
            debug!(hidden = hidden.len(), "resolving selected products outside the visible list");
            candidates.extend(self.loader.resolve_products(&hidden, &self.language).await);
        }
        Ok(candidates)
    }

    async fn refresh(&self) -> LoadOutcome {
        let products = self.catalog.filter(&self.filter);
        info!(
            category = %self.filter.category(),
            search = %self.filter.search().trim(),
            language = %self.language,
            matched = products.len(),
            "product grid reset"
        );
        self.loader.restart(products, self.language.clone()).await
    }
}
