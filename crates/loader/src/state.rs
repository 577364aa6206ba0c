//! Observable loader state.

use serde::Serialize;

use vitrine_products::DisplayProduct;

/// Loader state machine: `Idle -> Loading(page) -> Idle`, terminal `Exhausted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum LoaderPhase {
    Idle,
    Loading { page: usize },
    Exhausted,
}

/// Result of a load trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page `page` was resolved and appended.
    Loaded {
        page: usize,
        appended: usize,
        exhausted: bool,
    },
    /// A load was already in flight; the trigger was ignored.
    AlreadyLoading,
    /// Every page is already visible (or there is nothing to show).
    Exhausted,
    /// A reset superseded this load; its results were discarded.
    Superseded,
    /// The filter inputs did not change, so nothing was restarted.
    Unchanged,
}

/// Point-in-time view of a grid, published after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    /// Reset counter; bumps on every restart.
    pub generation: u64,
    pub phase: LoaderPhase,
    /// Last fully loaded page (0 before the first page completes).
    pub current_page: usize,
    pub page_size: usize,
    /// Number of products after filtering.
    pub total: usize,
    /// Pages loaded since the last restart.
    pub page_loads: usize,
    pub visible: Vec<DisplayProduct>,
}

impl GridSnapshot {
    pub(crate) fn empty(page_size: usize) -> Self {
        Self {
            generation: 0,
            phase: LoaderPhase::Exhausted,
            current_page: 0,
            page_size,
            total: 0,
            page_loads: 0,
            visible: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoaderPhase::Loading { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == LoaderPhase::Exhausted
    }

    /// "Load more" affordance should be shown.
    pub fn has_more(&self) -> bool {
        self.phase == LoaderPhase::Idle
    }

    /// Filtering matched nothing: render "no products found" and offer a
    /// filter reset.
    pub fn is_empty_result(&self) -> bool {
        self.is_exhausted() && self.total == 0
    }

    /// "End of results" indicator should be shown.
    pub fn is_end_of_results(&self) -> bool {
        self.is_exhausted() && self.total > 0
    }
}
