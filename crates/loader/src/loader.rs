//! Progressive loader: pages a filtered product list into an append-only
//! visible list, resolving localized detail in small concurrent sub-batches.
//!
//! Every restart bumps a generation counter. A page load remembers the
//! generation it started under and drops its results if a restart happened
//! in the meantime, so a superseded load never touches the visible list or the
//! loading flags.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, warn};

use vitrine_core::{Entity, Language};
use vitrine_products::{DisplayImage, DisplayProduct, Product, ProductDetail};

use crate::config::{FailurePolicy, LoaderConfig};
use crate::resolver::{DetailResolver, ImageResolver, ResolveError};
use crate::state::{GridSnapshot, LoadOutcome, LoaderPhase};

struct LoaderState {
    generation: u64,
    products: Arc<[Product]>,
    language: Option<Language>,
    phase: LoaderPhase,
    current_page: usize,
    page_loads: usize,
    visible: Vec<DisplayProduct>,
}

struct Inner {
    details: Arc<dyn DetailResolver>,
    images: Arc<dyn ImageResolver>,
    config: LoaderConfig,
    state: Mutex<LoaderState>,
    snapshots: watch::Sender<GridSnapshot>,
}

/// Handle to a progressive loader. Clones share the same state, so a
/// sentinel driver and the grid controller can hold one each.
#[derive(Clone)]
pub struct ProgressiveLoader {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for ProgressiveLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressiveLoader")
            .field("config", &self.inner.config)
            .field("snapshot", &*self.inner.snapshots.borrow())
            .finish()
    }
}

struct PageJob {
    generation: u64,
    page: usize,
    total: usize,
    language: Language,
    items: Vec<Product>,
    /// Visible length when the page started.
    visible_before: usize,
}

/// Rolls an unfinished page back when its future is dropped mid-load
/// (timeout, `select!`, aborted task): the sub-batches it already appended
/// are removed and the loader returns to `Idle`, so the same page can be
/// loaded again. A no-op once a restart has superseded the page.
struct PageGuard<'a> {
    loader: &'a ProgressiveLoader,
    generation: u64,
    page: usize,
    visible_before: usize,
    armed: bool,
}

impl PageGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PageGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.loader.lock();
        if state.generation != self.generation {
            return;
        }
        state.visible.truncate(self.visible_before);
        state.phase = LoaderPhase::Idle;
        debug!(
            generation = self.generation,
            page = self.page,
            "page load cancelled; rolled back"
        );
        self.loader.publish(&state);
    }
}

impl ProgressiveLoader {
    /// Build a loader, rejecting an invalid config.
    pub fn new(
        details: Arc<dyn DetailResolver>,
        images: Arc<dyn ImageResolver>,
        config: LoaderConfig,
    ) -> vitrine_core::CatalogResult<Self> {
        config.validate()?;
        let (snapshots, _) = watch::channel(GridSnapshot::empty(config.page_size));
        Ok(Self {
            inner: Arc::new(Inner {
                details,
                images,
                state: Mutex::new(LoaderState {
                    generation: 0,
                    products: Arc::from(Vec::<Product>::new()),
                    language: None,
                    phase: LoaderPhase::Exhausted,
                    current_page: 0,
                    page_loads: 0,
                    visible: Vec::new(),
                }),
                config,
                snapshots,
            }),
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Subscribe to snapshots; one is published after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GridSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let state = self.lock();
        self.build_snapshot(&state)
    }

    pub fn visible_products(&self) -> Vec<DisplayProduct> {
        self.lock().visible.clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lock().phase, LoaderPhase::Loading { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        self.lock().phase == LoaderPhase::Exhausted
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Replace the list being paged and start over from page 1.
    ///
    /// Any load still in flight is superseded. An empty list goes straight to
    /// `Exhausted` without a page load.
    pub async fn restart(&self, products: Vec<Product>, language: Language) -> LoadOutcome {
        {
            let mut state = self.lock();
            state.generation += 1;
            state.products = Arc::from(products);
            state.language = Some(language);
            state.visible.clear();
            state.current_page = 0;
            state.page_loads = 0;
            state.phase = if state.products.is_empty() {
                LoaderPhase::Exhausted
            } else {
                LoaderPhase::Idle
            };
            debug!(
                generation = state.generation,
                total = state.products.len(),
                "loader restarted"
            );
            self.publish(&state);
        }
        self.load_next_page().await
    }

    /// Load exactly one more page, unless a load is in flight or everything
    /// is already visible.
    pub async fn load_next_page(&self) -> LoadOutcome {
        let job = match self.begin_page() {
            Ok(job) => job,
            Err(outcome) => return outcome,
        };
        let mut guard = PageGuard {
            loader: self,
            generation: job.generation,
            page: job.page,
            visible_before: job.visible_before,
            armed: true,
        };
        debug!(
            generation = job.generation,
            page = job.page,
            items = job.items.len(),
            "loading page"
        );

        let mut appended = 0;
        for batch in job.items.chunks(self.inner.config.batch_size) {
            let policy = self.inner.config.failure_policy;
            let resolved =
                join_all(batch.iter().map(|p| self.resolve_one(p, &job.language, policy))).await;

            let mut state = self.lock();
            if state.generation != job.generation {
                guard.disarm();
                debug!(
                    stale = job.generation,
                    current = state.generation,
                    page = job.page,
                    "discarding superseded batch"
                );
                return LoadOutcome::Superseded;
            }
            let before = state.visible.len();
            state.visible.extend(resolved.into_iter().flatten());
            appended += state.visible.len() - before;
            self.publish(&state);
        }

        guard.disarm();
        let mut state = self.lock();
        if state.generation != job.generation {
            return LoadOutcome::Superseded;
        }
        state.current_page = job.page;
        state.page_loads += 1;
        let exhausted = job.page * self.inner.config.page_size >= job.total;
        state.phase = if exhausted {
            LoaderPhase::Exhausted
        } else {
            LoaderPhase::Idle
        };
        self.publish(&state);
        debug!(page = job.page, appended, exhausted, "page loaded");

        LoadOutcome::Loaded {
            page: job.page,
            appended,
            exhausted,
        }
    }

    fn begin_page(&self) -> Result<PageJob, LoadOutcome> {
        let mut state = self.lock();
        match state.phase {
            LoaderPhase::Loading { .. } => return Err(LoadOutcome::AlreadyLoading),
            LoaderPhase::Exhausted => return Err(LoadOutcome::Exhausted),
            LoaderPhase::Idle => {}
        }
        let Some(language) = state.language.clone() else {
            return Err(LoadOutcome::Exhausted);
        };

        let page_size = self.inner.config.page_size;
        let total = state.products.len();
        let start = (state.current_page * page_size).min(total);
        let end = (start + page_size).min(total);
        let page = state.current_page + 1;
        let items = state.products[start..end].to_vec();

        state.phase = LoaderPhase::Loading { page };
        self.publish(&state);

        Ok(PageJob {
            generation: state.generation,
            page,
            total,
            language,
            items,
            visible_before: state.visible.len(),
        })
    }

    /// Resolve products outside the paging cycle, e.g. selected products the
    /// current filter hides.
    ///
    /// Uses the same sub-batches and timeouts as a page load but never touches
    /// the visible list, and always falls back instead of skipping, so the
    /// result has one record per input, in input order.
    pub async fn resolve_products(
        &self,
        products: &[Product],
        language: &Language,
    ) -> Vec<DisplayProduct> {
        let mut out = Vec::with_capacity(products.len());
        for batch in products.chunks(self.inner.config.batch_size) {
            let resolved = join_all(
                batch
                    .iter()
                    .map(|p| self.resolve_one(p, language, FailurePolicy::Fallback)),
            )
            .await;
            out.extend(resolved.into_iter().flatten());
        }
        out
    }

    /// Resolve one product. Never fails: errors, timeouts and resolver panics
    /// degrade to a fallback record or to `None` under `FailurePolicy::Skip`.
    async fn resolve_one(
        &self,
        product: &Product,
        language: &Language,
        policy: FailurePolicy,
    ) -> Option<DisplayProduct> {
        let (detail, image) =
            futures::join!(self.resolve_detail(product, language), self.resolve_image(product));

        match detail {
            Ok(detail) => Some(DisplayProduct::resolved(product, detail, image)),
            Err(err) => {
                warn!(
                    product = %product.id(),
                    language = %language,
                    error = %err,
                    "product detail resolution failed"
                );
                match policy {
                    FailurePolicy::Fallback => Some(DisplayProduct::fallback(product, image)),
                    FailurePolicy::Skip => None,
                }
            }
        }
    }

    async fn resolve_detail(
        &self,
        product: &Product,
        language: &Language,
    ) -> Result<ProductDetail, ResolveError> {
        let timeout = self.inner.config.resolve_timeout;
        let call = AssertUnwindSafe(self.inner.details.resolve(product, language)).catch_unwind();
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ResolveError::failed("detail resolver panicked")),
            Err(_) => Err(ResolveError::Timeout(timeout)),
        }
    }

    async fn resolve_image(&self, product: &Product) -> DisplayImage {
        let Some(reference) = product.image() else {
            return DisplayImage::None;
        };
        let timeout = self.inner.config.resolve_timeout;
        let call = AssertUnwindSafe(self.inner.images.resolve(reference)).catch_unwind();
        let result = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ResolveError::failed("image resolver panicked")),
            Err(_) => Err(ResolveError::Timeout(timeout)),
        };
        match result {
            Ok(asset) => DisplayImage::Resolved(asset),
            Err(err) => {
                warn!(product = %product.id(), reference, error = %err, "image resolution failed");
                DisplayImage::Unresolved(reference.to_string())
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn build_snapshot(&self, state: &LoaderState) -> GridSnapshot {
        GridSnapshot {
            generation: state.generation,
            phase: state.phase,
            current_page: state.current_page,
            page_size: self.inner.config.page_size,
            total: state.products.len(),
            page_loads: state.page_loads,
            visible: state.visible.clone(),
        }
    }

    fn publish(&self, state: &LoaderState) {
        self.inner.snapshots.send_replace(self.build_snapshot(state));
    }
}
