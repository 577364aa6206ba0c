use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use vitrine_core::{Entity, Language, ProductId};
use vitrine_loader::{
    CatalogDetails, DetailResolver, LoadOutcome, LoaderConfig, ProgressiveLoader, ResolveError,
    SentinelEvent, StaticImageResolver, drive_sentinel, spawn_sentinel,
};
use vitrine_products::{CategorySelection, DisplayProduct, Product, ProductDetail, filter};

fn en() -> Language {
    Language::new("en").unwrap()
}

fn product(id: &str, category: &str) -> Product {
    Product::new(ProductId::new(id).unwrap(), format!("Title {id}")).with_category(category)
}

fn ids(products: &[DisplayProduct]) -> Vec<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}

fn build(details: Arc<dyn DetailResolver>, config: LoaderConfig) -> ProgressiveLoader {
    ProgressiveLoader::new(details, Arc::new(StaticImageResolver::default()), config).unwrap()
}

async fn wait_until_loading(loader: &ProgressiveLoader) {
    while !loader.is_loading() {
        tokio::task::yield_now().await;
    }
}

/// Holds resolution of products in `gated` categories until permits are added.
struct Gated {
    gate: Semaphore,
    gated: &'static str,
}

#[async_trait]
impl DetailResolver for Gated {
    async fn resolve(
        &self,
        product: &Product,
        language: &Language,
    ) -> Result<ProductDetail, ResolveError> {
        if product.category().is_some_and(|c| c.key() == self.gated) {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| ResolveError::failed("gate closed"))?;
            permit.forget();
        }
        CatalogDetails.resolve(product, language).await
    }
}

#[tokio::test]
async fn reset_discards_results_of_the_superseded_load() {
    let catalog = vec![
        product("a1", "aluminum"),
        product("a2", "aluminum"),
        product("s1", "steel"),
        product("s2", "steel"),
    ];
    let resolver = Arc::new(Gated { gate: Semaphore::new(0), gated: "aluminum" });
    let loader = build(resolver.clone(), LoaderConfig::default().with_page_size(10));

    let aluminum = filter(&catalog, &CategorySelection::parse("aluminum"), "");
    let stale = tokio::spawn({
        let loader = loader.clone();
        async move { loader.restart(aluminum, en()).await }
    });
    wait_until_loading(&loader).await;

    let steel = filter(&catalog, &CategorySelection::parse("steel"), "");
    let outcome = loader.restart(steel, en()).await;
    assert_eq!(outcome, LoadOutcome::Loaded { page: 1, appended: 2, exhausted: true });

    resolver.gate.add_permits(16);
    assert_eq!(stale.await.unwrap(), LoadOutcome::Superseded);

    assert_eq!(ids(&loader.visible_products()), vec!["s1", "s2"]);
    assert!(loader.is_exhausted());
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn triggers_while_loading_are_ignored() {
    let catalog: Vec<Product> = (0..6).map(|i| product(&format!("a{i}"), "aluminum")).collect();
    let resolver = Arc::new(Gated { gate: Semaphore::new(0), gated: "aluminum" });
    let loader = build(resolver.clone(), LoaderConfig::default().with_page_size(3));

    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.restart(catalog, en()).await }
    });
    wait_until_loading(&loader).await;

    assert_eq!(loader.load_next_page().await, LoadOutcome::AlreadyLoading);
    assert_eq!(loader.load_next_page().await, LoadOutcome::AlreadyLoading);

    resolver.gate.add_permits(16);
    assert_eq!(
        first.await.unwrap(),
        LoadOutcome::Loaded { page: 1, appended: 3, exhausted: false }
    );
    assert_eq!(loader.snapshot().page_loads, 1);
    assert_eq!(loader.visible_products().len(), 3);
}

/// Records how many products were visible when each item's resolution began.
struct Probe {
    loader: Mutex<Option<ProgressiveLoader>>,
    seen: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl DetailResolver for Probe {
    async fn resolve(
        &self,
        product: &Product,
        language: &Language,
    ) -> Result<ProductDetail, ResolveError> {
        let visible = self
            .loader
            .lock()
            .unwrap()
            .as_ref()
            .map(|l| l.visible_products().len())
            .unwrap_or_default();
        self.seen.lock().unwrap().push((product.id().to_string(), visible));
        CatalogDetails.resolve(product, language).await
    }
}

#[tokio::test]
async fn sub_batches_are_appended_in_order_before_the_next_starts() {
    let probe = Arc::new(Probe { loader: Mutex::new(None), seen: Mutex::new(Vec::new()) });
    let loader = build(
        probe.clone(),
        LoaderConfig::default().with_page_size(7).with_batch_size(3),
    );
    *probe.loader.lock().unwrap() = Some(loader.clone());

    let catalog: Vec<Product> = (0..7).map(|i| product(&format!("p{i}"), "steel")).collect();
    loader.restart(catalog, en()).await;

    let seen = probe.seen.lock().unwrap().clone();
    let visible_at_start: Vec<usize> = seen.iter().map(|(_, v)| *v).collect();
    assert_eq!(visible_at_start, vec![0, 0, 0, 3, 3, 3, 6]);
    assert_eq!(
        ids(&loader.visible_products()),
        vec!["p0", "p1", "p2", "p3", "p4", "p5", "p6"]
    );

    // break the Arc cycle between probe and loader
    probe.loader.lock().unwrap().take();
}

#[tokio::test(start_paused = true)]
async fn cancelled_page_load_rolls_back_and_can_be_retried() {
    let mut catalog: Vec<Product> = (0..6).map(|i| product(&format!("s{i}"), "steel")).collect();
    catalog.push(product("a0", "aluminum"));
    catalog.push(product("a1", "aluminum"));
    let resolver = Arc::new(Gated { gate: Semaphore::new(0), gated: "aluminum" });
    let loader = build(
        resolver.clone(),
        LoaderConfig::default().with_page_size(4).with_batch_size(2),
    );
    loader.restart(catalog, en()).await;
    assert_eq!(ids(&loader.visible_products()), vec!["s0", "s1", "s2", "s3"]);

    // s4/s5 resolve and append, then the a0/a1 sub-batch blocks on the gate.
    let cancelled = tokio::time::timeout(Duration::from_millis(50), loader.load_next_page()).await;
    assert!(cancelled.is_err());

    assert!(!loader.is_loading());
    assert!(loader.snapshot().has_more());
    assert_eq!(ids(&loader.visible_products()), vec!["s0", "s1", "s2", "s3"]);
    assert_eq!(loader.snapshot().current_page, 1);

    resolver.gate.add_permits(16);
    assert_eq!(
        loader.load_next_page().await,
        LoadOutcome::Loaded { page: 2, appended: 4, exhausted: true }
    );
    assert_eq!(
        ids(&loader.visible_products()),
        vec!["s0", "s1", "s2", "s3", "s4", "s5", "a0", "a1"]
    );
    assert_eq!(loader.snapshot().page_loads, 2);
}

#[tokio::test]
async fn aborted_sentinel_driver_does_not_wedge_the_loader() {
    let catalog = vec![
        product("s0", "steel"),
        product("a0", "aluminum"),
        product("s1", "steel"),
    ];
    let resolver = Arc::new(Gated { gate: Semaphore::new(0), gated: "aluminum" });
    let loader = build(resolver.clone(), LoaderConfig::default().with_page_size(1));
    loader.restart(catalog, en()).await;

    let (handle, join) = spawn_sentinel(loader.clone());
    handle.visible();
    wait_until_loading(&loader).await;
    join.abort();
    let _ = join.await;

    // The aborted load task is dropped by the runtime shortly after.
    tokio::time::timeout(Duration::from_secs(1), async {
        while loader.is_loading() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("loader still loading after its driver was aborted");
    resolver.gate.add_permits(16);
    assert_eq!(
        loader.load_next_page().await,
        LoadOutcome::Loaded { page: 2, appended: 1, exhausted: false }
    );
    assert_eq!(ids(&loader.visible_products()), vec!["s0", "a0"]);
}

struct Slow {
    delay: Duration,
}

#[async_trait]
impl DetailResolver for Slow {
    async fn resolve(
        &self,
        product: &Product,
        language: &Language,
    ) -> Result<ProductDetail, ResolveError> {
        if product.id().as_str() == "slow" {
            tokio::time::sleep(self.delay).await;
        }
        CatalogDetails.resolve(product, language).await
    }
}

#[tokio::test(start_paused = true)]
async fn timed_out_items_fall_back_without_failing_the_page() {
    let loader = build(
        Arc::new(Slow { delay: Duration::from_secs(60) }),
        LoaderConfig::default()
            .with_page_size(5)
            .with_resolve_timeout(Duration::from_secs(2)),
    );
    let catalog = vec![
        product("fast", "steel").with_features(["x"]),
        product("slow", "steel").with_features(["y"]),
    ];

    let outcome = loader.restart(catalog, en()).await;
    assert_eq!(outcome, LoadOutcome::Loaded { page: 1, appended: 2, exhausted: true });

    let visible = loader.visible_products();
    assert!(!visible[0].is_fallback());
    assert!(visible[1].is_fallback());
    assert!(visible[1].features.is_empty());
}

#[tokio::test]
async fn sentinel_stream_drives_pages_to_exhaustion() {
    let loader = build(Arc::new(CatalogDetails), LoaderConfig::default().with_page_size(2));
    let catalog: Vec<Product> = (0..5).map(|i| product(&format!("p{i}"), "steel")).collect();
    loader.restart(catalog, en()).await;

    let events = futures::stream::iter([
        SentinelEvent::Visible,
        SentinelEvent::LoadMoreClicked,
    ]);
    drive_sentinel(loader.clone(), events).await;

    // One page from restart plus one per trigger, whichever way they interleave.
    let snapshot = loader.snapshot();
    assert!(snapshot.page_loads >= 2);
    assert_eq!(snapshot.visible.len(), (snapshot.page_loads * 2).min(5));

    let catalog: Vec<Product> = (0..5).map(|i| product(&format!("q{i}"), "steel")).collect();
    loader.restart(catalog, en()).await;
    assert!(!loader.is_exhausted());

    let (handle, join) = spawn_sentinel(loader.clone());
    while !loader.is_exhausted() {
        handle.visible();
        tokio::task::yield_now().await;
    }
    drop(handle);
    let stats = join.await.unwrap();
    assert!(stats.triggers >= 2);
    assert_eq!(stats.pages_loaded, 2);

    assert_eq!(ids(&loader.visible_products()), vec!["q0", "q1", "q2", "q3", "q4"]);
    assert_eq!(loader.snapshot().page_loads, 3);
    assert!(loader.snapshot().is_end_of_results());
}

#[tokio::test]
async fn snapshots_are_published_to_subscribers() {
    let loader = build(Arc::new(CatalogDetails), LoaderConfig::default().with_page_size(2));
    let mut rx = loader.subscribe();
    let catalog: Vec<Product> = (0..3).map(|i| product(&format!("p{i}"), "steel")).collect();

    loader.restart(catalog, en()).await;
    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.visible.len(), 2);
    assert!(snapshot.has_more());
}
