//! `vitrine-preview <catalog.json> [category] [search]`
//!
//! Pages a catalog the way the product grid does and prints every revealed
//! product as one JSON line. With `VITRINE_COMPARE=id,id,...` it also prints
//! the comparison table of those products.

use std::sync::Arc;

use anyhow::Context;

use vitrine_comparison::{ComparisonConfig, ComparisonSession, ToggleOutcome};
use vitrine_core::{Language, ProductId};
use vitrine_loader::{
    CatalogDetails, DetailResolver, LoaderConfig, ProductGrid, ProgressiveLoader,
    StaticImageResolver,
};
use vitrine_products::{Catalog, FilterState, TranslationBundle};

const USAGE: &str = "usage: vitrine-preview <catalog.json> [category] [search]";

fn load_details() -> anyhow::Result<Arc<dyn DetailResolver>> {
    let Ok(path) = std::env::var("VITRINE_TRANSLATIONS") else {
        tracing::warn!("VITRINE_TRANSLATIONS not set; showing raw catalog text");
        return Ok(Arc::new(CatalogDetails));
    };
    let mut bundle = TranslationBundle::from_json_file(&path)
        .with_context(|| format!("failed to load translations from {path}"))?;

    if let Ok(patch_path) = std::env::var("VITRINE_TRANSLATION_PATCH") {
        let patch = TranslationBundle::from_json_file(&patch_path)
            .with_context(|| format!("failed to load translation patch from {patch_path}"))?;
        let report = bundle.merge_patch(patch);
        tracing::info!(
            entries_added = report.entries_added,
            fields_replaced = report.fields_replaced,
            "translation patch applied"
        );
    }
    Ok(Arc::new(bundle))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vitrine_observability::init();

    let mut args = std::env::args().skip(1);
    let catalog_path = args
        .next()
        .or_else(|| std::env::var("VITRINE_CATALOG").ok())
        .context(USAGE)?;
    let category = args.next().unwrap_or_else(|| "all".to_string());
    let search = args.next().unwrap_or_default();

    let language = Language::new(std::env::var("VITRINE_LANGUAGE").unwrap_or_else(|_| {
        tracing::debug!("VITRINE_LANGUAGE not set; using en");
        "en".to_string()
    }))?;

    let catalog = Catalog::from_json_file(&catalog_path)
        .with_context(|| format!("failed to load catalog from {catalog_path}"))?;
    let catalog = Arc::new(catalog);

    let images = StaticImageResolver::new(std::env::var("VITRINE_IMAGE_BASE").unwrap_or_default());
    let config = LoaderConfig::from_env().context("invalid loader configuration")?;
    let loader = ProgressiveLoader::new(load_details()?, Arc::new(images), config)?;

    let mut grid = ProductGrid::new(catalog, language.clone(), loader);
    grid.reset_with_filter(FilterState::new(category.as_str(), search), language)
        .await;

    let mut printed = 0;
    loop {
        let snapshot = grid.snapshot();
        for product in &snapshot.visible[printed..] {
            println!("{}", serde_json::to_string(product)?);
        }
        printed = snapshot.visible.len();

        if snapshot.is_empty_result() {
            tracing::info!(filter = ?grid.filter_state(), "no products found; reset the filters to see the full catalog");
            break;
        }
        if snapshot.is_exhausted() {
            tracing::info!(total = snapshot.total, pages = snapshot.page_loads, "end of results");
            break;
        }
        grid.load_next_page().await;
    }

    if let Ok(ids) = std::env::var("VITRINE_COMPARE") {
        let mut session = ComparisonSession::new(ComparisonConfig::from_env()?);
        for raw in ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id: ProductId = raw.parse()?;
            if session.toggle(&id) == ToggleOutcome::LimitReached {
                tracing::warn!(product = %id, "comparison is full; product not added");
            }
        }
        let candidates = grid
            .comparison_candidates(session.tracker().selected())
            .await
            .context("selected product is not in the catalog")?;
        let view = session.open(&candidates).context("nothing to compare")?;
        println!("{}", serde_json::to_string_pretty(&view.table())?);
    }

    Ok(())
}
