use std::sync::Arc;

use vitrine_comparison::{ComparisonSession, ToggleOutcome};
use vitrine_core::{Language, ProductId};
use vitrine_loader::{CatalogDetails, LoaderConfig, ProductGrid, ProgressiveLoader, StaticImageResolver};
use vitrine_products::Catalog;

fn pid(s: &str) -> ProductId {
    ProductId::new(s).unwrap()
}

fn grid() -> ProductGrid {
    let catalog = Catalog::from_json_str(
        r#"[
            {"id":"a","category":"aluminum","title":"Standard Profiles",
             "specifications":{"Alloy":"6063"}},
            {"id":"b","category":"steel","title":"HSAW Pipes",
             "specifications":{"Grade":"X52"}},
            {"id":"c","category":"Cast-Iron","title":"Manhole Covers"}
        ]"#,
    )
    .unwrap();
    let loader = ProgressiveLoader::new(
        Arc::new(CatalogDetails),
        Arc::new(StaticImageResolver::default()),
        LoaderConfig::default(),
    )
    .unwrap();
    ProductGrid::new(Arc::new(catalog), Language::new("en").unwrap(), loader)
}

#[tokio::test]
async fn comparison_keeps_selected_products_hidden_by_the_filter() {
    let mut grid = grid();
    let mut session = ComparisonSession::default();

    grid.reset("all", Language::new("en").unwrap()).await;
    assert_eq!(session.toggle(&pid("a")), ToggleOutcome::Added);
    assert_eq!(session.toggle(&pid("b")), ToggleOutcome::Added);

    grid.set_category("steel").await;
    let visible: Vec<String> = grid.snapshot().visible.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(visible, vec!["b"]);
    assert!(session.is_selected(&pid("a")));

    let candidates = grid
        .comparison_candidates(session.tracker().selected())
        .await
        .unwrap();
    let view = session.open(&candidates).unwrap();

    let compared: Vec<&str> = view.products().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(compared, vec!["a", "b"]);
    assert_eq!(view.specification_keys(), vec!["Alloy", "Grade"]);
}

#[tokio::test]
async fn visible_list_alone_cannot_open_a_comparison_of_hidden_products() {
    let mut grid = grid();
    let mut session = ComparisonSession::default();
    session.toggle(&pid("a"));
    session.toggle(&pid("b"));

    grid.reset("steel", Language::new("en").unwrap()).await;
    let visible = grid.snapshot().visible;
    let err = session.open(&visible).unwrap_err();
    assert_eq!(err, vitrine_core::CatalogError::UnknownProduct("a".to_string()));
    assert!(!session.is_open());
}
