//! Comparison view: a frozen snapshot of selected products and the table
//! derived from it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use vitrine_core::ProductId;
use vitrine_products::DisplayProduct;

/// Cell text for a specification the product does not define.
pub const MISSING_VALUE: &str = "-";

/// Union of string lists, each item once, in first-seen order.
fn union_first_seen<'a, I, L>(lists: L) -> Vec<&'a str>
where
    L: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in lists.into_iter().flatten() {
        if seen.insert(item) {
            out.push(item);
        }
    }
    out
}

/// Side-by-side comparison over the products selected when it was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonView {
    id: Uuid,
    opened_at: DateTime<Utc>,
    products: Vec<DisplayProduct>,
}

impl ComparisonView {
    pub(crate) fn new(products: Vec<DisplayProduct>) -> Self {
        Self {
            id: Uuid::now_v7(),
            opened_at: Utc::now(),
            products,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Compared products, in selection order.
    pub fn products(&self) -> &[DisplayProduct] {
        &self.products
    }

    pub fn specification_keys(&self) -> Vec<&str> {
        union_first_seen(self.products.iter().map(|p| p.specifications.keys()))
    }

    pub fn features(&self) -> Vec<&str> {
        union_first_seen(
            self.products
                .iter()
                .map(|p| p.features.iter().map(String::as_str)),
        )
    }

    pub fn applications(&self) -> Vec<&str> {
        union_first_seen(
            self.products
                .iter()
                .map(|p| p.applications.iter().map(String::as_str)),
        )
    }

    /// The product's own value for `key`, or [`MISSING_VALUE`].
    pub fn spec_value<'a>(product: &'a DisplayProduct, key: &str) -> &'a str {
        product.specifications.get(key).unwrap_or(MISSING_VALUE)
    }

    /// Exact membership, not substring.
    pub fn has_feature(product: &DisplayProduct, feature: &str) -> bool {
        product.features.iter().any(|f| f == feature)
    }

    pub fn has_application(product: &DisplayProduct, application: &str) -> bool {
        product.applications.iter().any(|a| a == application)
    }

    pub fn table(&self) -> ComparisonTable {
        let columns = self
            .products
            .iter()
            .map(|p| ColumnHeader {
                id: p.id.clone(),
                title: p.title.clone(),
            })
            .collect();

        let specifications = self
            .specification_keys()
            .into_iter()
            .map(|key| SpecificationRow {
                key: key.to_string(),
                values: self
                    .products
                    .iter()
                    .map(|p| Self::spec_value(p, key).to_string())
                    .collect(),
            })
            .collect();

        let features = self
            .features()
            .into_iter()
            .map(|item| PresenceRow {
                item: item.to_string(),
                present: self
                    .products
                    .iter()
                    .map(|p| Self::has_feature(p, item))
                    .collect(),
            })
            .collect();

        let applications = self
            .applications()
            .into_iter()
            .map(|item| PresenceRow {
                item: item.to_string(),
                present: self
                    .products
                    .iter()
                    .map(|p| Self::has_application(p, item))
                    .collect(),
            })
            .collect();

        ComparisonTable {
            columns,
            specifications,
            features,
            applications,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub id: ProductId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificationRow {
    pub key: String,
    /// One cell per column.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceRow {
    pub item: String,
    /// One cell per column.
    pub present: Vec<bool>,
}

/// Rows are the union of keys/items, columns the compared products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTable {
    pub columns: Vec<ColumnHeader>,
    pub specifications: Vec<SpecificationRow>,
    pub features: Vec<PresenceRow>,
    pub applications: Vec<PresenceRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_products::{DisplayImage, Product, Specifications};

    fn display(id: &str, specs: &[(&str, &str)], features: &[&str], applications: &[&str]) -> DisplayProduct {
        let mut p = DisplayProduct::fallback(
            &Product::new(ProductId::new(id).unwrap(), id.to_uppercase()),
            DisplayImage::None,
        );
        p.specifications = specs.iter().copied().collect::<Specifications>();
        p.features = features.iter().map(|s| s.to_string()).collect();
        p.applications = applications.iter().map(|s| s.to_string()).collect();
        p
    }

    fn view() -> ComparisonView {
        ComparisonView::new(vec![
            display("a", &[("Diameter", "DN300"), ("Class", "D400")], &["Locking", "Hinged"], &["Roads"]),
            display("b", &[("Class", "C250"), ("Weight", "48 kg")], &["Hinged"], &["Sidewalks", "Roads"]),
            display("c", &[], &["Lock"], &[]),
        ])
    }

    #[test]
    fn spec_keys_are_the_union_in_first_seen_order() {
        assert_eq!(view().specification_keys(), vec!["Diameter", "Class", "Weight"]);
    }

    #[test]
    fn missing_specs_render_as_placeholder() {
        let table = view().table();
        let weight = table.specifications.iter().find(|r| r.key == "Weight").unwrap();
        assert_eq!(weight.values, vec!["-", "48 kg", "-"]);
        let class = table.specifications.iter().find(|r| r.key == "Class").unwrap();
        assert_eq!(class.values, vec!["D400", "C250", "-"]);
    }

    #[test]
    fn features_use_exact_membership() {
        let v = view();
        assert_eq!(v.features(), vec!["Locking", "Hinged", "Lock"]);
        let table = v.table();
        let lock = table.features.iter().find(|r| r.item == "Lock").unwrap();
        assert_eq!(lock.present, vec![false, false, true]);
    }

    #[test]
    fn applications_union_and_presence() {
        let table = view().table();
        let items: Vec<_> = table.applications.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Roads", "Sidewalks"]);
        assert_eq!(table.applications[0].present, vec![true, true, false]);
    }

    #[test]
    fn table_columns_follow_product_order() {
        let table = view().table();
        let ids: Vec<_> = table.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(table.columns[0].title, "A");
    }

    #[test]
    fn table_serializes_for_the_ui() {
        let json = serde_json::to_value(view().table()).unwrap();
        assert_eq!(json["specifications"][0]["key"], "Diameter");
        assert_eq!(json["features"][1]["present"], serde_json::json!([true, true, false]));
    }
}
