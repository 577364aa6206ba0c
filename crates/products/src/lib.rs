//! Products catalog module.
//!
//! Static product records, the category/search filter over them, and the
//! localized display copies the grid renders. Pure data logic: no async
//! runtime, no rendering.

pub mod catalog;
pub mod category;
pub mod filter;
pub mod product;
pub mod translations;

pub use catalog::Catalog;
pub use category::{Category, CategorySelection, normalize};
pub use filter::{FilterState, filter};
pub use product::{
    DetailSource, DisplayImage, DisplayProduct, ImageAsset, Product, ProductDetail, Specifications,
};
pub use translations::{LocalizedEntry, PatchReport, TranslationBundle};
