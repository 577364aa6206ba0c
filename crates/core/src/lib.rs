//! `vitrine-core`: catalog foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no async runtime).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{CatalogError, CatalogResult};
pub use id::{Language, ProductId};
pub use value_object::ValueObject;
