//! `vitrine-loader`
//!
//! **Responsibility:** progressive reveal of a filtered product list.
//!
//! This crate provides:
//! - the paging loader with generation-tagged soft cancellation
//! - resolver ports for localized detail and images
//! - a visibility/sentinel port that turns viewport signals into page loads
//! - the grid controller tying filter state, language and loader together

pub mod config;
pub mod grid;
pub mod loader;
pub mod resolver;
pub mod sentinel;
pub mod state;

pub use config::{FailurePolicy, LoaderConfig};
pub use grid::ProductGrid;
pub use loader::ProgressiveLoader;
pub use resolver::{CatalogDetails, DetailResolver, ImageResolver, ResolveError, StaticImageResolver};
pub use sentinel::{SentinelEvent, SentinelHandle, SentinelStats, drive_sentinel, spawn_sentinel};
pub use state::{GridSnapshot, LoadOutcome, LoaderPhase};
