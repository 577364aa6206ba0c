//! `vitrine-comparison`
//!
//! **Responsibility:** product selection for side-by-side comparison.
//!
//! This crate provides:
//! - a bounded selection tracker (default limit: 3 products)
//! - frozen comparison views and the specification/feature/application
//!   tables derived from them

pub mod config;
pub mod selection;
pub mod session;
pub mod view;

pub use config::ComparisonConfig;
pub use selection::{SelectionTracker, ToggleOutcome};
pub use session::ComparisonSession;
pub use view::{
    ColumnHeader, ComparisonTable, ComparisonView, MISSING_VALUE, PresenceRow, SpecificationRow,
};
