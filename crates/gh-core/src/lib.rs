//! gh-core: shared foundation for the greenhouse lumped-parameter models.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact typed IDs for ports, junctions and components)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{GhError, GhResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
