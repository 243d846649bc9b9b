//! af-core: stable foundation for the autoflight workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - units (conversion helpers for the mixed-unit engine domain)
//! - ini (minimal key=value configuration codec)
//! - error (shared error types)

pub mod error;
pub mod ini;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
