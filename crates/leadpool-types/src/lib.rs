//! Core types and traits for the open leads reassignment pool.
//!
//! Field names follow the lead entity of the backing object store so records
//! round-trip through JSON unchanged.

mod audit;
mod dto;
mod lead;
mod traits;

pub use audit::*;
pub use dto::*;
pub use lead::*;
pub use traits::*;
