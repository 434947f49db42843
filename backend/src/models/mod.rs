//! Domain models for the garment production back office
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
