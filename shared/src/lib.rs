//! Shared types and models for the garment production back office
//!
//! This crate contains the production stage flow and the calculations shared
//! between the backend, the browser UI (via WASM), and other components.

pub mod models;
pub mod stage_flow;
pub mod validation;

pub use models::*;
pub use stage_flow::*;
pub use validation::*;
