//! HTTP handlers for the garment production back office

mod estimation;
mod health;
mod production;

pub use estimation::*;
pub use health::*;
pub use production::*;
