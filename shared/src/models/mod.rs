//! Domain models for the garment production back office

mod estimation;
mod production;
mod stage;

pub use estimation::*;
pub use production::*;
pub use stage::*;
