//! Business logic services for the garment production back office

pub mod estimation;
pub mod production;

pub use estimation::EstimationService;
pub use production::ProductionService;
