//! Production order models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::stage::ProductionStatus;

/// One manufacturing order and its progress through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub id: Uuid,
    pub order_number: String,
    pub buyer_name: String,
    #[serde(default)]
    pub status: ProductionStatus,
    pub products: Vec<ProductLine>,
    pub total_quantity: i64,
    /// Stage form submissions keyed by stage name
    #[serde(default)]
    pub stage_details: serde_json::Map<String, serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A garment line on a production order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductLine {
    #[validate(length(min = 1, message = "Product is required"))]
    pub product: String,
    pub size: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 1, max = 1_000_000, message = "Quantity must be between 1 and 1,000,000"))]
    pub quantity: i64,
}

/// Input for creating a production order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductionInput {
    #[validate(length(min = 1, message = "Order number is required"))]
    pub order_number: String,
    #[validate(length(min = 1, message = "Buyer name is required"))]
    pub buyer_name: String,
    #[validate(length(min = 1, message = "At least one product line is required"))]
    pub products: Vec<ProductLine>,
    pub notes: Option<String>,
}

/// Partial update of a production order.
///
/// `status` is written as given; no stage adjacency check is applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductionInput {
    #[validate(length(min = 1, message = "Buyer name cannot be empty"))]
    pub buyer_name: Option<String>,
    pub status: Option<String>,
    pub products: Option<Vec<ProductLine>>,
    pub notes: Option<String>,
}

/// Stage form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageSubmission {
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Sum of line quantities on an order
pub fn total_quantity(products: &[ProductLine]) -> i64 {
    products.iter().map(|p| p.quantity).sum()
}
