//! Validation utilities for the garment production back office
//!
//! Includes GST-specific checks used on purchase estimations.

use rust_decimal::Decimal;
use validator::Validate;

use crate::models::{EstimationLine, ProductLine, ProductionStatus, StagePipeline};

// ============================================================================
// Production Validations
// ============================================================================

/// Validate every product line on an order
pub fn validate_product_lines(products: &[ProductLine]) -> Result<(), &'static str> {
    if products.is_empty() {
        return Err("At least one product line is required");
    }
    for product in products {
        if product.validate().is_err() {
            return Err("Each product line needs a product and a quantity between 1 and 1,000,000");
        }
    }
    Ok(())
}

/// Whether writing `to` over `from` is a single forward step in `pipeline`.
///
/// A missing status counts as sitting before the first stage.
pub fn is_pipeline_step(
    pipeline: &StagePipeline,
    from: &ProductionStatus,
    to: &ProductionStatus,
) -> bool {
    let Some(target) = to.stage() else {
        return false;
    };
    match from {
        ProductionStatus::Missing => pipeline.first() == Some(target),
        ProductionStatus::Stage(current) => pipeline.successor(*current) == Some(target),
        ProductionStatus::Unrecognized(_) => false,
    }
}

// ============================================================================
// GST Validations
// ============================================================================

/// GST slabs in percent
pub const GST_SLABS: [u32; 5] = [0, 5, 12, 18, 28];

/// Largest quantity accepted on one estimation line
pub const MAX_LINE_QUANTITY: i64 = 10_000_000;

/// Largest unit rate accepted on one estimation line
pub const MAX_LINE_RATE: i64 = 100_000_000;

/// Validate a GST rate is one of the notified slabs
pub fn validate_gst_rate(rate: Decimal) -> Result<(), &'static str> {
    if GST_SLABS.iter().any(|slab| Decimal::from(*slab) == rate) {
        Ok(())
    } else {
        Err("GST rate must be one of 0, 5, 12, 18 or 28 percent")
    }
}

/// Validate GSTIN structure.
/// Format: 2-digit state code, 10-character PAN, entity code, 'Z', check character.
pub fn validate_gstin(gstin: &str) -> Result<(), &'static str> {
    let chars: Vec<char> = gstin.chars().collect();
    if chars.len() != 15 {
        return Err("GSTIN must be 15 characters");
    }

    let state: String = chars[0..2].iter().collect();
    match state.parse::<u32>() {
        Ok(code) if (1..=38).contains(&code) || code == 97 => {}
        _ => return Err("GSTIN must start with a valid state code"),
    }

    let pan_ok = chars[2..7].iter().all(|c| c.is_ascii_uppercase())
        && chars[7..11].iter().all(|c| c.is_ascii_digit())
        && chars[11].is_ascii_uppercase();
    if !pan_ok {
        return Err("GSTIN must contain a valid PAN");
    }

    if !(chars[12].is_ascii_uppercase() || ('1'..='9').contains(&chars[12])) {
        return Err("GSTIN entity code must be 1-9 or A-Z");
    }
    if chars[13] != 'Z' {
        return Err("GSTIN 14th character must be 'Z'");
    }
    if !(chars[14].is_ascii_uppercase() || chars[14].is_ascii_digit()) {
        return Err("GSTIN check character must be alphanumeric");
    }
    Ok(())
}

/// Validate a single estimation line
pub fn validate_estimation_line(line: &EstimationLine) -> Result<(), &'static str> {
    if line.description.trim().is_empty() {
        return Err("Description is required");
    }
    if line.quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    if line.quantity > Decimal::from(MAX_LINE_QUANTITY) {
        return Err("Quantity exceeds 10,000,000");
    }
    if line.rate < Decimal::ZERO {
        return Err("Rate cannot be negative");
    }
    if line.rate > Decimal::from(MAX_LINE_RATE) {
        return Err("Rate exceeds 100,000,000");
    }
    validate_gst_rate(line.gst_percent)
}
