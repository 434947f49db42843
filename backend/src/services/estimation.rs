//! Purchase estimation service

use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    calculate_estimation, validate_estimation_line, validate_gstin, EstimationInput,
    EstimationTotals,
};

/// Purchase estimation calculator
#[derive(Clone, Default)]
pub struct EstimationService;

impl EstimationService {
    pub fn new() -> Self {
        Self
    }

    /// Validate an estimation and compute its GST totals
    pub fn calculate(&self, input: EstimationInput) -> AppResult<EstimationTotals> {
        input.validate()?;

        if let Some(gstin) = input.supplier_gstin.as_deref() {
            validate_gstin(gstin).map_err(|msg| AppError::Validation {
                field: "supplier_gstin".to_string(),
                message: msg.to_string(),
            })?;
        }

        for (i, line) in input.lines.iter().enumerate() {
            validate_estimation_line(line).map_err(|msg| AppError::Validation {
                field: format!("lines[{}]", i),
                message: msg.to_string(),
            })?;
        }

        let totals = calculate_estimation(&input.lines, input.supply_type);
        tracing::debug!(
            "Estimated {} lines: subtotal {}, gst {}",
            totals.lines.len(),
            totals.subtotal,
            totals.total_gst
        );
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{EstimationLine, SupplyType};

    fn input(gst: u32, gstin: Option<&str>) -> EstimationInput {
        EstimationInput {
            supplier_gstin: gstin.map(str::to_string),
            supply_type: SupplyType::InterState,
            lines: vec![EstimationLine {
                description: "Denim (m)".to_string(),
                quantity: Decimal::from(40),
                rate: Decimal::from(250),
                gst_percent: Decimal::from(gst),
            }],
        }
    }

    #[test]
    fn test_calculate_valid() {
        let totals = EstimationService::new()
            .calculate(input(5, Some("27AAPFU0939F1ZV")))
            .unwrap();
        assert_eq!(totals.subtotal, Decimal::from(10000));
        assert_eq!(totals.igst, Decimal::from(500));
    }

    #[test]
    fn test_calculate_rejects_bad_slab() {
        let err = EstimationService::new().calculate(input(9, None)).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lines[0]"));
    }

    #[test]
    fn test_calculate_rejects_bad_gstin() {
        let err = EstimationService::new()
            .calculate(input(5, Some("NOT-A-GSTIN")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "supplier_gstin"));
    }

    #[test]
    fn test_calculate_requires_lines() {
        let mut empty = input(5, None);
        empty.lines.clear();
        assert!(matches!(
            EstimationService::new().calculate(empty),
            Err(AppError::ValidationError(_))
        ));
    }
}
