//! Purchase estimation models

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A costed line on a purchase estimation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimationLine {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    /// GST rate in percent (one of the GST slabs)
    pub gst_percent: Decimal,
}

impl EstimationLine {
    /// Taxable value of the line
    pub fn amount(&self) -> Decimal {
        round_currency(self.quantity * self.rate)
    }

    pub fn gst_amount(&self) -> Decimal {
        round_currency(self.amount() * self.gst_percent / Decimal::from(100))
    }
}

/// Place-of-supply relationship between supplier and buyer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Same state: GST splits into CGST and SGST
    #[default]
    IntraState,
    /// Different states: GST is charged as IGST
    InterState,
}

/// Input for calculating a purchase estimation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EstimationInput {
    pub supplier_gstin: Option<String>,
    #[serde(default)]
    pub supply_type: SupplyType,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<EstimationLine>,
}

/// Per-line breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimationLineTotal {
    pub description: String,
    pub amount: Decimal,
    pub gst_percent: Decimal,
    pub gst_amount: Decimal,
    pub total: Decimal,
}

/// Totals for a purchase estimation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimationTotals {
    pub lines: Vec<EstimationLineTotal>,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total_gst: Decimal,
    pub grand_total: Decimal,
}

/// Round to paise, midpoint away from zero. The result always carries two
/// decimal places.
pub fn round_currency(value: Decimal) -> Decimal {
    to_paise(value, RoundingStrategy::MidpointAwayFromZero)
}

fn to_paise(value: Decimal, strategy: RoundingStrategy) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, strategy);
    rounded.rescale(2);
    rounded
}

/// Aggregate line amounts and GST into estimation totals
pub fn calculate_estimation(lines: &[EstimationLine], supply_type: SupplyType) -> EstimationTotals {
    let line_totals: Vec<EstimationLineTotal> = lines
        .iter()
        .map(|line| {
            let amount = line.amount();
            let gst_amount = line.gst_amount();
            EstimationLineTotal {
                description: line.description.clone(),
                amount,
                gst_percent: line.gst_percent,
                gst_amount,
                total: amount + gst_amount,
            }
        })
        .collect();

    let subtotal: Decimal = line_totals.iter().map(|l| l.amount).sum();
    let total_gst: Decimal = line_totals.iter().map(|l| l.gst_amount).sum();

    let (cgst, sgst, igst) = match supply_type {
        SupplyType::IntraState => {
            let cgst = to_paise(total_gst / Decimal::from(2), RoundingStrategy::ToZero);
            (cgst, total_gst - cgst, Decimal::ZERO)
        }
        SupplyType::InterState => (Decimal::ZERO, Decimal::ZERO, total_gst),
    };

    EstimationTotals {
        lines: line_totals,
        subtotal,
        cgst,
        sgst,
        igst,
        total_gst,
        grand_total: subtotal + total_gst,
    }
}
