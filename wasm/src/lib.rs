//! WebAssembly module for the garment production back office
//!
//! Provides client-side computation for:
//! - Stage screen membership and stage access checks
//! - Stage adjacency for navigation
//! - Purchase estimation totals

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::stage_flow::*;
pub use shared::validation::*;

/// A production record as the UI holds it; only `status` is interpreted
struct LooseRecord {
    status: ProductionStatus,
    value: serde_json::Value,
}

impl LooseRecord {
    fn new(value: serde_json::Value) -> Self {
        Self {
            status: status_of(&value),
            value,
        }
    }
}

impl Staged for LooseRecord {
    fn production_status(&self) -> &ProductionStatus {
        &self.status
    }
}

fn warn_unknown_stage(stage: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&format!("Unknown production stage: {}", stage)));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = stage;
}

fn flow_for<'a, R: Staged>(
    pipeline: &'a StagePipeline,
    stage: &str,
    records: &'a [R],
) -> StageFlow<'a, R> {
    let flow = StageFlow::for_name(pipeline, stage, records);
    if !flow.is_known() {
        warn_unknown_stage(stage);
    }
    flow
}

/// Stage names of the garment pipeline, in order
#[wasm_bindgen]
pub fn pipeline_stages() -> js_sys::Array {
    StagePipeline::garment()
        .stages()
        .iter()
        .map(|s| JsValue::from_str(s.as_str()))
        .collect()
}

/// Filter a JSON array of production records down to those shown on a stage screen.
/// Records only need a `status` field; every other field passes through untouched.
#[wasm_bindgen]
pub fn stage_data(stage: &str, records_json: &str) -> Result<String, JsValue> {
    let records: Vec<LooseRecord> = serde_json::from_str::<Vec<serde_json::Value>>(records_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid records JSON: {}", e)))?
        .into_iter()
        .map(LooseRecord::new)
        .collect();

    let pipeline = StagePipeline::garment();
    let flow = flow_for(&pipeline, stage, &records);
    let visible: Vec<&serde_json::Value> = flow
        .stage_data()
        .into_iter()
        .map(|record| &record.value)
        .collect();

    serde_json::to_string(&visible).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether a production record may open the given stage's form
#[wasm_bindgen]
pub fn can_access_stage(stage: &str, record_json: &str) -> Result<bool, JsValue> {
    let record: serde_json::Value = serde_json::from_str(record_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid record JSON: {}", e)))?;
    let status = status_of(&record);

    let pipeline = StagePipeline::garment();
    let none: [ProductionStatus; 0] = [];
    Ok(flow_for(&pipeline, stage, &none).can_access_stage(&status))
}

/// Stage after the given one, if any
#[wasm_bindgen]
pub fn next_stage(stage: &str) -> Option<String> {
    let pipeline = StagePipeline::garment();
    let none: [ProductionStatus; 0] = [];
    flow_for(&pipeline, stage, &none)
        .next_stage()
        .map(|s| s.as_str().to_string())
}

/// Stage before the given one, if any
#[wasm_bindgen]
pub fn previous_stage(stage: &str) -> Option<String> {
    let pipeline = StagePipeline::garment();
    let none: [ProductionStatus; 0] = [];
    flow_for(&pipeline, stage, &none)
        .previous_stage()
        .map(|s| s.as_str().to_string())
}

/// Calculate purchase estimation totals from a JSON array of lines
#[wasm_bindgen]
pub fn calculate_estimation(lines_json: &str, inter_state: bool) -> Result<String, JsValue> {
    let totals = estimate(lines_json, inter_state).map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&totals).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn estimate(lines_json: &str, inter_state: bool) -> Result<EstimationTotals, String> {
    let lines: Vec<EstimationLine> =
        serde_json::from_str(lines_json).map_err(|e| format!("Invalid lines JSON: {}", e))?;
    for line in &lines {
        validate_estimation_line(line).map_err(str::to_string)?;
    }

    let supply_type = if inter_state {
        SupplyType::InterState
    } else {
        SupplyType::IntraState
    };
    Ok(shared::calculate_estimation(&lines, supply_type))
}

/// Read the `status` field of a loosely typed record.
/// A status that is present but not a string is never a stage.
fn status_of(record: &serde_json::Value) -> ProductionStatus {
    match record.get("status") {
        None | Some(serde_json::Value::Null) => ProductionStatus::Missing,
        Some(serde_json::Value::String(raw)) => ProductionStatus::from_raw(Some(raw.as_str())),
        Some(other) => ProductionStatus::Unrecognized(other.to_string()),
    }
}
