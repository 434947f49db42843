//! Production management service for garment production orders

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    is_pipeline_step, total_quantity, validate_product_lines, CreateProductionInput,
    ProductLine, ProductionRecord, ProductionStatus, StageFlow, StageName, StagePipeline,
    StageSubmission, UpdateProductionInput,
};

const PRODUCTION_COLUMNS: &str = "id, order_number, buyer_name, status, products, total_quantity, \
     stage_details, notes, created_at, updated_at";

/// Production service for managing orders on the factory floor
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
    pipeline: Arc<StagePipeline>,
}

/// Database row for a production order
#[derive(Debug, sqlx::FromRow)]
struct ProductionRow {
    id: Uuid,
    order_number: String,
    buyer_name: String,
    status: Option<String>,
    products: serde_json::Value,
    total_quantity: i64,
    stage_details: serde_json::Value,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductionRow> for ProductionRecord {
    type Error = AppError;

    fn try_from(row: ProductionRow) -> Result<Self, Self::Error> {
        let products: Vec<ProductLine> = serde_json::from_value(row.products)
            .map_err(|e| AppError::Internal(format!("Corrupt products on {}: {}", row.id, e)))?;
        let stage_details = match row.stage_details {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(ProductionRecord {
            id: row.id,
            order_number: row.order_number,
            buyer_name: row.buyer_name,
            status: ProductionStatus::from(row.status),
            products,
            total_quantity: row.total_quantity,
            stage_details,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// What a stage screen shows
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub stage: String,
    /// False when the stage is not part of the configured pipeline
    pub recognized: bool,
    pub label: Option<String>,
    pub previous_stage: Option<StageName>,
    pub next_stage: Option<StageName>,
    pub is_first_stage: bool,
    pub is_last_stage: bool,
    pub records: Vec<ProductionRecord>,
}

impl StageView {
    pub fn from_flow(stage: &str, flow: &StageFlow<'_, ProductionRecord>) -> Self {
        let recognized = flow.is_known();
        StageView {
            stage: stage.to_string(),
            recognized,
            label: flow
                .stage()
                .filter(|_| recognized)
                .map(|s| s.label().to_string()),
            previous_stage: flow.previous_stage(),
            next_stage: flow.next_stage(),
            is_first_stage: flow.is_first_stage(),
            is_last_stage: flow.is_last_stage(),
            records: flow.stage_data().into_iter().cloned().collect(),
        }
    }
}

/// Resolve the target stage of a submission and check the record may enter it
pub fn check_stage_entry(
    pipeline: &StagePipeline,
    stage: &str,
    record: &ProductionRecord,
) -> AppResult<StageName> {
    let snapshot = std::slice::from_ref(record);
    let flow = StageFlow::for_name(pipeline, stage, snapshot);

    let target = match flow.stage() {
        Some(target) if flow.is_known() => target,
        _ => {
            return Err(AppError::Validation {
                field: "stage".to_string(),
                message: format!("Unknown production stage: {}", stage),
            })
        }
    };

    if !flow.can_access_stage(record) {
        return Err(AppError::InvalidStateTransition(format!(
            "Production {} is at {} and is not ready for {}",
            record.order_number, record.status, target
        )));
    }

    Ok(target)
}

/// Status an update should write, or `None` to leave the stored one alone.
///
/// Out-of-sequence writes are allowed but logged.
fn requested_status(
    pipeline: &StagePipeline,
    current: &ProductionRecord,
    raw: Option<&str>,
) -> Option<ProductionStatus> {
    let raw = raw?;
    let next = ProductionStatus::from_raw(Some(raw));
    if next != current.status && !is_pipeline_step(pipeline, &current.status, &next) {
        tracing::warn!(
            "Production {} status written out of sequence: {} -> {}",
            current.order_number,
            current.status,
            next
        );
    }
    Some(next)
}

/// Columns written by a stage submit
#[derive(Debug, Clone, PartialEq)]
struct StageWrite {
    status: StageName,
    stage_details: serde_json::Value,
    /// Status the record must still hold for the write to apply
    expected_status: Option<String>,
}

impl StageWrite {
    fn new(record: &ProductionRecord, target: StageName, details: serde_json::Value) -> Self {
        let mut stage_details = record.stage_details.clone();
        stage_details.insert(target.as_str().to_string(), details);
        StageWrite {
            status: target,
            stage_details: serde_json::Value::Object(stage_details),
            expected_status: record.status.clone().into(),
        }
    }
}

/// Error for a submit that lost a race with another write
fn stage_conflict(record: &ProductionRecord, target: StageName) -> AppError {
    AppError::InvalidStateTransition(format!(
        "Production {} changed while submitting {}; reload and retry",
        record.order_number, target
    ))
}

impl ProductionService {
    /// Create a new ProductionService instance
    pub fn new(db: PgPool, pipeline: Arc<StagePipeline>) -> Self {
        Self { db, pipeline }
    }

    /// Create a production order at the first stage
    pub async fn create_production(
        &self,
        input: CreateProductionInput,
    ) -> AppResult<ProductionRecord> {
        input.validate()?;
        validate_product_lines(&input.products).map_err(|msg| AppError::Validation {
            field: "products".to_string(),
            message: msg.to_string(),
        })?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM productions WHERE order_number = $1",
        )
        .bind(&input.order_number)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Validation {
                field: "order_number".to_string(),
                message: format!("Production already exists for order {}", input.order_number),
            });
        }

        let initial = self
            .pipeline
            .first()
            .ok_or_else(|| AppError::Configuration("Stage pipeline is empty".to_string()))?;
        let products = serde_json::to_value(&input.products)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let row = sqlx::query_as::<_, ProductionRow>(&format!(
            r#"
            INSERT INTO productions (order_number, buyer_name, status, products, total_quantity, stage_details, notes)
            VALUES ($1, $2, $3, $4, $5, '{{}}'::jsonb, $6)
            RETURNING {PRODUCTION_COLUMNS}
            "#
        ))
        .bind(&input.order_number)
        .bind(&input.buyer_name)
        .bind(initial.as_str())
        .bind(&products)
        .bind(total_quantity(&input.products))
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            "Created production {} for {} at {}",
            input.order_number,
            input.buyer_name,
            initial
        );

        row.try_into()
    }

    /// List all production orders, newest first
    pub async fn list_productions(&self) -> AppResult<Vec<ProductionRecord>> {
        let rows = sqlx::query_as::<_, ProductionRow>(&format!(
            "SELECT {PRODUCTION_COLUMNS} FROM productions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ProductionRecord::try_from).collect()
    }

    /// Get production order by ID
    pub async fn get_production(&self, production_id: Uuid) -> AppResult<ProductionRecord> {
        let row = sqlx::query_as::<_, ProductionRow>(&format!(
            "SELECT {PRODUCTION_COLUMNS} FROM productions WHERE id = $1"
        ))
        .bind(production_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Production".to_string()))?;

        row.try_into()
    }

    /// Update descriptive fields and, when given, the raw status.
    ///
    /// The status is written even when it skips or reverses the pipeline;
    /// such writes are logged.
    pub async fn update_production(
        &self,
        production_id: Uuid,
        input: UpdateProductionInput,
    ) -> AppResult<ProductionRecord> {
        input.validate()?;
        let current = self.get_production(production_id).await?;

        let status = requested_status(&self.pipeline, &current, input.status.as_deref());
        let status_given = status.is_some();
        let status_value: Option<String> = status.and_then(Into::into);

        let products = match input.products {
            Some(products) => {
                validate_product_lines(&products).map_err(|msg| AppError::Validation {
                    field: "products".to_string(),
                    message: msg.to_string(),
                })?;
                products
            }
            None => current.products,
        };
        let products_json =
            serde_json::to_value(&products).map_err(|e| AppError::Internal(e.to_string()))?;

        let row = sqlx::query_as::<_, ProductionRow>(&format!(
            r#"
            UPDATE productions
            SET buyer_name = $1, status = CASE WHEN $7 THEN $2 ELSE status END,
                products = $3, total_quantity = $4,
                notes = COALESCE($5, notes), updated_at = NOW()
            WHERE id = $6
            RETURNING {PRODUCTION_COLUMNS}
            "#
        ))
        .bind(input.buyer_name.unwrap_or(current.buyer_name))
        .bind(&status_value)
        .bind(&products_json)
        .bind(total_quantity(&products))
        .bind(&input.notes)
        .bind(production_id)
        .bind(status_given)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Production".to_string()))?;

        row.try_into()
    }

    /// Delete a production order
    pub async fn delete_production(&self, production_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM productions WHERE id = $1")
            .bind(production_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Production".to_string()));
        }

        tracing::info!("Deleted production {}", production_id);
        Ok(())
    }

    /// Records visible on a stage screen
    pub async fn stage_view(&self, stage: &str) -> AppResult<StageView> {
        let records = self.list_productions().await?;
        let flow = StageFlow::for_name(&self.pipeline, stage, &records);

        if !flow.is_known() {
            tracing::warn!("Stage view requested for unknown stage: {}", stage);
        }

        Ok(StageView::from_flow(stage, &flow))
    }

    /// Submit a stage form, moving the record into that stage
    pub async fn submit_stage(
        &self,
        production_id: Uuid,
        stage: &str,
        submission: StageSubmission,
    ) -> AppResult<ProductionRecord> {
        let record = self.get_production(production_id).await?;
        let target = check_stage_entry(&self.pipeline, stage, &record)?;

        let write = StageWrite::new(&record, target, submission.details);

        // Only write if nobody moved the record since it was read
        let row = sqlx::query_as::<_, ProductionRow>(&format!(
            r#"
            UPDATE productions
            SET status = $1, stage_details = $2, updated_at = NOW()
            WHERE id = $3 AND status IS NOT DISTINCT FROM $4
            RETURNING {PRODUCTION_COLUMNS}
            "#
        ))
        .bind(write.status.as_str())
        .bind(&write.stage_details)
        .bind(production_id)
        .bind(&write.expected_status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| stage_conflict(&record, target))?;

        tracing::info!(
            "Production {} moved {} -> {}",
            record.order_number,
            record.status,
            target
        );

        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order: &str, status: Option<&str>) -> ProductionRecord {
        ProductionRecord {
            id: Uuid::new_v4(),
            order_number: order.to_string(),
            buyer_name: "Acme Apparel".to_string(),
            status: ProductionStatus::from_raw(status),
            products: vec![ProductLine {
                product: "Polo Shirt".to_string(),
                size: Some("M".to_string()),
                color: Some("White".to_string()),
                quantity: 100,
            }],
            total_quantity: 100,
            stage_details: serde_json::Map::new(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_check_stage_entry_allows_ready_record() {
        let pipeline = StagePipeline::garment();
        let r = record("PO-1", Some("Stitching"));
        assert_eq!(
            check_stage_entry(&pipeline, "Trimming", &r).unwrap(),
            StageName::Trimming
        );
        assert_eq!(
            check_stage_entry(&pipeline, "Stitching", &r).unwrap(),
            StageName::Stitching
        );
    }

    #[test]
    fn test_check_stage_entry_rejects_skip_ahead() {
        let pipeline = StagePipeline::garment();
        let r = record("PO-2", Some("Cutting"));
        let err = check_stage_entry(&pipeline, "QC", &r).unwrap_err();
        assert!(matches!(err, AppError::InvalidStateTransition(_)));
    }

    #[test]
    fn test_check_stage_entry_rejects_missing_status() {
        let pipeline = StagePipeline::garment();
        let r = record("PO-3", None);
        assert!(matches!(
            check_stage_entry(&pipeline, "Cutting", &r),
            Err(AppError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn test_check_stage_entry_rejects_unknown_stage() {
        let pipeline = StagePipeline::garment();
        let r = record("PO-4", Some("Cutting"));
        assert!(matches!(
            check_stage_entry(&pipeline, "Embroidery", &r),
            Err(AppError::Validation { .. })
        ));

        let short = StagePipeline::from_names(&["PendingProduction", "Cutting"]).unwrap();
        assert!(matches!(
            check_stage_entry(&short, "Stitching", &r),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_update_without_status_leaves_it_alone() {
        let pipeline = StagePipeline::garment();
        let r = record("PO-5", Some("Cutting"));
        assert_eq!(requested_status(&pipeline, &r, None), None);
    }

    #[test]
    fn test_update_writes_requested_status() {
        let pipeline = StagePipeline::garment();
        let r = record("PO-6", Some("Cutting"));

        assert_eq!(
            requested_status(&pipeline, &r, Some("Stitching")),
            Some(ProductionStatus::Stage(StageName::Stitching))
        );
        // Out of sequence and out of vocabulary writes still go through
        assert_eq!(
            requested_status(&pipeline, &r, Some("PendingProduction")),
            Some(ProductionStatus::Stage(StageName::PendingProduction))
        );
        assert_eq!(
            requested_status(&pipeline, &r, Some("On Hold")),
            Some(ProductionStatus::Unrecognized("On Hold".to_string()))
        );
        assert_eq!(
            requested_status(&pipeline, &r, Some("")),
            Some(ProductionStatus::Missing)
        );
    }

    #[test]
    fn test_stage_write_merges_details() {
        let mut r = record("PO-7", Some("Cutting"));
        r.stage_details.insert(
            "Cutting".to_string(),
            serde_json::json!({ "pieces_cut": 100 }),
        );

        let write = StageWrite::new(
            &r,
            StageName::Stitching,
            serde_json::json!({ "line": "B", "operators": 12 }),
        );

        assert_eq!(write.status, StageName::Stitching);
        assert_eq!(write.expected_status.as_deref(), Some("Cutting"));
        assert_eq!(write.stage_details["Cutting"]["pieces_cut"], 100);
        assert_eq!(write.stage_details["Stitching"]["operators"], 12);
        // The snapshot itself is untouched
        assert!(!r.stage_details.contains_key("Stitching"));
    }

    #[test]
    fn test_stage_write_replaces_same_stage_details() {
        let mut r = record("PO-8", Some("Stitching"));
        r.stage_details.insert(
            "Stitching".to_string(),
            serde_json::json!({ "operators": 10 }),
        );

        let write = StageWrite::new(
            &r,
            StageName::Stitching,
            serde_json::json!({ "operators": 14 }),
        );

        assert_eq!(write.stage_details["Stitching"]["operators"], 14);
        assert_eq!(write.stage_details.as_object().map(|m| m.len()), Some(1));
        assert_eq!(write.expected_status.as_deref(), Some("Stitching"));
    }

    #[test]
    fn test_stage_write_expects_missing_status_as_null() {
        let r = record("PO-9", None);
        let write = StageWrite::new(&r, StageName::PendingProduction, serde_json::Value::Null);
        assert_eq!(write.expected_status, None);
    }

    #[test]
    fn test_stage_conflict_is_unprocessable() {
        use axum::{http::StatusCode, response::IntoResponse};

        let r = record("PO-10", Some("QC"));
        let err = stage_conflict(&r, StageName::Ironing);
        assert!(matches!(err, AppError::InvalidStateTransition(_)));
        assert!(err.to_string().contains("PO-10"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_stage_view_from_flow() {
        let pipeline = StagePipeline::garment();
        let records = vec![
            record("PO-1", Some("Trimming")),
            record("PO-2", Some("QC")),
            record("PO-3", Some("Packing")),
        ];
        let flow = StageFlow::new(&pipeline, StageName::QC, &records);
        let view = StageView::from_flow("QC", &flow);

        assert!(view.recognized);
        assert_eq!(view.label.as_deref(), Some("Quality Check"));
        assert_eq!(view.previous_stage, Some(StageName::Trimming));
        assert_eq!(view.next_stage, Some(StageName::Ironing));
        let orders: Vec<&str> = view.records.iter().map(|r| r.order_number.as_str()).collect();
        assert_eq!(orders, vec!["PO-1", "PO-2"]);
    }

    #[test]
    fn test_stage_view_unknown_stage() {
        let pipeline = StagePipeline::garment();
        let records = vec![record("PO-1", Some("Cutting"))];
        let flow = StageFlow::for_name(&pipeline, "Dyeing", &records);
        let view = StageView::from_flow("Dyeing", &flow);

        assert!(!view.recognized);
        assert_eq!(view.label, None);
        assert!(view.records.is_empty());
        assert_eq!(view.next_stage, None);
        assert_eq!(view.previous_stage, None);
    }
}
