//! Stage flow for production orders
//!
//! Decides which production records a stage screen shows, whether a record
//! may enter a stage, and which stages sit either side of it. Everything is
//! derived from the stage's position in a [`StagePipeline`]; a stage that is
//! not in the pipeline has no position and every query comes back empty.

use crate::models::{ProductionRecord, ProductionStatus, StageName, StagePipeline};

/// Anything carrying a production status
pub trait Staged {
    fn production_status(&self) -> &ProductionStatus;
}

impl Staged for ProductionStatus {
    fn production_status(&self) -> &ProductionStatus {
        self
    }
}

impl Staged for ProductionRecord {
    fn production_status(&self) -> &ProductionStatus {
        &self.status
    }
}

impl<T: Staged + ?Sized> Staged for &T {
    fn production_status(&self) -> &ProductionStatus {
        (**self).production_status()
    }
}

/// Stage membership and transition eligibility over a record snapshot
#[derive(Debug, Clone)]
pub struct StageFlow<'a, R> {
    pipeline: &'a StagePipeline,
    stage: Option<StageName>,
    position: Option<usize>,
    records: &'a [R],
}

impl<'a, R: Staged> StageFlow<'a, R> {
    pub fn new(pipeline: &'a StagePipeline, stage: StageName, records: &'a [R]) -> Self {
        Self {
            pipeline,
            stage: Some(stage),
            position: pipeline.position(stage),
            records,
        }
    }

    /// Build a flow from a raw stage name; unknown names get no position.
    pub fn for_name(pipeline: &'a StagePipeline, name: &str, records: &'a [R]) -> Self {
        match StageName::parse(name) {
            Some(stage) => Self::new(pipeline, stage, records),
            None => Self {
                pipeline,
                stage: None,
                position: None,
                records,
            },
        }
    }

    pub fn stage(&self) -> Option<StageName> {
        self.stage
    }

    /// Whether the stage exists in the pipeline
    pub fn is_known(&self) -> bool {
        self.position.is_some()
    }

    /// Records shown on this stage's screen, in snapshot order.
    ///
    /// The first stage shows records at that stage plus records with no
    /// status. Later stages show records at the previous stage (ready to
    /// enter) and records already at this stage.
    pub fn stage_data(&self) -> Vec<&'a R> {
        let Some(position) = self.position else {
            return Vec::new();
        };
        let current = self.pipeline.get(position);
        let previous = position.checked_sub(1).and_then(|i| self.pipeline.get(i));

        self.records
            .iter()
            .filter(|record| match record.production_status() {
                ProductionStatus::Missing => position == 0,
                ProductionStatus::Stage(stage) => {
                    Some(*stage) == current || Some(*stage) == previous
                }
                ProductionStatus::Unrecognized(_) => false,
            })
            .collect()
    }

    /// Whether `record` may open this stage's form.
    ///
    /// True when the record sits at the previous stage or at this one.
    /// Records without a recognised status never qualify.
    pub fn can_access_stage<T: Staged + ?Sized>(&self, record: &T) -> bool {
        let Some(position) = self.position else {
            return false;
        };
        let Some(stage) = record.production_status().stage() else {
            return false;
        };
        match self.pipeline.position(stage) {
            Some(index) => index == position || index + 1 == position,
            None => false,
        }
    }

    pub fn next_stage(&self) -> Option<StageName> {
        self.position.and_then(|i| self.pipeline.get(i + 1))
    }

    pub fn previous_stage(&self) -> Option<StageName> {
        self.position
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.pipeline.get(i))
    }

    pub fn is_first_stage(&self) -> bool {
        self.position == Some(0)
    }

    pub fn is_last_stage(&self) -> bool {
        self.position == Some(self.pipeline.len() - 1)
    }
}
