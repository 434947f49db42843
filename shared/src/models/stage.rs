//! Production stage models

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A step in the garment production pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageName {
    PendingProduction,
    Cutting,
    Stitching,
    Trimming,
    QC,
    Ironing,
    Packing,
    ProductionCompleted,
}

impl StageName {
    /// Every stage in canonical pipeline order
    pub const ALL: [StageName; 8] = [
        StageName::PendingProduction,
        StageName::Cutting,
        StageName::Stitching,
        StageName::Trimming,
        StageName::QC,
        StageName::Ironing,
        StageName::Packing,
        StageName::ProductionCompleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::PendingProduction => "PendingProduction",
            StageName::Cutting => "Cutting",
            StageName::Stitching => "Stitching",
            StageName::Trimming => "Trimming",
            StageName::QC => "QC",
            StageName::Ironing => "Ironing",
            StageName::Packing => "Packing",
            StageName::ProductionCompleted => "ProductionCompleted",
        }
    }

    /// Parse a wire stage name. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|stage| stage.as_str() == s)
    }

    /// Human readable label for screens and documents
    pub fn label(&self) -> &'static str {
        match self {
            StageName::PendingProduction => "Pending Production",
            StageName::Cutting => "Cutting",
            StageName::Stitching => "Stitching",
            StageName::Trimming => "Trimming",
            StageName::QC => "Quality Check",
            StageName::Ironing => "Ironing",
            StageName::Packing => "Packing",
            StageName::ProductionCompleted => "Production Completed",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while building a pipeline from configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Pipeline must contain at least one stage")]
    Empty,

    #[error("Unknown stage name in pipeline: {0}")]
    UnknownStage(String),

    #[error("Stage appears more than once in pipeline: {0}")]
    DuplicateStage(StageName),
}

/// Ordered, duplicate-free sequence of stages a production moves through.
///
/// Stage index is the position in this list; all stage-flow behaviour is
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StagePipeline {
    stages: Vec<StageName>,
}

impl StagePipeline {
    /// The garment pipeline: pending, cutting, stitching, trimming, QC,
    /// ironing, packing, completed.
    pub fn garment() -> Self {
        Self {
            stages: StageName::ALL.to_vec(),
        }
    }

    pub fn new(stages: Vec<StageName>) -> Result<Self, PipelineError> {
        if stages.is_empty() {
            return Err(PipelineError::Empty);
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(PipelineError::DuplicateStage(*stage));
            }
        }
        Ok(Self { stages })
    }

    /// Build a pipeline from configured stage names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PipelineError> {
        let stages = names
            .iter()
            .map(|name| {
                StageName::parse(name.as_ref())
                    .ok_or_else(|| PipelineError::UnknownStage(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stages)
    }

    pub fn stages(&self) -> &[StageName] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn position(&self, stage: StageName) -> Option<usize> {
        self.stages.iter().position(|s| *s == stage)
    }

    pub fn get(&self, index: usize) -> Option<StageName> {
        self.stages.get(index).copied()
    }

    pub fn first(&self) -> Option<StageName> {
        self.stages.first().copied()
    }

    /// Stage immediately after `stage`, if both exist in this pipeline
    pub fn successor(&self, stage: StageName) -> Option<StageName> {
        self.position(stage).and_then(|i| self.get(i + 1))
    }

    /// Stage immediately before `stage`, if both exist in this pipeline
    pub fn predecessor(&self, stage: StageName) -> Option<StageName> {
        self.position(stage)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.get(i))
    }
}

impl Default for StagePipeline {
    fn default() -> Self {
        Self::garment()
    }
}

/// Typed form of a production record's raw `status` field.
///
/// Absent, `null` and empty statuses all collapse to `Missing` when the
/// record is deserialized, so stage logic never sees a raw string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ProductionStatus {
    #[default]
    Missing,
    Stage(StageName),
    /// A status string outside the stage vocabulary, kept verbatim
    Unrecognized(String),
}

impl ProductionStatus {
    pub fn stage(&self) -> Option<StageName> {
        match self {
            ProductionStatus::Stage(stage) => Some(*stage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProductionStatus::Missing => None,
            ProductionStatus::Stage(stage) => Some(stage.as_str()),
            ProductionStatus::Unrecognized(raw) => Some(raw),
        }
    }

    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => ProductionStatus::Missing,
            Some(s) => match StageName::parse(s) {
                Some(stage) => ProductionStatus::Stage(stage),
                None => ProductionStatus::Unrecognized(s.to_string()),
            },
        }
    }
}

impl From<Option<String>> for ProductionStatus {
    fn from(raw: Option<String>) -> Self {
        Self::from_raw(raw.as_deref())
    }
}

impl From<ProductionStatus> for Option<String> {
    fn from(status: ProductionStatus) -> Self {
        status.as_str().map(str::to_string)
    }
}

impl From<StageName> for ProductionStatus {
    fn from(stage: StageName) -> Self {
        ProductionStatus::Stage(stage)
    }
}

impl std::fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or("(none)"))
    }
}
