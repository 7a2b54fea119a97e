//! Prediction results and the client seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

/// Where a detected entity came from.
///
/// Decided by the client at the service boundary; comparison logic
/// never inspects service type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityOrigin {
    /// Defined specifically in the target model.
    Custom,

    /// Recognised by the service's built-in general-purpose recognisers.
    Prebuilt,
}

/// The single highest-confidence intent returned for an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredIntent {
    /// Intent label.
    pub name: String,

    /// Confidence score in `[0.0, 1.0]`.
    pub score: f64,
}

/// One entity found by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEntity {
    /// Textual value of the entity as detected.
    pub value: String,

    /// Byte offset where the value starts in the utterance.
    pub start: usize,

    /// Whether the entity is custom or prebuilt.
    pub origin: EntityOrigin,
}

/// Result of one prediction call.
///
/// Transient: created per call and discarded after comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The top scoring intent, absent when the service returned none.
    pub top_intent: Option<ScoredIntent>,

    /// All entities detected in the utterance.
    pub entities: Vec<DetectedEntity>,
}

/// Injectable prediction endpoint.
///
/// Implement this trait to plug in a live NLU runtime or a test stub.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Classify `utterance`, returning the top intent and detected
    /// entities.
    ///
    /// Transport and auth failures surface as [`PredictionError`] and
    /// are treated as per-fixture failures by the batch orchestrator,
    /// never fatal to a batch.
    async fn predict(&self, utterance: &str) -> Result<PredictionResult, PredictionError>;
}
