//! Concurrent batch orchestration with deterministic reporting.
//!
//! Fans one prediction call per fixture out on a [`JoinSet`] and folds
//! the outcomes back into index order, so the report is stable in CI
//! logs no matter how the in-flight requests interleave.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::BatchError;
use crate::fixture::Fixture;
use crate::prediction::PredictionClient;
use crate::validation::{validate, ValidationOptions};

/// One failed fixture in a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Position of the fixture in the input sequence.
    pub index: usize,

    /// Newline-joined description of everything that went wrong for
    /// this fixture.
    pub message: String,
}

/// Runs the comparator over many fixtures against a live
/// [`PredictionClient`].
pub struct BatchRunner {
    client: Arc<dyn PredictionClient>,
    options: ValidationOptions,
}

impl BatchRunner {
    /// Create a runner over an injected client. No process-wide client
    /// state is involved.
    pub fn new(client: Arc<dyn PredictionClient>, options: ValidationOptions) -> Self {
        Self { client, options }
    }

    /// Validate every fixture, one prediction call each, all in flight
    /// concurrently.
    ///
    /// Each call-and-compare unit is isolated: a failed `predict` call
    /// or any validation mismatch becomes exactly one [`FailureReport`]
    /// for that fixture's original index while the rest of the batch
    /// proceeds. The returned reports are sorted ascending by index
    /// regardless of completion order. An empty fixture list returns an
    /// empty report. Only a panicked prediction task is fatal.
    pub async fn run(&self, fixtures: &[Fixture]) -> Result<Vec<FailureReport>, BatchError> {
        let mut join_set = JoinSet::new();
        for (index, fixture) in fixtures.iter().cloned().enumerate() {
            let client = Arc::clone(&self.client);
            let options = self.options;
            join_set.spawn(async move {
                let outcome = run_one(client.as_ref(), &fixture, &options).await;
                (index, outcome)
            });
        }

        // All units settle before the report is finalized; nothing
        // reads the collection mid-flight.
        let mut slots: Vec<Option<Option<String>>> = vec![None; fixtures.len()];
        while let Some(joined) = join_set.join_next().await {
            let (index, outcome) = joined.map_err(|e| BatchError::TaskJoin(e.to_string()))?;
            slots[index] = Some(outcome);
        }

        let mut failures = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            let outcome = slot.ok_or(BatchError::MissingOutcome { index })?;
            if let Some(message) = outcome {
                debug!(index, "fixture failed");
                failures.push(FailureReport { index, message });
            }
        }

        info!(
            total = fixtures.len(),
            failed = failures.len(),
            "batch run complete"
        );
        Ok(failures)
    }
}

/// One call-and-compare unit. Returns the failure message, or `None`
/// if the fixture passed.
async fn run_one(
    client: &dyn PredictionClient,
    fixture: &Fixture,
    options: &ValidationOptions,
) -> Option<String> {
    match client.predict(&fixture.utterance).await {
        Err(e) => Some(e.to_string()),
        Ok(result) => {
            let errors = validate(&result, fixture, options);
            if errors.is_empty() {
                None
            } else {
                Some(
                    errors
                        .iter()
                        .map(|e| e.describe(&fixture.utterance))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
        }
    }
}
