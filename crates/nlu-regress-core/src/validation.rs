//! Comparison of one prediction result against one fixture.
//!
//! All checks are pure and exhaustive. A regression run's value is in
//! telling the developer everything that changed, so the entity checks
//! never stop at the first mismatch.

use serde::{Deserialize, Serialize};

use crate::fixture::Fixture;
use crate::prediction::{EntityOrigin, PredictionResult};

/// Default minimum confidence for the top intent.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// One kind of mismatch between a prediction and a fixture.
///
/// Pure data, never mutated once constructed; used both for
/// programmatic assertions and human-readable aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// The service returned no top scoring intent at all.
    MissingTopIntent,

    /// A top intent was returned but its name differs from the
    /// expected one.
    IntentMismatch { expected: String, actual: String },

    /// The top intent's confidence did not strictly exceed the
    /// threshold.
    LowConfidence { threshold: f64, actual: f64 },

    /// An expected entity value was not detected.
    EntityFalseNegative {
        expected_value: String,
        expected_offset: usize,
    },

    /// An unexpected custom entity was detected.
    EntityFalsePositive { actual_value: String },
}

impl ValidationError {
    /// Render a human-readable message, including the offending
    /// utterance for traceability in aggregated CI logs.
    pub fn describe(&self, utterance: &str) -> String {
        match self {
            ValidationError::MissingTopIntent => {
                format!("utterance {utterance:?}: no top scoring intent returned")
            }
            ValidationError::IntentMismatch { expected, actual } => {
                format!("utterance {utterance:?}: expected intent '{expected}', actual '{actual}'")
            }
            ValidationError::LowConfidence { threshold, actual } => {
                format!(
                    "utterance {utterance:?}: top intent confidence {actual} is not above {threshold}"
                )
            }
            ValidationError::EntityFalseNegative {
                expected_value,
                expected_offset,
            } => {
                format!(
                    "utterance {utterance:?}: expected entity '{expected_value}' at offset {expected_offset} was not detected"
                )
            }
            ValidationError::EntityFalsePositive { actual_value } => {
                format!("utterance {utterance:?}: unexpected custom entity '{actual_value}' detected")
            }
        }
    }
}

/// Options controlling a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// The top intent's score must be strictly greater than this to
    /// pass; a score exactly equal to the threshold fails.
    pub min_confidence: f64,

    /// When set, an expected entity only matches a detection at the
    /// same start offset.
    pub positional: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            positional: false,
        }
    }
}

impl ValidationOptions {
    /// Override the confidence threshold.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Require positional entity matches.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }
}

/// Check that a top intent is present and has the expected name.
pub fn check_top_intent(result: &PredictionResult, fixture: &Fixture) -> Option<ValidationError> {
    match &result.top_intent {
        None => Some(ValidationError::MissingTopIntent),
        Some(intent) if intent.name != fixture.expected_intent => {
            Some(ValidationError::IntentMismatch {
                expected: fixture.expected_intent.clone(),
                actual: intent.name.clone(),
            })
        }
        Some(_) => None,
    }
}

/// Check that the top intent's confidence strictly exceeds `threshold`.
///
/// An absent top intent is reported as confidence `0.0`.
pub fn check_min_confidence(result: &PredictionResult, threshold: f64) -> Option<ValidationError> {
    let actual = result.top_intent.as_ref().map(|i| i.score).unwrap_or(0.0);
    if actual > threshold {
        None
    } else {
        Some(ValidationError::LowConfidence { threshold, actual })
    }
}

/// Report every expected entity missing from the detections.
///
/// Each expected span is checked independently; every missing entity is
/// reported, not just the first.
pub fn check_entity_false_negatives(
    result: &PredictionResult,
    fixture: &Fixture,
    positional: bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for span in &fixture.expected_entities {
        // Spans are validated at fixture construction.
        let Some(expected_value) = span.slice(&fixture.utterance) else {
            continue;
        };
        let found = result
            .entities
            .iter()
            .any(|e| e.value == expected_value && (!positional || e.start == span.start));
        if !found {
            errors.push(ValidationError::EntityFalseNegative {
                expected_value: expected_value.to_string(),
                expected_offset: span.start,
            });
        }
    }
    errors
}

/// Report every detected custom entity absent from the expected set.
///
/// Prebuilt detections are exempt: the service's general-purpose
/// recognisers fire on their own schedule and are not regressions.
pub fn check_entity_false_positives(
    result: &PredictionResult,
    fixture: &Fixture,
) -> Vec<ValidationError> {
    let expected_values: Vec<&str> = fixture
        .expected_entities
        .iter()
        .filter_map(|s| s.slice(&fixture.utterance))
        .collect();

    result
        .entities
        .iter()
        .filter(|e| e.origin == EntityOrigin::Custom)
        .filter(|e| !expected_values.iter().any(|v| *v == e.value))
        .map(|e| ValidationError::EntityFalsePositive {
            actual_value: e.value.clone(),
        })
        .collect()
}

/// Run every check for one `(result, fixture)` pair and concatenate
/// their errors.
///
/// An empty return means the fixture passed. Pure, deterministic, no
/// I/O.
pub fn validate(
    result: &PredictionResult,
    fixture: &Fixture,
    options: &ValidationOptions,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(check_top_intent(result, fixture));
    errors.extend(check_min_confidence(result, options.min_confidence));
    errors.extend(check_entity_false_negatives(result, fixture, options.positional));
    errors.extend(check_entity_false_positives(result, fixture));
    errors
}
