//! Regression validation for NLU prediction endpoints.
//!
//! Compares live predictions against developer-authored fixtures across
//! three independent dimensions (top intent identity, confidence
//! threshold, entity set) and runs many such comparisons concurrently
//! with deterministic, index-ordered failure reporting.

pub mod batch;
pub mod error;
pub mod fixture;
pub mod prediction;
pub mod report;
pub mod telemetry;
pub mod validation;

// Re-export key types
pub use batch::{BatchRunner, FailureReport};
pub use error::{BatchError, FixtureError, PredictionError};
pub use fixture::{load_fixtures, parse_fixtures, EntitySpan, Fixture, SpanConvention};
pub use prediction::{
    DetectedEntity, EntityOrigin, PredictionClient, PredictionResult, ScoredIntent,
};
pub use report::BatchSummary;
pub use telemetry::init_tracing;
pub use validation::{
    check_entity_false_negatives, check_entity_false_positives, check_min_confidence,
    check_top_intent, validate, ValidationError, ValidationOptions, DEFAULT_MIN_CONFIDENCE,
};
