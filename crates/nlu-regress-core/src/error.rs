//! Error taxonomy for NLU regression runs.
//!
//! Only fixture-set-level errors are fatal to a batch. Per-utterance
//! problems, whether transport failures or semantic mismatches, are
//! captured as failure reports and never thrown past the orchestrator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or parsing a fixture set.
///
/// Fatal to the whole batch run: nothing can be validated against a
/// fixture set that failed to load.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture data did not match the expected schema.
    #[error("malformed fixture data: {0}")]
    Schema(#[from] serde_json::Error),

    /// An entity span does not describe a valid slice of its utterance.
    #[error("fixture {index}: entity '{name}' span {start}..{end} is invalid for utterance {utterance:?}")]
    InvalidSpan {
        index: usize,
        name: String,
        start: usize,
        end: usize,
        utterance: String,
    },
}

/// Errors raised by a [`PredictionClient`](crate::PredictionClient) for
/// a single utterance.
///
/// Recovered at the per-fixture level: the orchestrator records one
/// failure for that fixture's index and the batch continues.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The request never produced a response (network, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service rejected the credentials.
    #[error("authentication rejected by prediction service: {0}")]
    Auth(String),

    /// The service answered with a non-success status.
    #[error("prediction service returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response body could not be interpreted.
    #[error("unexpected prediction response: {0}")]
    InvalidResponse(String),
}

/// Fatal errors from the batch orchestrator itself.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A prediction task panicked or was cancelled before settling.
    #[error("prediction task join error: {0}")]
    TaskJoin(String),

    /// A settled task never produced an outcome for this fixture.
    #[error("missing prediction outcome for fixture {index}")]
    MissingOutcome { index: usize },
}
