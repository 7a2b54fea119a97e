//! Expected test cases and the fixture file loader.
//!
//! Entity spans use a single half-open `[start, end)` byte convention
//! everywhere. Legacy batch files that record inclusive end offsets are
//! converted at load time via [`SpanConvention::InclusiveEnd`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::FixtureError;

/// An entity expected within an utterance, identified by a half-open
/// byte span `[start, end)`.
///
/// The entity's textual value is derived from the owning fixture's
/// utterance, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Entity name as authored in the fixture file.
    pub name: String,

    /// Byte offset of the first character of the entity value.
    pub start: usize,

    /// Byte offset one past the last character of the entity value.
    pub end: usize,
}

impl EntitySpan {
    /// Create a new entity span.
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// The entity value within `utterance`, or `None` if the span does
    /// not describe a valid slice of it.
    pub fn slice<'a>(&self, utterance: &'a str) -> Option<&'a str> {
        utterance.get(self.start..self.end)
    }
}

/// A developer-authored expected outcome for one utterance.
///
/// Immutable after construction; owned solely by the run that loaded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// The raw input sent to the prediction service.
    pub utterance: String,

    /// The intent the service is expected to rank first.
    pub expected_intent: String,

    /// Custom entities expected to be detected within the utterance.
    pub expected_entities: Vec<EntitySpan>,
}

impl Fixture {
    /// Create a fixture, validating that every entity span describes a
    /// valid slice of the utterance.
    pub fn new(
        utterance: impl Into<String>,
        expected_intent: impl Into<String>,
        expected_entities: Vec<EntitySpan>,
    ) -> Result<Self, FixtureError> {
        let fixture = Self {
            utterance: utterance.into(),
            expected_intent: expected_intent.into(),
            expected_entities,
        };
        fixture.check_spans(0)?;
        Ok(fixture)
    }

    /// Verify every span against the utterance. `index` is the
    /// fixture's position in its batch, used for error reporting.
    fn check_spans(&self, index: usize) -> Result<(), FixtureError> {
        for span in &self.expected_entities {
            if span.slice(&self.utterance).is_none() {
                return Err(FixtureError::InvalidSpan {
                    index,
                    name: span.name.clone(),
                    start: span.start,
                    end: span.end,
                    utterance: self.utterance.clone(),
                });
            }
        }
        Ok(())
    }
}

/// End-offset convention used by a fixture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanConvention {
    /// `endPos` is one past the last character of the entity value.
    HalfOpen,

    /// `endPos` is the index of the last character of the entity value.
    /// Converted to half-open by adding one.
    InclusiveEnd,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    entity: String,

    #[serde(rename = "startPos")]
    start_pos: usize,

    #[serde(rename = "endPos")]
    end_pos: usize,
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    text: String,

    intent: String,

    #[serde(default)]
    entities: Vec<RawEntity>,
}

/// Parse a fixture set from its JSON wire form.
///
/// The expected schema is a sequence of
/// `{ "text", "intent", "entities": [{ "entity", "startPos", "endPos" }] }`
/// objects. Schema violations and out-of-range spans fail fast with a
/// [`FixtureError`]; nothing can be validated against a partially
/// loaded fixture set.
pub fn parse_fixtures(
    json: &str,
    convention: SpanConvention,
) -> Result<Vec<Fixture>, FixtureError> {
    let raw: Vec<RawFixture> = serde_json::from_str(json)?;
    let mut fixtures = Vec::with_capacity(raw.len());
    for (index, case) in raw.into_iter().enumerate() {
        let spans = case
            .entities
            .into_iter()
            .map(|e| {
                let end = match convention {
                    SpanConvention::HalfOpen => e.end_pos,
                    SpanConvention::InclusiveEnd => e.end_pos + 1,
                };
                EntitySpan::new(e.entity, e.start_pos, end)
            })
            .collect();
        let fixture = Fixture {
            utterance: case.text,
            expected_intent: case.intent,
            expected_entities: spans,
        };
        fixture.check_spans(index)?;
        fixtures.push(fixture);
    }
    Ok(fixtures)
}

/// Load a fixture set from a file.
pub fn load_fixtures(
    path: &Path,
    convention: SpanConvention,
) -> Result<Vec<Fixture>, FixtureError> {
    let json = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "read fixture file");
    parse_fixtures(&json, convention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BATCH_JSON: &str = r#"[
        {
            "text": "I'd like a Big Mac, fries and a coke, please",
            "intent": "order-items",
            "entities": [
                { "entity": "drink", "startPos": 32, "endPos": 36 }
            ]
        },
        {
            "text": "i need help",
            "intent": "Help",
            "entities": []
        }
    ]"#;

    #[test]
    fn test_parse_half_open_batch() {
        let fixtures = parse_fixtures(BATCH_JSON, SpanConvention::HalfOpen).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].expected_intent, "order-items");

        let span = &fixtures[0].expected_entities[0];
        assert_eq!(span.slice(&fixtures[0].utterance), Some("coke"));
    }

    #[test]
    fn test_inclusive_end_convention_converts_to_half_open() {
        // Same entity, recorded with the last-character index instead.
        let json = r#"[
            {
                "text": "I'd like a Big Mac, fries and a coke, please",
                "intent": "order-items",
                "entities": [
                    { "entity": "drink", "startPos": 32, "endPos": 35 }
                ]
            }
        ]"#;
        let fixtures = parse_fixtures(json, SpanConvention::InclusiveEnd).unwrap();
        let span = &fixtures[0].expected_entities[0];
        assert_eq!(span.end, 36);
        assert_eq!(span.slice(&fixtures[0].utterance), Some("coke"));
    }

    #[test]
    fn test_missing_entities_field_defaults_to_empty() {
        let json = r#"[{ "text": "hello", "intent": "Greeting" }]"#;
        let fixtures = parse_fixtures(json, SpanConvention::HalfOpen).unwrap();
        assert!(fixtures[0].expected_entities.is_empty());
    }

    #[test]
    fn test_schema_violation_fails_fast() {
        let json = r#"[{ "text": "hello" }]"#;
        let err = parse_fixtures(json, SpanConvention::HalfOpen).unwrap_err();
        assert!(matches!(err, FixtureError::Schema(_)));
    }

    #[test]
    fn test_out_of_range_span_fails_fast() {
        let json = r#"[
            { "text": "short", "intent": "X", "entities": [] },
            {
                "text": "short",
                "intent": "X",
                "entities": [{ "entity": "e", "startPos": 2, "endPos": 99 }]
            }
        ]"#;
        let err = parse_fixtures(json, SpanConvention::HalfOpen).unwrap_err();
        match err {
            FixtureError::InvalidSpan { index, start, end, .. } => {
                assert_eq!(index, 1);
                assert_eq!(start, 2);
                assert_eq!(end, 99);
            }
            other => panic!("expected InvalidSpan, got {other}"),
        }
    }

    #[test]
    fn test_inverted_span_is_rejected() {
        let err = Fixture::new("hello", "X", vec![EntitySpan::new("e", 4, 2)]).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidSpan { .. }));
    }

    #[test]
    fn test_span_not_on_char_boundary_is_rejected() {
        // 'é' is two bytes; a span ending inside it is not a valid slice.
        let err = Fixture::new("café now", "X", vec![EntitySpan::new("e", 0, 4)]).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidSpan { .. }));
    }

    #[test]
    fn test_load_fixtures_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BATCH_JSON.as_bytes()).unwrap();

        let fixtures = load_fixtures(file.path(), SpanConvention::HalfOpen).unwrap();
        assert_eq!(fixtures.len(), 2);
    }

    #[test]
    fn test_load_fixtures_missing_file() {
        let err = load_fixtures(
            Path::new("/nonexistent/batch.json"),
            SpanConvention::HalfOpen,
        )
        .unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
