//! HTTP client for a LUIS-style NLU runtime endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use nlu_regress_core::{
    DetectedEntity, EntityOrigin, PredictionClient, PredictionError, PredictionResult,
    ScoredIntent,
};

use crate::config::ServiceConfig;

/// Type prefix the service uses for its built-in recognisers.
const PREBUILT_TYPE_PREFIX: &str = "builtin";

/// Raw wire form of the service response.
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "topScoringIntent")]
    top_scoring_intent: Option<RawIntent>,

    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    intent: String,

    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    entity: String,

    #[serde(rename = "type")]
    entity_type: String,

    #[serde(rename = "startIndex", default)]
    start_index: usize,
}

/// Map a raw service response into the core prediction model.
///
/// The entity origin is decided here, from the service's type string;
/// comparison logic downstream only ever sees the enumerated tag.
fn into_prediction(raw: RawResponse) -> PredictionResult {
    PredictionResult {
        top_intent: raw.top_scoring_intent.map(|i| ScoredIntent {
            name: i.intent,
            score: i.score,
        }),
        entities: raw
            .entities
            .into_iter()
            .map(|e| DetectedEntity {
                value: e.entity,
                start: e.start_index,
                origin: if e.entity_type.starts_with(PREBUILT_TYPE_PREFIX) {
                    EntityOrigin::Prebuilt
                } else {
                    EntityOrigin::Custom
                },
            })
            .collect(),
    }
}

/// [`PredictionClient`] backed by an HTTP NLU runtime endpoint.
pub struct HttpPredictionClient {
    config: ServiceConfig,
    http_client: reqwest::Client,
}

impl HttpPredictionClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: ServiceConfig) -> Result<Self, PredictionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("nlu-regress/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn prediction_url(&self) -> String {
        format!(
            "{}/luis/v2.0/apps/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.app_id
        )
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, utterance: &str) -> Result<PredictionResult, PredictionError> {
        let response = self
            .http_client
            .get(self.prediction_url())
            .header("Ocp-Apim-Subscription-Key", &self.config.subscription_key)
            .query(&[("q", utterance)])
            .query(&[
                ("verbose", self.config.verbose),
                ("staging", self.config.staging),
            ])
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PredictionError::Auth(format!("status {status}")));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PredictionError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let raw: RawResponse = response
            .json()
            .await
            .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;
        debug!(utterance, "prediction received");
        Ok(into_prediction(raw))
    }
}
