//! HTTP prediction client for NLU regression validation.
//!
//! Implements the core [`PredictionClient`](nlu_regress_core::PredictionClient)
//! seam against a LUIS-style runtime endpoint. Everything
//! service-specific (subscription-key header, inclusive end indices,
//! string-typed entity kinds) is translated at this boundary and never
//! crosses into the core model.

pub mod client;
pub mod config;

pub use client::HttpPredictionClient;
pub use config::{ConfigError, ServiceConfig};
