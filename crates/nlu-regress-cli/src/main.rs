//! nlu-regress - regression validation CLI for NLU prediction endpoints.
//!
//! ## Commands
//!
//! - `run`: validate a fixture file against the live endpoint
//! - `single`: one-shot check of a single utterance
//!
//! The endpoint is configured through `NLU_ENDPOINT`, `NLU_APP_ID` and
//! `NLU_SUBSCRIPTION_KEY`. A non-empty failure report exits non-zero.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use nlu_regress_client::{HttpPredictionClient, ServiceConfig};
use nlu_regress_core::{
    init_tracing, load_fixtures, validate, BatchRunner, BatchSummary, Fixture, PredictionClient,
    SpanConvention, ValidationOptions, DEFAULT_MIN_CONFIDENCE,
};

#[derive(Parser)]
#[command(name = "nlu-regress")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Regression validation for NLU prediction endpoints", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a fixture file against the prediction endpoint
    Run {
        /// Path to the fixture file (JSON)
        fixtures: PathBuf,

        /// Minimum top-intent confidence (must be strictly exceeded)
        #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
        min_confidence: f64,

        /// Require detected entities to match expected start offsets
        #[arg(long)]
        positional: bool,

        /// End-offset convention used by the fixture file
        #[arg(long, value_enum, default_value_t = ConventionArg::HalfOpen)]
        convention: ConventionArg,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// One-shot check of a single utterance
    Single {
        /// The utterance to classify
        utterance: String,

        /// Expected top intent
        #[arg(short, long)]
        intent: String,

        /// Minimum top-intent confidence
        #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
        min_confidence: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConventionArg {
    /// endPos is one past the last character
    HalfOpen,

    /// endPos is the index of the last character (legacy batch files)
    InclusiveEnd,
}

impl From<ConventionArg> for SpanConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::HalfOpen => SpanConvention::HalfOpen,
            ConventionArg::InclusiveEnd => SpanConvention::InclusiveEnd,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json_logs, level);

    let config = ServiceConfig::from_env().context("prediction service is not configured")?;
    let client = Arc::new(HttpPredictionClient::new(config)?);

    match cli.command {
        Commands::Run {
            fixtures,
            min_confidence,
            positional,
            convention,
            json,
        } => {
            cmd_run(
                client,
                &fixtures,
                min_confidence,
                positional,
                convention.into(),
                json,
            )
            .await
        }
        Commands::Single {
            utterance,
            intent,
            min_confidence,
        } => cmd_single(client, &utterance, &intent, min_confidence).await,
    }
}

fn options(min_confidence: f64, positional: bool) -> ValidationOptions {
    let opts = ValidationOptions::default().with_min_confidence(min_confidence);
    if positional {
        opts.positional()
    } else {
        opts
    }
}

async fn cmd_run(
    client: Arc<HttpPredictionClient>,
    path: &Path,
    min_confidence: f64,
    positional: bool,
    convention: SpanConvention,
    json: bool,
) -> Result<()> {
    let fixtures = load_fixtures(path, convention)
        .with_context(|| format!("failed to load fixtures from {}", path.display()))?;

    let runner = BatchRunner::new(client, options(min_confidence, positional));
    let failures = runner.run(&fixtures).await?;
    let summary = BatchSummary::from_failures(fixtures.len(), failures);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render_text());
    }

    if summary.all_passed() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} fixtures failed", summary.failed, summary.total)
    }
}

async fn cmd_single(
    client: Arc<HttpPredictionClient>,
    utterance: &str,
    intent: &str,
    min_confidence: f64,
) -> Result<()> {
    let fixture = Fixture::new(utterance, intent, Vec::new())?;

    // Single-shot: a transport failure here is fatal, there is no
    // batch to keep going.
    let result = client.predict(utterance).await?;
    let errors = validate(&result, &fixture, &options(min_confidence, false));

    if errors.is_empty() {
        println!("✓ PASSED");
        Ok(())
    } else {
        for error in &errors {
            println!("✗ {}", error.describe(utterance));
        }
        anyhow::bail!("utterance failed {} check(s)", errors.len())
    }
}
