// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Seam for the conversation analyzer.
//!
//! The analyzer turns an uploaded chat log into the 14 raw request fields.
//! It lives outside this crate; only its contract and the
//! analyze-then-simulate pipeline are defined here.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::params::SimulationParameters;
use crate::render::TrajectoryRenderer;
use crate::simulation::{run_simulation, Report};

/// What an analyzer extracts from one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerOutput {
    /// Raw 14-field request object, same shape as a `/run` body.
    pub params: Map<String, Value>,
    /// Free-form statistics for debugging the inference.
    pub debug: Value,
    /// Number of messages the analyzer read.
    pub message_count: usize,
}

/// Analyzer failure, e.g. an unreadable or empty upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerError(pub String);

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for AnalyzerError {}

/// Infers simulation inputs from an uploaded conversation.
pub trait ConversationAnalyzer: Send + Sync {
    fn analyze(&self, upload: &[u8]) -> std::result::Result<AnalyzerOutput, AnalyzerError>;
}

/// Simulation report plus what the analyzer inferred.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedReport {
    #[serde(flatten)]
    pub report: Report,
    pub inferred_params: Map<String, Value>,
    pub analyzer_debug: Value,
    pub messages_analyzed: usize,
}

/// Run the analyzer, then the simulation on what it inferred.
pub fn analyze_and_run(
    analyzer: &dyn ConversationAnalyzer,
    upload: &[u8],
    settings: &SimulationConfig,
    renderer: Option<&dyn TrajectoryRenderer>,
) -> Result<AnalyzedReport> {
    let output = analyzer.analyze(upload).map_err(|e| {
        warn!(error = %e, bytes = upload.len(), "conversation analyzer failed");
        Error::UpstreamAnalyzer(e.to_string())
    })?;

    info!(messages = output.message_count, "conversation analyzed");
    let params = SimulationParameters::from_request(&output.params);
    let report = run_simulation(&params, settings, renderer)?;

    Ok(AnalyzedReport {
        report,
        inferred_params: output.params,
        analyzer_debug: output.debug,
        messages_analyzed: output.message_count,
    })
}
