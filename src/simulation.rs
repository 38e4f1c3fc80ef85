// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end simulation pipeline.
//!
//! Stages run strictly in order, each consuming the complete output of the
//! previous one:
//!
//! parameters → H(t), channels → Floquet table → rates → Floquet-basis
//! trajectory → lab frame → ⟨Z_A⟩, ⟨Z_B⟩ → score, narrative → report.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{narrative, score, ObservableExtractor, ScoreBreakdown, TrajectoryStats};
use crate::config::SimulationConfig;
use crate::error::{Result, ValidationError};
use crate::floquet::{reference_state, DrivenHamiltonian, FloquetModeSolver, LabFrameTransformer, OperatorCatalog};
use crate::linalg::CMatrix;
use crate::lindblad::{
    floquet_markov_rates, purity, time_grid, trace_real, DissipationChannel, FloquetMarkovPropagator,
};
use crate::params::SimulationParameters;
use crate::render::TrajectoryRenderer;

const RULE_WIDTH: usize = 40;

/// Engine diagnostics reported next to the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Principal-branch quasi-energies, ascending.
    pub quasi_energies: Vec<f64>,
    pub final_purity: f64,
    pub final_trace: f64,
    /// Number of nonzero Floquet-basis jump operators.
    pub jump_operators: usize,
    pub stats: TrajectoryStats,
    pub score: ScoreBreakdown,
}

/// Result of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub health_score: f64,
    pub report_text: String,
    pub plot_base64: Option<String>,
    pub diagnostics: Diagnostics,
}

/// The public output contract: score, text and optional plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub health_score: f64,
    pub report_text: String,
    pub plot_base64: Option<String>,
}

impl Report {
    pub fn output(&self) -> RunOutput {
        RunOutput {
            health_score: self.health_score,
            report_text: self.report_text.clone(),
            plot_base64: self.plot_base64.clone(),
        }
    }
}

/// Run every stage for one parameter set.
///
/// Parameters are validated before anything is propagated. A renderer is
/// only invoked when given.
pub fn run_simulation(
    params: &SimulationParameters,
    settings: &SimulationConfig,
    renderer: Option<&dyn TrajectoryRenderer>,
) -> Result<Report> {
    let started = Instant::now();
    params.validate()?;

    let ops = OperatorCatalog::new();
    let hamiltonian = DrivenHamiltonian::new(params, &ops)?;
    let channels = DissipationChannel::from_params(params, &ops)?;

    let table = FloquetModeSolver::new(
        &hamiltonian,
        settings.mode_table_samples,
        settings.substeps_per_sample,
    )
    .with_unitarity_tolerance(settings.unitarity_tolerance)
    .solve()?;

    let rates = floquet_markov_rates(&table, &channels, settings.sideband_cutoff);
    let propagator = FloquetMarkovPropagator::new(table.quasi_energies(), &rates, settings.state_tolerances());
    let jump_operators = rates.jump_operators().len();

    let frame = LabFrameTransformer::new(&table);
    let rho_floquet_0 = frame.to_floquet(&reference_state());
    let times = time_grid(table.period(), settings.periods, settings.num_samples);
    let trajectory = propagator.evolve(&rho_floquet_0, &times)?;

    let lab_states = trajectory
        .times
        .iter()
        .zip(&trajectory.states)
        .map(|(&t, rho)| frame.to_lab(rho, t))
        .collect::<Result<Vec<CMatrix>>>()?;
    debug!(states = lab_states.len(), period = table.period(), "lab-frame trajectory assembled");

    let series = ObservableExtractor::new(&ops).extract(&times, &lab_states);
    let rho_final = lab_states
        .last()
        .ok_or_else(|| ValidationError::invalid("num_samples", "time grid is empty"))?;

    let stats = TrajectoryStats::from_series(&series);
    let breakdown = score(&stats, rho_final);
    let health_score = breakdown.hybrid;
    debug!(
        correlation = stats.correlation,
        avg_slope = stats.avg_slope,
        avg_volatility = stats.avg_volatility,
        mean_happiness = stats.mean_happiness,
        final_state = breakdown.final_state,
        trajectory = breakdown.trajectory,
        "trajectory scored"
    );

    let report_text = format_report(health_score, &narrative::generate(&stats, health_score));

    let plot_base64 = match renderer {
        Some(r) => Some(r.render(&series.times, &series.data_a, &series.data_b)?),
        None => None,
    };

    let diagnostics = Diagnostics {
        quasi_energies: table.quasi_energies().to_vec(),
        final_purity: purity(rho_final),
        final_trace: trace_real(rho_final),
        jump_operators,
        stats,
        score: breakdown,
    };

    info!(
        health_score,
        elapsed_ms = started.elapsed().as_millis() as u64,
        plot = plot_base64.is_some(),
        "simulation complete"
    );

    Ok(Report {
        health_score,
        report_text,
        plot_base64,
        diagnostics,
    })
}

/// Banner, score line and narrative.
pub fn format_report(health_score: f64, narrative: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    [
        format!("\n{rule}"),
        "  QUPID RELATIONSHIP REPORT".to_string(),
        rule.clone(),
        format!("HEALTH SCORE: {health_score:.1}%"),
        "-".repeat(RULE_WIDTH),
        narrative.to_string(),
        format!("{rule}\n"),
    ]
    .join("\n")
}
