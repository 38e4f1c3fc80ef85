// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Health score: trajectory statistics blended with the final state.
//!
//!   final      = 100 (0.7 ⟨00|ρ|00⟩ + 0.3 Tr ρ²)
//!   trajectory = 0.45 mean + 0.20 correlation + 0.20 stability + 0.15 trend
//!   hybrid     = 100 · clip((0.7 trajectory + 0.3 final) / 100, 0, 1)^0.85

use ndarray::ArrayView1;
use serde::Serialize;

use super::observables::ObservableSeries;
use crate::floquet::reference_state;
use crate::linalg::CMatrix;
use crate::lindblad::{purity, state_fidelity};

const FIDELITY_WEIGHT: f64 = 0.7;
const PURITY_WEIGHT: f64 = 0.3;

const MEAN_WEIGHT: f64 = 0.45;
const CORRELATION_WEIGHT: f64 = 0.2;
const STABILITY_WEIGHT: f64 = 0.2;
const TREND_WEIGHT: f64 = 0.15;

const TRAJECTORY_SHARE: f64 = 0.7;
const FINAL_SHARE: f64 = 0.3;
const CURVE_EXPONENT: f64 = 0.85;

/// Summary statistics of the two happiness series. The narrative reads the
/// same numbers the score was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryStats {
    /// Mean of (A + B)/2 over the grid.
    pub mean_happiness: f64,
    /// Pearson correlation of A and B; 0 when either series is constant.
    pub correlation: f64,
    /// Mean of the two least-squares slopes against time.
    pub avg_slope: f64,
    /// Mean of the two population standard deviations.
    pub avg_volatility: f64,
}

impl TrajectoryStats {
    pub fn from_series(series: &ObservableSeries) -> Self {
        let a = &series.data_a;
        let b = &series.data_b;
        let combined: Vec<f64> = a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect();

        let correlation = pearson(a, b);
        Self {
            mean_happiness: mean(&combined),
            correlation: if correlation.is_nan() { 0.0 } else { correlation },
            avg_slope: (ols_slope(&series.times, a) + ols_slope(&series.times, b)) / 2.0,
            avg_volatility: (population_std(a) + population_std(b)) / 2.0,
        }
    }
}

/// Every term of the hybrid score, each on [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub final_state: f64,
    pub mean_happiness: f64,
    pub correlation: f64,
    pub stability: f64,
    pub trend: f64,
    pub trajectory: f64,
    pub hybrid: f64,
}

/// 100 · (0.7 F² + 0.3 purity) against the "both happy" reference.
pub fn final_state_score(rho_final: &CMatrix) -> f64 {
    let fidelity_sq = state_fidelity(rho_final, &reference_state());
    100.0 * (FIDELITY_WEIGHT * fidelity_sq + PURITY_WEIGHT * purity(rho_final))
}

/// Blend the trajectory terms with the final-state score.
pub fn score(stats: &TrajectoryStats, rho_final: &CMatrix) -> ScoreBreakdown {
    let final_state = final_state_score(rho_final);

    let mean_happiness = (stats.mean_happiness + 1.0) * 50.0;
    let correlation = (stats.correlation + 1.0) * 50.0;
    let stability = (-1.6 * stats.avg_volatility.clamp(0.0, 1.5)).exp() * 100.0;
    let trend = ((6.0 * stats.avg_slope).tanh() + 1.0) * 50.0;

    let trajectory = MEAN_WEIGHT * mean_happiness
        + CORRELATION_WEIGHT * correlation
        + STABILITY_WEIGHT * stability
        + TREND_WEIGHT * trend;

    let blended = TRAJECTORY_SHARE * trajectory + FINAL_SHARE * final_state;
    let curved = 100.0 * (blended / 100.0).clamp(0.0, 1.0).powf(CURVE_EXPONENT);
    // NaN never reaches the report.
    let hybrid = if curved.is_nan() { 0.0 } else { curved.clamp(0.0, 100.0) };

    ScoreBreakdown {
        final_state,
        mean_happiness,
        correlation,
        stability,
        trend,
        trajectory,
        hybrid,
    }
}

fn mean(xs: &[f64]) -> f64 {
    ArrayView1::from(xs).mean().unwrap_or(0.0)
}

/// Standard deviation with ddof = 0.
fn population_std(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    ArrayView1::from(xs).std(0.0)
}

/// NaN when either series has zero variance.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    }
}

/// Degree-1 least-squares slope of `y` against `t`.
fn ols_slope(t: &[f64], y: &[f64]) -> f64 {
    let (mt, my) = (mean(t), mean(y));
    let mut num = 0.0;
    let mut den = 0.0;
    for (ti, yi) in t.iter().zip(y) {
        num += (ti - mt) * (yi - my);
        den += (ti - mt).powi(2);
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
