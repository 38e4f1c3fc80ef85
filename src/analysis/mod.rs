// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! From lab-frame states to a score and a story.

pub mod narrative;
pub mod observables;
pub mod scoring;

pub use observables::{ObservableExtractor, ObservableSeries};
pub use scoring::{final_state_score, score, ScoreBreakdown, TrajectoryStats};
