// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Qupid Floquet-Markov engine
//!
//! Models a couple as two coupled two-level systems under periodic drive,
//! evolves them under the Floquet-Markov master equation and turns the
//! trajectories into a health score, a narrative report and a plot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        REST (axum)  /  CLI (clap)        │
//! ├─────────────────────────────────────────┤
//! │   validation → params → simulation       │
//! ├──────────────────┬──────────────────────┤
//! │ floquet          │ lindblad             │
//! │ H(t), modes,     │ channels, rates,     │
//! │ lab frame        │ propagator           │
//! ├──────────────────┴──────────────────────┤
//! │   analysis (score, narrative) → render   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`params`]: The 14 simulation scalars and the request contract
//! - [`floquet`]: Driven Hamiltonian, Floquet mode table, lab-frame transform
//! - [`lindblad`]: Dissipation channels, Floquet-Markov rates, propagation
//! - [`analysis`]: Observables, scoring and narrative
//! - [`render`]: Trajectory plot
//! - [`simulation`]: The end-to-end pipeline
//! - [`analyzer`]: Seam for the conversation analyzer
//! - [`server`]: REST server
//! - [`config`]: Configuration management
//! - [`validation`]: Request validation
//! - [`error`]: Error types

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod floquet;
pub mod linalg;
pub mod lindblad;
pub mod params;
pub mod render;
pub mod server;
pub mod simulation;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use params::SimulationParameters;
pub use simulation::{run_simulation, Report, RunOutput};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
