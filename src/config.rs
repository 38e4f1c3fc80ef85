// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (QUPID_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result, ValidationError};
use crate::lindblad::StateTolerances;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Numerical settings for each simulation
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Trajectory plot settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upper bounds on grid and table sizes
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        } else {
            for path in &["config.yaml", "config.yml", "/etc/qupid/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    config = Self::from_file(path)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse one YAML file; missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("QUPID_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("QUPID_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = env::var("QUPID_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QUPID_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("QUPID_RENDER_PLOT") {
            self.render.enabled = val.to_lowercase() == "true" || val == "1";
        }
        if let Ok(val) = env::var("QUPID_MODE_TABLE_SAMPLES") {
            if let Ok(samples) = val.parse() {
                self.simulation.mode_table_samples = samples;
            }
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server port cannot be 0".into()));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "log format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            )));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(Error::Config("plot width and height must be positive".into()));
        }
        if self.server.cors.allow_all {
            tracing::warn!(
                "CORS is set to allow all origins. Set server.cors.allow_all to false \
                 and list specific origins outside local development."
            );
        }
        self.simulation
            .validate(&self.limits)
            .map_err(|e| Error::Config(e.to_string()))
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// REST port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
            shutdown_timeout_sec: default_shutdown_timeout(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allow all origins (development only)
    #[serde(default)]
    pub allow_all: bool,

    /// Allowed origins when allow_all is false
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_all: false,
            allowed_origins: vec![
                "http://localhost:5173".into(),
                "http://127.0.0.1:5173".into(),
            ],
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Numerical settings of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of drive periods simulated
    #[serde(default = "default_periods")]
    pub periods: usize,

    /// Lab-frame grid points on [0, periods·T], both ends included
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,

    /// Floquet mode table intervals per period (M)
    #[serde(default = "default_mode_table_samples")]
    pub mode_table_samples: usize,

    /// Exponential-midpoint steps per table interval
    #[serde(default = "default_substeps")]
    pub substeps_per_sample: usize,

    /// Largest drive sideband |k| in the rate sums
    #[serde(default = "default_sideband_cutoff")]
    pub sideband_cutoff: usize,

    /// Allowed ‖U†U − I‖ for the one-period propagator
    #[serde(default = "default_unitarity_tolerance")]
    pub unitarity_tolerance: f64,

    /// Allowed |Tr ρ − 1|
    #[serde(default = "default_trace_tolerance")]
    pub trace_tolerance: f64,

    /// Allowed negative eigenvalue magnitude of ρ
    #[serde(default = "default_positivity_tolerance")]
    pub positivity_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            num_samples: default_num_samples(),
            mode_table_samples: default_mode_table_samples(),
            substeps_per_sample: default_substeps(),
            sideband_cutoff: default_sideband_cutoff(),
            unitarity_tolerance: default_unitarity_tolerance(),
            trace_tolerance: default_trace_tolerance(),
            positivity_tolerance: default_positivity_tolerance(),
        }
    }
}

impl SimulationConfig {
    pub fn state_tolerances(&self) -> StateTolerances {
        StateTolerances {
            trace: self.trace_tolerance,
            positivity: self.positivity_tolerance,
        }
    }

    /// Structural checks plus the configured resource limits.
    pub fn validate(&self, limits: &ResourceLimits) -> Result<()> {
        for (field, value) in [
            ("periods", self.periods),
            ("num_samples", self.num_samples),
            ("mode_table_samples", self.mode_table_samples),
            ("substeps_per_sample", self.substeps_per_sample),
        ] {
            if value == 0 {
                return Err(ValidationError::invalid(field, "must be greater than 0").into());
            }
        }
        for (field, value) in [
            ("unitarity_tolerance", self.unitarity_tolerance),
            ("trace_tolerance", self.trace_tolerance),
            ("positivity_tolerance", self.positivity_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::invalid(field, format!("must be > 0, got {value}")).into());
            }
        }

        check_limit("num_samples", self.num_samples, limits.max_num_samples)?;
        check_limit("mode_table_samples", self.mode_table_samples, limits.max_mode_table_samples)?;
        check_limit("periods", self.periods, limits.max_periods)?;
        check_limit("sideband_cutoff", self.sideband_cutoff, limits.max_sideband_cutoff)?;
        check_limit(
            "substeps_per_sample",
            self.substeps_per_sample,
            limits.max_substeps_per_sample,
        )
    }
}

fn check_limit(resource: &str, requested: usize, limit: usize) -> Result<()> {
    if requested > limit {
        return Err(ValidationError::ResourceLimit {
            resource: resource.into(),
            limit: limit as u64,
            requested: requested as u64,
        }
        .into());
    }
    Ok(())
}

fn default_periods() -> usize {
    10
}

fn default_num_samples() -> usize {
    200
}

fn default_mode_table_samples() -> usize {
    500
}

fn default_substeps() -> usize {
    4
}

fn default_sideband_cutoff() -> usize {
    5
}

fn default_unitarity_tolerance() -> f64 {
    1e-8
}

fn default_trace_tolerance() -> f64 {
    1e-6
}

fn default_positivity_tolerance() -> f64 {
    1e-8
}

/// Trajectory plot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render the plot unless a request opts out
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Image width in pixels
    #[serde(default = "default_plot_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_plot_height")]
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_plot_width(),
            height: default_plot_height(),
        }
    }
}

fn default_plot_width() -> u32 {
    1000
}

fn default_plot_height() -> u32 {
    600
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "json".into()
}

/// Resource limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum lab-frame grid points
    #[serde(default = "default_max_num_samples")]
    pub max_num_samples: usize,

    /// Maximum mode table intervals per period
    #[serde(default = "default_max_mode_table_samples")]
    pub max_mode_table_samples: usize,

    /// Maximum simulated drive periods
    #[serde(default = "default_max_periods")]
    pub max_periods: usize,

    /// Maximum sideband cutoff
    #[serde(default = "default_max_sideband_cutoff")]
    pub max_sideband_cutoff: usize,

    /// Maximum integration steps per table interval
    #[serde(default = "default_max_substeps")]
    pub max_substeps_per_sample: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_num_samples: default_max_num_samples(),
            max_mode_table_samples: default_max_mode_table_samples(),
            max_periods: default_max_periods(),
            max_sideband_cutoff: default_max_sideband_cutoff(),
            max_substeps_per_sample: default_max_substeps(),
        }
    }
}

fn default_max_num_samples() -> usize {
    10_000
}

fn default_max_mode_table_samples() -> usize {
    20_000
}

fn default_max_periods() -> usize {
    1_000
}

fn default_max_sideband_cutoff() -> usize {
    50
}

fn default_max_substeps() -> usize {
    64
}
