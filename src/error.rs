// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the simulation engine and its service surface.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Invalid simulation input
    Validation(ValidationError),
    /// Numerical integration or decomposition failure
    Numerical(NumericalError),
    /// The conversation analyzer could not produce parameters
    UpstreamAnalyzer(String),
    /// Trajectory plot rendering failed
    Render(String),
    /// Server error
    Server(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl Error {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Validation(ValidationError::InvalidParameter { .. }) => "INVALID_PARAMETER",
            Error::Validation(ValidationError::ResourceLimit { .. }) => "RESOURCE_LIMIT",
            Error::Numerical(_) => "NUMERICAL_INSTABILITY",
            Error::UpstreamAnalyzer(_) => "ANALYZER_FAILURE",
            Error::Render(_) => "RENDER_ERROR",
            Error::Server(_) => "SERVER_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// HTTP status the REST layer reports for this error.
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Error::Validation(_) | Error::UpstreamAnalyzer(_) | Error::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Numerical(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Numerical(e) => write!(f, "Numerical instability: {}", e),
            Error::UpstreamAnalyzer(msg) => write!(f, "Analyzer failed: {}", msg),
            Error::Render(msg) => write!(f, "Render error: {}", msg),
            Error::Server(msg) => write!(f, "Server error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Numerical(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<NumericalError> for Error {
    fn from(e: NumericalError) -> Self {
        Error::Numerical(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Input validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Malformed or out-of-domain scalar parameter
    InvalidParameter { field: String, message: String },
    /// Grid or table size above the configured limit
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidParameter { field, message } => {
                write!(f, "Invalid parameter '{}': {}", field, message)
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => write!(
                f,
                "Resource limit exceeded for {}: limit={}, requested={}",
                resource, limit, requested
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Numerical failures. These abort the request instead of returning a
/// physically invalid state.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// Propagator drifted away from unitarity
    NonUnitary { deviation: f64, tolerance: f64 },
    /// Density matrix trace drifted away from 1
    TraceDrift { time: f64, trace: f64, tolerance: f64 },
    /// Density matrix acquired a negative eigenvalue
    NotPositive {
        time: f64,
        min_eigenvalue: f64,
        tolerance: f64,
    },
    /// Iterative decomposition failed
    NoConvergence(String),
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericalError::NonUnitary {
                deviation,
                tolerance,
            } => write!(
                f,
                "propagator not unitary: deviation {:.3e} exceeds {:.1e}",
                deviation, tolerance
            ),
            NumericalError::TraceDrift {
                time,
                trace,
                tolerance,
            } => write!(
                f,
                "trace drifted to {:.12} at t={:.4} (tolerance {:.1e})",
                trace, time, tolerance
            ),
            NumericalError::NotPositive {
                time,
                min_eigenvalue,
                tolerance,
            } => write!(
                f,
                "density matrix not positive at t={:.4}: min eigenvalue {:.3e} (tolerance {:.1e})",
                time, min_eigenvalue, tolerance
            ),
            NumericalError::NoConvergence(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for NumericalError {}
