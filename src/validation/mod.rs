// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for run requests.
//!
//! The request contract is lenient: missing or unparseable slider values
//! become 0. Only the body's shape is rejected here; odd-but-accepted
//! inputs are logged.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, ValidationError};
use crate::params::fields;

/// Slider range the frontend produces.
const SLIDER_MIN: f64 = 0.0;
const SLIDER_MAX: f64 = 100.0;

/// Check a raw `/run` body and return its field map.
///
/// Fails when the body is not a JSON object. Unknown keys and out-of-range
/// or non-numeric slider values are accepted with a warning.
pub fn validate_run_request(body: &Value) -> Result<&Map<String, Value>> {
    let map = body.as_object().ok_or_else(|| {
        ValidationError::invalid("body", format!("request body must be a JSON object, got {}", kind(body)))
    })?;

    for key in map.keys() {
        if !fields::ALL.contains(&key.as_str()) {
            warn!(field = %key, "ignoring unknown request field");
        }
    }

    for field in fields::ALL {
        match map.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    if !(SLIDER_MIN..=SLIDER_MAX).contains(&v) {
                        warn!(field, value = v, "slider value outside [0, 100]");
                    }
                }
            }
            Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => {}
            Some(other) => warn!(field, kind = kind(other), "unparseable slider value treated as 0"),
        }
    }

    Ok(map)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
