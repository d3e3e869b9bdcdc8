//! Typed lookups of configuration overrides in a flat `serde_json::Value` object.
//!
//! A missing key (or an explicit `null`) means "keep the preset's value" and
//! yields the default. A key that is present with the wrong JSON type is an
//! [`ColorPairError::InvalidConfig`]: a caller who writes
//! `"min_hair_brightness": "bright"` gets told, rather than silently receiving
//! the preset constant. Range checks are left to `PairConfig::validate`.

use serde_json::Value;

use crate::error::ColorPairError;

fn wrong_type(name: &str, expected: &str, found: &Value) -> ColorPairError {
    ColorPairError::InvalidConfig(format!("{name} must be {expected}, got {found}"))
}

/// Present, non-null value for `name`, if any.
fn lookup<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

/// Reads a numeric override. JSON integers are accepted as `f64`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, ColorPairError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| wrong_type(name, "a number", v)),
    }
}

/// Reads an on/off switch, such as `desaturated_hair_cap`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> Result<bool, ColorPairError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v.as_bool().ok_or_else(|| wrong_type(name, "a boolean", v)),
    }
}

/// Reads a name, such as the `preset` selector.
pub fn param_string(params: &Value, name: &str, default: &str) -> Result<String, ColorPairError> {
    match lookup(params, name) {
        None => Ok(default.to_owned()),
        Some(v) => v
            .as_str()
            .map(String::from)
            .ok_or_else(|| wrong_type(name, "a string", v)),
    }
}
