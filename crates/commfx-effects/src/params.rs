//! Named parameter values for runtime introspection and updates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of an effect's current parameters, keyed by name.
pub type ParamSnapshot = BTreeMap<String, ParamValue>;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// On/off switch.
    Bool(bool),
    /// Numeric setting.
    Number(f64),
    /// Closed interval `(low, high)`.
    Range(f64, f64),
    /// Enumerated setting such as a mode name.
    Text(String),
}

impl ParamValue {
    /// Returns the number if this is a finite numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the number as a `u32` if it is a non-negative whole number in range.
    pub fn as_u32(&self) -> Option<u32> {
        self.as_f64()
            .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    }

    /// Returns the flag if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the interval if both ends are finite.
    pub fn as_range(&self) -> Option<(f64, f64)> {
        match self {
            ParamValue::Range(lo, hi) if lo.is_finite() && hi.is_finite() => Some((*lo, *hi)),
            _ => None,
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<(f64, f64)> for ParamValue {
    fn from((lo, hi): (f64, f64)) -> Self {
        ParamValue::Range(lo, hi)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}
