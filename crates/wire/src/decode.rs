// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema-driven field access for decoded payloads.
//!
//! Absent fields (and explicit `null`) are never an error: callers choose a
//! default. A field that is present with the wrong JSON type is a
//! [`DecodeError`].

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Frame, Pdu};

/// JSON value kinds, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A payload field had the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: expected {expected}, found {found}")]
pub struct DecodeError {
    pub field: String,
    pub expected: &'static str,
    pub found: JsonKind,
}

impl DecodeError {
    pub fn new(field: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self { field: field.into(), expected, found: JsonKind::of(found) }
    }
}

/// Typed, lenient-on-absence access to the fields of a JSON object.
pub trait Fields {
    /// Raw lookup, including explicit nulls.
    fn lookup(&self, key: &str) -> Option<&Value>;

    /// The value of `key` unless it is absent or `null`.
    fn field(&self, key: &str) -> Option<&Value> {
        self.lookup(key).filter(|value| !value.is_null())
    }

    fn opt_str(&self, key: &str) -> Result<Option<&str>, DecodeError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(DecodeError::new(key, "string", other)),
        }
    }

    fn str_or_default(&self, key: &str) -> Result<String, DecodeError> {
        Ok(self.opt_str(key)?.unwrap_or_default().to_string())
    }

    fn opt_bool(&self, key: &str) -> Result<Option<bool>, DecodeError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(DecodeError::new(key, "boolean", other)),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, DecodeError> {
        Ok(self.opt_bool(key)?.unwrap_or(default))
    }

    /// Non-negative integers. Integral floats (`12.0`) are accepted since some
    /// encoders emit every number as a double.
    fn opt_u64(&self, key: &str) -> Result<Option<u64>, DecodeError> {
        match self.field(key) {
            None => Ok(None),
            Some(value @ Value::Number(n)) => match n.as_u64() {
                Some(n) => Ok(Some(n)),
                None => match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                        Ok(Some(f as u64))
                    }
                    _ => Err(DecodeError::new(key, "unsigned integer", value)),
                },
            },
            Some(other) => Err(DecodeError::new(key, "unsigned integer", other)),
        }
    }

    fn opt_array(&self, key: &str) -> Result<Option<&[Value]>, DecodeError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(DecodeError::new(key, "array", other)),
        }
    }

    /// An array of strings; absent means empty.
    fn strings(&self, key: &str) -> Result<Vec<String>, DecodeError> {
        let Some(items) = self.opt_array(key)? else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(DecodeError::new(format!("{}[{}]", key, i), "string", other)),
            })
            .collect()
    }
}

impl Fields for Frame {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Fields for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Fields for Pdu {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
