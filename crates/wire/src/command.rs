// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound commands.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

/// Trailing options mapping of a command, in insertion order.
pub type Options = IndexMap<String, Value>;

/// One request to the daemon: a verb, positional arguments, and an optional
/// trailing options mapping.
///
/// Serializes as `[verb, arg1, ..., {options}]`. The options object is only
/// written when at least one option has been set.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    verb: String,
    args: Vec<Value>,
    options: Option<Options>,
}

impl Command {
    pub fn new(verb: impl Into<String>) -> Self {
        Self { verb: verb.into(), args: Vec::new(), options: None }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Set a field of the trailing options mapping.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.get_or_insert_with(Options::new).insert(key.into(), value.into());
        self
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.args.len() + usize::from(self.options.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.verb)?;
        for arg in &self.args {
            seq.serialize_element(arg)?;
        }
        if let Some(options) = &self.options {
            seq.serialize_element(options)?;
        }
        seq.end()
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
