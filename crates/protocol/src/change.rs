// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed view over a subscription push.
//!
//! ```text
//! {"unilateral":true,"subscription":"sub1","root":"/tmp","clock":"c:1:2:9",
//!  "is_fresh_instance":false,
//!  "files":[{"name":"a.txt","type":"f","size":3,"exists":true,"cclock":"c:1:2:9"}]}
//! ```

use std::fmt;

use serde_json::{Map, Value};
use wm_wire::{DecodeError, Fields, Pdu};

/// How a file's state changed since the previous notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChange {
    Created,
    Removed,
    Updated,
    /// Created and removed again between two notifications.
    Ephemeral,
}

impl StateChange {
    /// `cclock_matches` is whether the file's creation clock equals the
    /// notification's clock.
    pub fn classify(cclock_matches: bool, exists: bool) -> Self {
        match (cclock_matches, exists) {
            (true, true) => StateChange::Created,
            (true, false) => StateChange::Ephemeral,
            (false, false) => StateChange::Removed,
            (false, true) => StateChange::Updated,
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateChange::Created => "created",
            StateChange::Removed => "removed",
            StateChange::Updated => "updated",
            StateChange::Ephemeral => "ephemeral",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    Regular,
    Directory,
    Symlink,
    /// Any other code the daemon reports, including `?` for unknown.
    Other(String),
}

impl FileType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "f" => FileType::Regular,
            "d" => FileType::Directory,
            "l" => FileType::Symlink,
            other => FileType::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            FileType::Regular => "f",
            FileType::Directory => "d",
            FileType::Symlink => "l",
            FileType::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub name: String,
    pub file_type: FileType,
    pub size: u64,
    /// Only populated for symlinks.
    pub target: Option<String>,
    pub change: StateChange,
}

impl FileChange {
    fn decode(entry: &Value, index: usize, clock: &str) -> Result<Self, DecodeError> {
        let object = match entry {
            // Subscriptions asking only for `name` get bare strings back.
            Value::String(name) => {
                return Ok(Self {
                    name: name.clone(),
                    file_type: FileType::Other(String::new()),
                    size: 0,
                    target: None,
                    change: StateChange::classify(false, true),
                })
            }
            Value::Object(object) => object,
            other => return Err(DecodeError::new(format!("files[{}]", index), "object", other)),
        };
        decode_entry(object, index, clock)
    }
}

fn decode_entry(
    object: &Map<String, Value>,
    index: usize,
    clock: &str,
) -> Result<FileChange, DecodeError> {
    let at = |err: DecodeError| DecodeError { field: format!("files[{}].{}", index, err.field), ..err };

    let file_type = FileType::from_code(object.opt_str("type").map_err(at)?.unwrap_or_default());
    let target = match file_type {
        FileType::Symlink => object.opt_str("symlink_target").map_err(at)?.map(str::to_string),
        _ => None,
    };
    let cclock = object.opt_str("cclock").map_err(at)?;
    let exists = object.bool_or("exists", true).map_err(at)?;

    Ok(FileChange {
        name: object.str_or_default("name").map_err(at)?,
        file_type,
        size: object.opt_u64("size").map_err(at)?.unwrap_or_default(),
        target,
        change: StateChange::classify(cclock == Some(clock), exists),
    })
}

/// Changes to one or more files under a subscribed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub subscription: String,
    pub root: String,
    pub clock: String,
    /// The daemon restarted or recrawled; `files` is a full listing.
    pub is_fresh_instance: bool,
    pub files: Vec<FileChange>,
}

impl ChangeNotification {
    pub fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        let clock = pdu.str_or_default("clock")?;
        let files = pdu
            .opt_array("files")?
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, entry)| FileChange::decode(entry, i, &clock))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            subscription: pdu.str_or_default("subscription")?,
            root: pdu.str_or_default("root")?,
            is_fresh_instance: pdu.bool_or("is_fresh_instance", false)?,
            clock,
            files,
        })
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
