// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed unilateral pushes.

use wm_wire::{DecodeError, Fields, Pdu};

use crate::change::ChangeNotification;

/// A unilateral PDU decoded by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// File changes for a subscription.
    Change(ChangeNotification),
    /// The daemon dropped a subscription on its own (root deleted, watch removed).
    Canceled { subscription: String, root: String },
    /// A daemon log line, sent after `log-level` was raised.
    Log { level: String, message: String },
    /// A push this crate has no typed form for.
    Other(Pdu),
}

impl Notification {
    pub fn decode(pdu: Pdu) -> Result<Self, DecodeError> {
        if pdu.field("log").is_some() {
            return Ok(Notification::Log {
                level: pdu.str_or_default("level")?,
                message: pdu.str_or_default("log")?,
            });
        }
        if pdu.field("subscription").is_none() {
            return Ok(Notification::Other(pdu));
        }
        if pdu.bool_or("canceled", false)? {
            return Ok(Notification::Canceled {
                subscription: pdu.str_or_default("subscription")?,
                root: pdu.str_or_default("root")?,
            });
        }
        ChangeNotification::decode(&pdu).map(Notification::Change)
    }

    /// Name of the subscription this push belongs to, if any.
    pub fn subscription(&self) -> Option<&str> {
        match self {
            Notification::Change(change) => Some(&change.subscription),
            Notification::Canceled { subscription, .. } => Some(subscription),
            Notification::Log { .. } | Notification::Other(_) => None,
        }
    }

    /// Root the subscription is on, if any.
    pub fn root(&self) -> Option<&str> {
        match self {
            Notification::Change(change) => Some(&change.root),
            Notification::Canceled { root, .. } => Some(root),
            Notification::Log { .. } | Notification::Other(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
