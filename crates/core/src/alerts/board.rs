//! Active alert list with de-duplication and dismiss deadlines
//!
//! Alerts keep insertion order. No two alerts share a message. Warning alerts
//! carry a dismiss deadline stored in a map keyed by alert id; removing an
//! alert removes its deadline, so a deadline can never outlive its alert.
//! Ids come from a counter that is never reset, so a new alert never reuses
//! the id of an old one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::core_types::time::Timestamp;

/// Unique identifier of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct AlertId(u64);

impl AlertId {
    /// Raw id value
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alert-{}", self.0)
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Dismisses itself after the configured timeout
    Warning,
    /// Stays until its condition resolves or the operator dismisses it
    Critical,
}

/// One active alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: Timestamp,
}

/// Ordered set of active alerts plus their dismiss deadlines
#[derive(Debug)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
    deadlines: FxHashMap<AlertId, Timestamp>,
    next_id: u64,
    warning_lifetime: Duration,
}

impl AlertBoard {
    /// Create an empty board whose warnings live for `warning_lifetime`
    #[must_use]
    pub fn new(warning_lifetime: Duration) -> Self {
        Self {
            alerts: Vec::new(),
            deadlines: FxHashMap::default(),
            next_id: 1,
            warning_lifetime,
        }
    }

    /// Active alerts in insertion order
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Number of active alerts
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether no alert is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Alert carrying exactly `message`, if any
    #[must_use]
    pub fn find_by_message(&self, message: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.message == message)
    }

    /// Whether an alert with exactly `message` is active
    #[must_use]
    pub fn contains_message(&self, message: &str) -> bool {
        self.find_by_message(message).is_some()
    }

    /// Dismiss deadline of an alert, `None` for critical or unknown alerts
    #[must_use]
    pub fn deadline_of(&self, id: AlertId) -> Option<Timestamp> {
        self.deadlines.get(&id).copied()
    }

    /// Number of pending dismiss deadlines
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.deadlines.len()
    }

    /// Raise an alert unless one with the same message is already active
    ///
    /// Returns the new id, or `None` when the message was already present.
    pub fn add(
        &mut self,
        kind: AlertKind,
        message: impl Into<String>,
        now: Timestamp,
    ) -> Option<AlertId> {
        let message = message.into();
        if self.contains_message(&message) {
            return None;
        }

        let id = AlertId(self.next_id);
        self.next_id += 1;

        if kind == AlertKind::Warning {
            self.deadlines.insert(id, now.plus(self.warning_lifetime));
        }
        debug!(alert_id = %id, ?kind, %message, "alert raised");
        self.alerts.push(Alert {
            id,
            kind,
            message,
            created_at: now,
        });
        Some(id)
    }

    /// Remove an alert and cancel its deadline
    ///
    /// Unknown ids are ignored. Returns whether an alert was removed.
    pub fn remove(&mut self, id: AlertId) -> bool {
        self.deadlines.remove(&id);
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        let removed = self.alerts.len() != before;
        if removed {
            debug!(alert_id = %id, "alert removed");
        }
        removed
    }

    /// Remove every alert and cancel every deadline
    pub fn clear_all(&mut self) {
        self.deadlines.clear();
        self.alerts.clear();
    }

    /// Remove alerts whose deadline is at or before `now`
    ///
    /// A deadline further than one warning lifetime past `now` can only come
    /// from a clock that stepped backwards; it is pulled in to `now` plus one
    /// lifetime first. Returns the ids removed, oldest alert first.
    pub fn fire_due(&mut self, now: Timestamp) -> Vec<AlertId> {
        let latest = now.plus(self.warning_lifetime);
        for deadline in self.deadlines.values_mut() {
            if *deadline > latest {
                *deadline = latest;
            }
        }

        let mut due: Vec<AlertId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        due.sort_unstable();
        for id in &due {
            self.remove(*id);
        }
        due
    }

    /// Earliest pending deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.deadlines.values().min().copied()
    }
}
