//! Session clock
//!
//! Tracks when the session started and how long it has spent paused, so the
//! active (simulated) time excludes every pause and stays frozen while paused.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core_types::time::Timestamp;

/// Start instant plus pause bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    start: Option<Timestamp>,
    paused_total: Duration,
    paused_since: Option<Timestamp>,
}

impl SessionClock {
    /// Instant of the first start since the last reset
    #[must_use]
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start
    }

    /// Whether a pause is currently open
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Start, or resume after a pause
    ///
    /// The start instant is only recorded the first time; resuming closes the
    /// open pause and adds its length to the paused total.
    pub fn start(&mut self, now: Timestamp) {
        match (self.start, self.paused_since.take()) {
            (None, _) => self.start = Some(now),
            (Some(_), Some(since)) => self.paused_total += now.saturating_since(since),
            (Some(_), None) => {}
        }
    }

    /// Open a pause; no-op before the first start or while already paused
    pub fn pause(&mut self, now: Timestamp) {
        if self.start.is_some() && self.paused_since.is_none() {
            self.paused_since = Some(now);
        }
    }

    /// Active session time at `now`
    ///
    /// Zero before the first start; frozen at the pause instant while paused.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        let Some(start) = self.start else {
            return Duration::ZERO;
        };
        let end = self.paused_since.unwrap_or(now);
        end.saturating_since(start).saturating_sub(self.paused_total)
    }

    /// Forget the session entirely
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn test_zero_before_start() {
        let clock = SessionClock::default();
        assert_eq!(clock.elapsed(t(5_000)), Duration::ZERO);
    }

    #[test]
    fn test_pause_freezes_and_resume_excludes_pause() {
        let mut clock = SessionClock::default();
        clock.start(t(1_000));
        clock.pause(t(6_000));
        assert_eq!(clock.elapsed(t(6_000)), Duration::from_secs(5));
        assert_eq!(clock.elapsed(t(16_000)), Duration::from_secs(5));

        clock.start(t(16_000));
        assert_eq!(clock.start_time(), Some(t(1_000)));
        assert_eq!(clock.elapsed(t(17_000)), Duration::from_secs(6));
    }

    #[test]
    fn test_double_pause_keeps_first_instant() {
        let mut clock = SessionClock::default();
        clock.start(t(0));
        clock.pause(t(2_000));
        clock.pause(t(4_000));
        clock.start(t(5_000));
        assert_eq!(clock.elapsed(t(5_000)), Duration::from_secs(2));
    }

    #[test]
    fn test_clear() {
        let mut clock = SessionClock::default();
        clock.start(t(10));
        clock.clear();
        assert_eq!(clock.start_time(), None);
        assert!(!clock.is_paused());
    }
}
