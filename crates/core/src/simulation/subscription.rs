//! Snapshot subscriptions
//!
//! Every subscriber gets its own bounded channel. Publishing never blocks: a
//! subscriber whose buffer is full misses that snapshot (counted), and one
//! whose receiver was dropped is pruned on the next publish.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::simulation::state::SimulationSnapshot;

/// Receiving end of a snapshot subscription
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Arc<SimulationSnapshot>>,
}

impl Subscription {
    /// Next snapshot if one is buffered
    #[must_use]
    pub fn try_recv(&self) -> Option<Arc<SimulationSnapshot>> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next snapshot
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Arc<SimulationSnapshot>> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drain the buffer and keep only the newest snapshot
    #[must_use]
    pub fn latest(&self) -> Option<Arc<SimulationSnapshot>> {
        self.receiver.try_iter().last()
    }

    /// Number of buffered snapshots
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// The underlying channel, for use with `crossbeam_channel::select!`
    #[must_use]
    pub fn receiver(&self) -> &Receiver<Arc<SimulationSnapshot>> {
        &self.receiver
    }
}

/// Result of one publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub delivered: usize,
    pub dropped: usize,
    pub pruned: usize,
}

/// Sending side: every live subscriber
#[derive(Debug, Default)]
pub struct SubscriberSet {
    senders: Vec<Sender<Arc<SimulationSnapshot>>>,
    dropped_total: u64,
}

impl SubscriberSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber buffering up to `capacity` snapshots (minimum 1)
    pub fn subscribe(&mut self, capacity: usize) -> Subscription {
        let (sender, receiver) = bounded(capacity.max(1));
        self.senders.push(sender);
        debug!(subscribers = self.senders.len(), capacity, "subscriber added");
        Subscription { receiver }
    }

    /// Live subscribers as of the last publish
    #[must_use]
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Snapshots lost to full buffers since creation
    #[must_use]
    pub fn dropped_total(&self) -> u64 {
        self.dropped_total
    }

    /// Offer `snapshot` to every subscriber without blocking
    pub fn publish(&mut self, snapshot: &Arc<SimulationSnapshot>) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        self.senders.retain(|sender| match sender.try_send(Arc::clone(snapshot)) {
            Ok(()) => {
                outcome.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                outcome.dropped += 1;
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                outcome.pruned += 1;
                false
            }
        });

        self.dropped_total += outcome.dropped as u64;
        if outcome.dropped > 0 {
            warn!(
                dropped = outcome.dropped,
                total = self.dropped_total,
                "subscriber buffers full, snapshot dropped"
            );
        }
        if outcome.pruned > 0 {
            debug!(
                pruned = outcome.pruned,
                remaining = self.senders.len(),
                "disconnected subscribers pruned"
            );
        }
        outcome
    }
}
