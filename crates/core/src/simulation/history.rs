//! Bounded chart histories
//!
//! Three parallel FIFO sequences (depth, umbilical pressure, timestamp) that
//! always have the same length. Once at capacity, each append evicts the
//! oldest entry of all three.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core_types::time::Timestamp;
use crate::core_types::units::{Bar, Meters};

/// Chart samples appended once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    depth: VecDeque<Meters>,
    umbilical_pressure: VecDeque<Bar>,
    timestamps: VecDeque<Timestamp>,
}

impl History {
    /// Empty history holding at most `capacity` samples (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            depth: VecDeque::with_capacity(capacity),
            umbilical_pressure: VecDeque::with_capacity(capacity),
            timestamps: VecDeque::with_capacity(capacity),
        }
    }

    /// Append one sample, evicting the oldest when full
    pub fn push(&mut self, depth: Meters, umbilical_pressure: Bar, at: Timestamp) {
        if self.timestamps.len() == self.capacity {
            self.depth.pop_front();
            self.umbilical_pressure.pop_front();
            self.timestamps.pop_front();
        }
        self.depth.push_back(depth);
        self.umbilical_pressure.push_back(umbilical_pressure);
        self.timestamps.push_back(at);
    }

    pub fn clear(&mut self) {
        self.depth.clear();
        self.umbilical_pressure.clear();
        self.timestamps.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Depth samples, oldest first
    pub fn depth(&self) -> impl Iterator<Item = Meters> + '_ {
        self.depth.iter().copied()
    }

    /// Umbilical pressure samples, oldest first
    pub fn umbilical_pressure(&self) -> impl Iterator<Item = Bar> + '_ {
        self.umbilical_pressure.iter().copied()
    }

    /// Sample timestamps, oldest first
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.timestamps.iter().copied()
    }
}
