//! Core types and utilities

pub mod time;
pub mod units;

pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use units::*;
