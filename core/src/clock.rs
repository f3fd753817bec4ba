//! Engine clock, the only source of "now" for sent timestamps.
//!
//! RULE: Nothing in the engine may call `Utc::now()` directly.
//! Tests inject a FixedClock so sentAt values are reproducible.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A manually advanced clock for tests and replay tooling.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Cell<Timestamp>,
}

impl FixedClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }

    /// Move the clock forward. Returns the new instant.
    pub fn advance(&self, by: Duration) -> Timestamp {
        let next = self.current.get() + by;
        self.current.set(next);
        next
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}
