//! # Simulated Delay
//!
//! Records requested stalls without sleeping, so tests that exercise a
//! grace period finish instantly.

use hal::DelayHal;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct SimDelay {
    delays: Mutex<Vec<u64>>,
}

impl SimDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested delay in milliseconds, oldest first
    pub fn delays(&self) -> Vec<u64> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum of all requested delays in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.delays().iter().sum()
    }
}

impl DelayHal for SimDelay {
    fn delay_ms(&self, millis: u64) {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(millis);
    }
}
