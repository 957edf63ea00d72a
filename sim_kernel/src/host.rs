//! Simulated host control

use hal::HostControl;
use std::sync::{Mutex, PoisonError};

/// Records termination requests instead of acting on them
#[derive(Debug, Default)]
pub struct SimHost {
    terminations: Mutex<Vec<String>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of every termination request, oldest first
    pub fn terminations(&self) -> Vec<String> {
        self.terminations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns whether the host would have gone down by now
    pub fn terminated(&self) -> bool {
        !self
            .terminations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl HostControl for SimHost {
    fn terminate_host(&self, message: &str) {
        self.terminations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
