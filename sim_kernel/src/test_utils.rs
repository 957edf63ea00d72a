//! Test utilities for device testing
//!
//! This module provides helper functions for driving devices through
//! whole sessions on the simulated platform.

use crate::{SimDelay, SimEntropy, SimHost};
use kernel_api::{CharDevice, DeviceError};
use std::sync::Arc;

/// Shared handles to one simulated platform
///
/// Clones share state, so a test can hand one copy to a driver and keep
/// another to inspect what the driver did.
#[derive(Debug, Clone)]
pub struct SimPlatform {
    pub entropy: Arc<SimEntropy>,
    pub host: Arc<SimHost>,
    pub delay: Arc<SimDelay>,
}

impl SimPlatform {
    pub fn seeded(seed: u64) -> Self {
        Self::with_entropy(SimEntropy::seeded(seed))
    }

    pub fn scripted(bytes: Vec<u8>) -> Self {
        Self::with_entropy(SimEntropy::scripted(bytes))
    }

    fn with_entropy(entropy: SimEntropy) -> Self {
        Self {
            entropy: Arc::new(entropy),
            host: Arc::new(SimHost::new()),
            delay: Arc::new(SimDelay::new()),
        }
    }
}

/// Runs one open, read-to-end, release cycle
///
/// Each read call asks for `max_len` bytes.
pub fn run_session(device: &dyn CharDevice, max_len: usize) -> Result<Vec<u8>, DeviceError> {
    let handle = device.open()?;
    let result = device.read_to_end(&handle, max_len);
    device.release(handle)?;
    result
}

/// Counts how often each distinct output occurs over `sessions` cycles
pub fn tally_sessions(
    device: &dyn CharDevice,
    sessions: usize,
) -> Result<Vec<(Vec<u8>, usize)>, DeviceError> {
    let mut tally: Vec<(Vec<u8>, usize)> = Vec::new();
    for _ in 0..sessions {
        let out = run_session(device, 1)?;
        match tally.iter_mut().find(|(seen, _)| *seen == out) {
            Some((_, count)) => *count += 1,
            None => tally.push((out, 1)),
        }
    }
    Ok(tally)
}
