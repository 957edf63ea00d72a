//! # Session Gate
//!
//! Admits at most one open session per device.
//!
//! The gate is a one-slot lock built on a single compare-and-swap. It is
//! not a counter: a second `try_acquire` while a session is active fails
//! without touching anything, and `release` with the gate's own handle
//! always empties the slot. A foreign handle is handed back untouched.

use crate::{DeviceError, ReleaseError, SessionHandle};
use core_types::{DeviceId, SessionId};
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-occupancy gate for one device
#[derive(Debug)]
pub struct SessionGate {
    device: DeviceId,
    active: AtomicBool,
}

impl SessionGate {
    /// Creates an open (unoccupied) gate for `device`
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            active: AtomicBool::new(false),
        }
    }

    /// Device this gate guards
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Claims the slot
    ///
    /// Exactly one of any number of concurrent callers observes success.
    pub fn try_acquire(&self) -> Result<SessionHandle, DeviceError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DeviceError::Busy)?;
        Ok(SessionHandle::new(self.device, SessionId::new()))
    }

    /// Checks that `handle` was issued by this gate's device
    pub fn check(&self, handle: &SessionHandle) -> Result<(), DeviceError> {
        if handle.device() != self.device {
            return Err(DeviceError::InvalidHandle {
                expected: self.device,
                found: handle.device(),
            });
        }
        Ok(())
    }

    /// Empties the slot, consuming the handle
    ///
    /// A handle issued by another device is returned inside the error and
    /// this gate is left as it was.
    pub fn release(&self, handle: SessionHandle) -> Result<SessionId, ReleaseError> {
        if let Err(reason) = self.check(&handle) {
            return Err(ReleaseError { reason, handle });
        }
        self.active.store(false, Ordering::Release);
        Ok(handle.session())
    }

    /// Returns whether a session currently holds the slot
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
