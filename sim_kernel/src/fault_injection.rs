//! Deterministic copy-fault injection for testing
//!
//! Drivers report a failed delivery to the caller as a copy fault. This
//! module provides a caller buffer that fails on demand, so tests can
//! check that a fault leaves the device's stream where it was.
//!
//! ## Example
//!
//! ```
//! use sim_kernel::fault_injection::{CopyFaultPlan, FaultyUserBuffer};
//! use kernel_api::UserBuffer;
//!
//! let mut buf = FaultyUserBuffer::new(CopyFaultPlan::new().fail_copy(1));
//! assert!(buf.copy_to_user(b"K").is_ok());
//! assert!(buf.copy_to_user(b"o").is_err());
//! assert!(buf.copy_to_user(b"o").is_ok());
//! assert_eq!(buf.received(), b"Ko");
//! ```

use kernel_api::{CopyFault, UserBuffer};
use std::collections::BTreeSet;

/// Which copies to fail
///
/// Copies are numbered from zero in the order the buffer sees them,
/// failed ones included.
#[derive(Debug, Clone, Default)]
pub struct CopyFaultPlan {
    fail_on: BTreeSet<usize>,
    fail_from: Option<usize>,
}

impl CopyFaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the copy with index `call`
    pub fn fail_copy(mut self, call: usize) -> Self {
        self.fail_on.insert(call);
        self
    }

    /// Fails every copy from index `call` onward
    pub fn fail_from(mut self, call: usize) -> Self {
        self.fail_from = Some(call);
        self
    }

    fn should_fail(&self, call: usize) -> bool {
        self.fail_on.contains(&call) || self.fail_from.is_some_and(|from| call >= from)
    }
}

/// Caller buffer that faults according to a [`CopyFaultPlan`]
#[derive(Debug)]
pub struct FaultyUserBuffer {
    plan: CopyFaultPlan,
    calls: usize,
    faults: usize,
    received: Vec<u8>,
}

impl FaultyUserBuffer {
    pub fn new(plan: CopyFaultPlan) -> Self {
        Self {
            plan,
            calls: 0,
            faults: 0,
            received: Vec::new(),
        }
    }

    /// Bytes accepted so far
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// Number of copies that were failed
    pub fn faults(&self) -> usize {
        self.faults
    }
}

impl UserBuffer for FaultyUserBuffer {
    fn copy_to_user(&mut self, bytes: &[u8]) -> Result<(), CopyFault> {
        let call = self.calls;
        self.calls += 1;
        if self.plan.should_fail(call) {
            self.faults += 1;
            return Err(CopyFault { len: bytes.len() });
        }
        self.received.extend_from_slice(bytes);
        Ok(())
    }
}
