//! Device error types

use crate::SessionHandle;
use core_types::DeviceId;
use thiserror::Error;

/// Delivery of bytes to the caller failed
///
/// Non-fatal to the device: the stream offset is not advanced, so the
/// same byte is offered again on the next read.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Failed to copy {len} byte(s) to caller")]
pub struct CopyFault {
    /// Number of bytes that could not be delivered
    pub len: usize,
}

/// Errors that can occur when interacting with a character device
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceError {
    /// Another session is already active
    #[error("Device busy")]
    Busy,

    /// Copy to the caller failed
    #[error("Copy fault: {0}")]
    CopyFault(#[from] CopyFault),

    /// Handle was issued by a different device
    #[error("Invalid handle: issued by {found}, presented to {expected}")]
    InvalidHandle { expected: DeviceId, found: DeviceId },
}

/// A release presented to a device that did not issue the handle
///
/// The handle travels back with the error so the caller can still release
/// it on the device that owns it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Release refused: {reason}")]
pub struct ReleaseError {
    pub reason: DeviceError,
    pub handle: SessionHandle,
}

impl ReleaseError {
    pub fn into_handle(self) -> SessionHandle {
        self.handle
    }
}

impl From<ReleaseError> for DeviceError {
    fn from(err: ReleaseError) -> Self {
        err.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_fault_converts() {
        let err: DeviceError = CopyFault { len: 1 }.into();
        assert_eq!(err, DeviceError::CopyFault(CopyFault { len: 1 }));
        assert_eq!(
            err.to_string(),
            "Copy fault: Failed to copy 1 byte(s) to caller"
        );
    }

    #[test]
    fn test_release_error_keeps_handle() {
        let owner = DeviceId::new();
        let handle = SessionHandle::new(owner, core_types::SessionId::new());
        let session = handle.session();
        let err = ReleaseError {
            reason: DeviceError::InvalidHandle {
                expected: DeviceId::new(),
                found: owner,
            },
            handle,
        };

        assert!(err.to_string().starts_with("Release refused: Invalid handle"));
        let handle = err.into_handle();
        assert_eq!(handle.device(), owner);
        assert_eq!(handle.session(), session);
    }

    #[test]
    fn test_busy_message() {
        assert_eq!(DeviceError::Busy.to_string(), "Device busy");
    }
}
