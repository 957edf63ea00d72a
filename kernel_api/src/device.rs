//! Character device interface

use crate::{DeviceError, ReleaseError, UserBuffer};
use core_types::{DeviceId, SessionId};

/// Proof of an open session
///
/// Issued by a successful open and consumed by release. It is
/// deliberately neither `Clone` nor `Copy`: a session is released at
/// most once.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionHandle {
    device: DeviceId,
    session: SessionId,
}

impl SessionHandle {
    pub(crate) fn new(device: DeviceId, session: SessionId) -> Self {
        Self { device, session }
    }

    /// Device that issued this handle
    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn session(&self) -> SessionId {
        self.session
    }
}

/// A single-client character stream device
///
/// # Contract
///
/// - `open` fails with [`DeviceError::Busy`] while another session is active
/// - `read` delivers at most one byte per call; `Ok(0)` means end-of-stream
///   or a zero-length request, never an error
/// - `release` with a handle the device issued always frees the device; a
///   device may terminate the host instead of returning
/// - `release` with a handle from another device changes nothing and hands
///   the handle back in a [`ReleaseError`]
pub trait CharDevice: Send + Sync {
    /// Identifier of this device instance
    fn id(&self) -> DeviceId;

    /// Opens an exclusive session
    fn open(&self) -> Result<SessionHandle, DeviceError>;

    /// Reads from the session's stream into `dest`
    fn read(
        &self,
        handle: &SessionHandle,
        dest: &mut dyn UserBuffer,
        max_len: usize,
    ) -> Result<usize, DeviceError>;

    /// Ends the session
    fn release(&self, handle: SessionHandle) -> Result<(), ReleaseError>;

    /// Reads until end-of-stream, `max_len` bytes requested per call
    fn read_to_end(&self, handle: &SessionHandle, max_len: usize) -> Result<Vec<u8>, DeviceError> {
        let mut out = Vec::new();
        while self.read(handle, &mut out, max_len)? > 0 {}
        Ok(out)
    }
}
