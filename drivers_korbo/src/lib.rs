//! # Korbo Device
//!
//! A device that only ever returns the string `"Korbo\n"`.
//!
//! This is the smallest instantiation of the session gate and stream
//! cursor: no generator, no side effects, one immutable buffer.

use core_types::DeviceId;
use kernel_api::{
    CharDevice, DeviceError, ReleaseError, SessionGate, SessionHandle, StreamCursor, UserBuffer,
};
use services_device_manager::{DeviceDescriptor, DriverModule};
use services_logger::{LogEntry, LogLevel, Logger};
use std::sync::{Arc, Mutex, PoisonError};

/// Bytes served by every session
pub const KORBO_MESSAGE: &[u8] = b"Korbo\n";

pub struct KorboDevice {
    gate: SessionGate,
    cursor: Mutex<StreamCursor>,
    logger: Logger,
}

impl KorboDevice {
    pub fn new(logger: Logger) -> Self {
        let id = DeviceId::new();
        Self {
            gate: SessionGate::new(id),
            cursor: Mutex::new(StreamCursor::new()),
            logger: logger.for_device(id),
        }
    }

    /// Returns whether a session is currently open
    pub fn is_open(&self) -> bool {
        self.gate.is_active()
    }
}

impl CharDevice for KorboDevice {
    fn id(&self) -> DeviceId {
        self.gate.device()
    }

    fn open(&self) -> Result<SessionHandle, DeviceError> {
        let handle = self.gate.try_acquire().inspect_err(|_| {
            self.logger.warn("open refused: device busy");
        })?;
        self.cursor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
        self.logger
            .log(LogEntry::new(LogLevel::Debug, "session opened").with_field("session", handle.session()));
        Ok(handle)
    }

    fn read(
        &self,
        handle: &SessionHandle,
        dest: &mut dyn UserBuffer,
        max_len: usize,
    ) -> Result<usize, DeviceError> {
        self.gate.check(handle)?;
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        cursor.read_byte(KORBO_MESSAGE, dest, max_len).inspect_err(|err| {
            self.logger.warn(format!("read failed: {}", err));
        })
    }

    fn release(&self, handle: SessionHandle) -> Result<(), ReleaseError> {
        let session = self.gate.release(handle).inspect_err(|err| {
            self.logger.warn(err.to_string());
        })?;
        self.logger
            .log(LogEntry::new(LogLevel::Debug, "session released").with_field("session", session));
        Ok(())
    }
}

/// Loadable module wrapping a [`KorboDevice`]
pub struct KorboModule {
    device: Arc<KorboDevice>,
    logger: Logger,
}

impl KorboModule {
    pub fn new(logger: Logger) -> Self {
        let device = Arc::new(KorboDevice::new(logger.clone()));
        let logger = logger.for_device(device.id());
        Self { device, logger }
    }

    /// Concrete device, for callers that need more than [`CharDevice`]
    pub fn korbo(&self) -> Arc<KorboDevice> {
        Arc::clone(&self.device)
    }
}

impl DriverModule for KorboModule {
    fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::new("korbo", "korbodev", "korboclass")
    }

    fn device(&self) -> Arc<dyn CharDevice> {
        self.device.clone()
    }

    fn module_exit(&self) {
        self.logger.info("cya --Korbo");
    }
}
