//! # Kernel API
//!
//! This crate defines the interface between a character device driver and
//! the runtime that calls into it.
//!
//! ## Philosophy
//!
//! The runtime provides **mechanisms**, the driver provides **content**:
//! - Exclusive access (a one-slot gate, not a counter)
//! - Sequential delivery (one byte per read call)
//! - Explicit handles (no hidden "current file" state)
//!
//! ## Design Goals
//!
//! 1. **Testability**: Every device can be driven from a plain unit test
//! 2. **Explicitness**: Sessions are values; releasing one consumes it
//! 3. **Type safety**: A handle names the device that issued it
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A general I/O framework (no write, seek or ioctl)
//! - A multi-client broadcast system

pub mod cursor;
pub mod device;
pub mod error;
pub mod gate;
pub mod user;

pub use cursor::StreamCursor;
pub use device::{CharDevice, SessionHandle};
pub use error::{CopyFault, DeviceError, ReleaseError};
pub use gate::SessionGate;
pub use user::{SliceBuffer, UserBuffer};
