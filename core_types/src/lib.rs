//! # Core Types
//!
//! Fundamental identifiers shared by the device crates.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: a session handle names the device it was
//!   issued by, so handles cannot be confused across devices.
//! - **Type safety first**: device and session identifiers are distinct types.
//!
//! ## Key Types
//!
//! - [`DeviceId`]: Unique identifier for a device instance
//! - [`SessionId`]: Unique identifier for one open-to-release lifetime

pub mod ids;

pub use ids::{DeviceId, SessionId};
