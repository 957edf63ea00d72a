//! # Simulated Kernel Platform
//!
//! Deterministic stand-ins for the host services a driver uses.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! - Randomness is seeded or scripted, never ambient
//! - Delays are recorded, not slept
//! - Host termination is recorded, and the call returns
//!
//! A driver running on this platform behaves exactly as it would on real
//! hardware, except that its fatal path leaves evidence instead of a
//! dead process.

pub mod delay;
pub mod entropy;
pub mod fault_injection;
pub mod host;
pub mod test_utils;

pub use delay::SimDelay;
pub use entropy::SimEntropy;
pub use fault_injection::{CopyFaultPlan, FaultyUserBuffer};
pub use host::SimHost;
pub use test_utils::SimPlatform;
