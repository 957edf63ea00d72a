//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the host services a character device driver leans on
//! but does not implement itself.
//!
//! ## Philosophy
//!
//! **The host must be fully abstracted and swappable.**
//!
//! Drivers never reach for ambient randomness, wall clocks or process
//! control. Everything they need from the host arrives through a trait,
//! so a simulated host can stand in during tests.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: All host operations go through traits
//! 2. **Opaque**: Drivers make no assumption about how the host does its job
//! 3. **Testable**: Every trait can be mocked, including the fatal one

pub mod delay;
pub mod entropy;
pub mod host;

pub use delay::DelayHal;
pub use entropy::EntropySource;
pub use host::HostControl;
