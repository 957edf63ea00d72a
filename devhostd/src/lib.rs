//! # Device Host Runtime
//!
//! This crate provides the host runtime for the korbo and roulette devices.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: Drivers never print; the host streams their bytes
//! - **Deterministic mode is first-class**: `sim` mode runs every driver on
//!   the simulated platform, where termination is only recorded
//! - **No shell**: Just a handful of commands over registered nodes
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Chooses a platform (real host or simulation)
//! - Loads both driver modules through the device manager
//! - Executes `cat`, `play`, `list` and `reload` commands

pub mod commands;
pub mod platform;
pub mod runtime;

pub use commands::{HostCommand, HostCommandError, HostCommandParser};
pub use platform::{AbortHost, OsEntropy, ThreadDelay};
pub use runtime::{load_roulette_config, HostMode, HostRuntime, HostRuntimeConfig, HostRuntimeError};
