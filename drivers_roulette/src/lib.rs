//! # Roulette Device
//!
//! A character device with a one-in-six chance of taking the host down.
//!
//! ## Protocol
//!
//! 1. The first session after the module loads reads a fixed warning.
//!    Releasing that session retires the warning.
//! 2. Every later open spins the barrel. Reading yields `"Blank.\n"` or,
//!    on the loaded chamber, `"BANG!\n"`, which arms a deferred failure.
//! 3. Releasing an armed session waits out a short grace period and then
//!    asks the host to terminate.
//!
//! All state lives in the [`RouletteDevice`] value; there are no globals.

pub mod config;
pub mod device;
pub mod generator;
pub mod trigger;

pub use config::{ConfigError, RouletteConfig};
pub use device::{RouletteDevice, RouletteModule, RoulettePlatform};
pub use generator::{Chamber, Content, Outcome, BANG_MESSAGE, BLANK_MESSAGE, WARNING_TEXT};
pub use trigger::DeferredFailure;
