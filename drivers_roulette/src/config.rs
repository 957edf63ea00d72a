//! Roulette configuration

use serde::{Deserialize, Serialize};
use std::num::NonZeroU8;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Barrel must have at least one chamber")]
    NoChambers,

    #[error("Invalid roulette config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables of the roulette device
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    /// Chambers in the barrel; exactly one is loaded
    pub chambers: u8,
    /// Stall between release of an armed session and termination
    pub grace_period_ms: u64,
    /// Final message handed to the host
    pub panic_message: String,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            chambers: 6,
            grace_period_ms: 500,
            panic_message: "Thanks for playing!".to_string(),
        }
    }
}

impl RouletteConfig {
    /// Parses and validates a JSON document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.barrel().map(|_| ())
    }

    /// Chamber count, refused when zero
    pub fn barrel(&self) -> Result<NonZeroU8, ConfigError> {
        NonZeroU8::new(self.chambers).ok_or(ConfigError::NoChambers)
    }
}
