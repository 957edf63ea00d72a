//! # Host Commands
//!
//! Provides a minimal command surface over registered device nodes.
//!
//! ## Command Set
//!
//! - `cat <device>` - One open, read-to-end, release cycle
//! - `play [rounds]` - Repeated roulette cycles (default 1)
//! - `list` - List registered nodes
//! - `reload <device>` - Unload and reload a driver module
//!
//! ## Philosophy
//!
//! - No pipes, no scripting, no shell features
//! - Commands only orchestrate devices
//! - Devices do the actual work

use thiserror::Error;

/// Host command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostCommandError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid round count: {0}")]
    InvalidRounds(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Host commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Drain a device once
    Cat { device: String },

    /// Play roulette for a number of rounds
    Play { rounds: usize },

    /// List registered nodes
    List,

    /// Reload a driver module
    Reload { device: String },
}

/// Host command parser
pub struct HostCommandParser;

impl HostCommandParser {
    /// Parses a command string
    pub fn parse(input: &str) -> Result<HostCommand, HostCommandError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        Self::parse_words(&parts)
    }

    /// Parses pre-split words, as handed over by the command line
    pub fn parse_words<S: AsRef<str>>(words: &[S]) -> Result<HostCommand, HostCommandError> {
        let Some(first) = words.first() else {
            return Err(HostCommandError::InvalidCommand(
                "Empty command".to_string(),
            ));
        };
        let args: Vec<&str> = words[1..].iter().map(|w| w.as_ref()).collect();
        let cmd = first.as_ref().to_lowercase();

        match cmd.as_str() {
            "cat" | "read" => Ok(HostCommand::Cat {
                device: Self::device_arg(&args)?,
            }),
            "play" => Self::parse_play(&args),
            "list" | "ls" => Ok(HostCommand::List),
            "reload" => Ok(HostCommand::Reload {
                device: Self::device_arg(&args)?,
            }),
            _ => Err(HostCommandError::UnknownCommand(cmd)),
        }
    }

    fn device_arg(args: &[&str]) -> Result<String, HostCommandError> {
        let name = args
            .first()
            .ok_or_else(|| HostCommandError::MissingArgument("device name".to_string()))?;
        Ok(name.trim_start_matches("/dev/").to_string())
    }

    fn parse_play(args: &[&str]) -> Result<HostCommand, HostCommandError> {
        let rounds = match args.first() {
            None => 1,
            Some(raw) => raw
                .parse()
                .map_err(|_| HostCommandError::InvalidRounds(raw.to_string()))?,
        };
        Ok(HostCommand::Play { rounds })
    }
}
