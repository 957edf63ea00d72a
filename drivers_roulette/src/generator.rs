//! # Content Generator
//!
//! Decides what a roulette session reads.
//!
//! [`Content::generate`] is a pure function of the warning flag and the
//! session's chamber. The device calls it at the top of *every* read call,
//! i.e. once per byte delivered, and relies on it returning the same
//! content for as long as those two inputs are unchanged. Do not cache it
//! per open: the warning flag only flips at release, so per-read
//! regeneration and per-open generation are indistinguishable to callers,
//! and the per-read form keeps the read path free of session bookkeeping.

use hal::EntropySource;
use std::num::NonZeroU8;

/// Shown to the first session after the module loads
pub const WARNING_TEXT: &str = concat!(
    "WARNING, PLEASE READ!\n",
    "This module CAN AND WILL TRIGGER A KERNEL PANIC, and I HAVE NEVER SEEN IT SYNC.\n",
    "I AM NOT RESPONSIBLE IF YOUR DATA ENDS UP SCREWED BEYOND RECOVERY.\n",
    "IF YOU DON'T FEEL SAFE ANYMORE, THEN UNINSTALL THIS MODULE.\n",
    "THIS IS YOUR ONLY WARNING.\n",
    "USE AT YOUR OWN RISK.\n",
    "Otherwise, if you still want to play for some reason,\n",
    "then read this device again to immediately start the game.\n",
    "Also, this should hopefully be obvious, but please don't do this in real life.\n",
);

pub const BLANK_MESSAGE: &[u8] = b"Blank.\n";
pub const BANG_MESSAGE: &[u8] = b"BANG!\n";

/// Barrel position drawn at open; position 0 holds the bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chamber(u8);

impl Chamber {
    pub const LOADED: Chamber = Chamber(0);

    /// Draws a position uniformly from `0..chambers`
    ///
    /// Bytes at or above the largest multiple of `chambers` are redrawn, so
    /// every position is equally likely.
    pub fn spin(entropy: &dyn EntropySource, chambers: NonZeroU8) -> Chamber {
        let chambers = u16::from(chambers.get());
        let limit = 256 - 256 % chambers;
        loop {
            let byte = u16::from(entropy.next_u8());
            if byte < limit {
                return Chamber((byte % chambers) as u8);
            }
        }
    }

    pub fn from_position(position: u8) -> Chamber {
        Chamber(position)
    }

    pub fn position(&self) -> u8 {
        self.0
    }

    pub fn is_loaded(&self) -> bool {
        self.0 == 0
    }
}

/// Per-session result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Warning not yet retired, or nothing read yet
    Pending,
    Blank,
    Hit,
}

/// What the buffer holds for one read call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Warning,
    Blank,
    Bang,
}

impl Content {
    pub fn generate(show_warning: bool, chamber: Chamber) -> Content {
        if show_warning {
            Content::Warning
        } else if chamber.is_loaded() {
            Content::Bang
        } else {
            Content::Blank
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        match self {
            Content::Warning => WARNING_TEXT.as_bytes(),
            Content::Blank => BLANK_MESSAGE,
            Content::Bang => BANG_MESSAGE,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Content::Warning => Outcome::Pending,
            Content::Blank => Outcome::Blank,
            Content::Bang => Outcome::Hit,
        }
    }
}
