//! # Simulated Entropy
//!
//! Seeded or scripted random bytes.
//!
//! Seeded sources run SplitMix64, which is statistically solid for test
//! purposes and accepts any seed, including zero. Scripted sources replay
//! a fixed byte sequence and wrap around when it runs out.

use hal::EntropySource;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
enum Source {
    Seeded { state: u64 },
    Scripted { bytes: Vec<u8>, next: usize },
}

impl Source {
    fn next_byte(&mut self) -> u8 {
        match self {
            Source::Seeded { state } => {
                *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
                let mut z = *state;
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
                z ^= z >> 31;
                (z >> 56) as u8
            }
            Source::Scripted { bytes, next } => {
                let byte = bytes[*next % bytes.len()];
                *next += 1;
                byte
            }
        }
    }
}

/// Deterministic entropy source
///
/// # Examples
///
/// ```
/// use sim_kernel::SimEntropy;
/// use hal::EntropySource;
///
/// let entropy = SimEntropy::scripted(vec![3, 0]);
/// assert_eq!(entropy.next_u8(), 3);
/// assert_eq!(entropy.next_u8(), 0);
/// assert_eq!(entropy.next_u8(), 3);
/// ```
#[derive(Debug)]
pub struct SimEntropy {
    source: Mutex<Source>,
    drawn: Mutex<usize>,
}

impl SimEntropy {
    /// Pseudo-random bytes derived from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::from_source(Source::Seeded { state: seed })
    }

    /// Replays `bytes` in order, cycling
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty.
    pub fn scripted(bytes: Vec<u8>) -> Self {
        assert!(!bytes.is_empty(), "scripted entropy needs at least one byte");
        Self::from_source(Source::Scripted { bytes, next: 0 })
    }

    fn from_source(source: Source) -> Self {
        Self {
            source: Mutex::new(source),
            drawn: Mutex::new(0),
        }
    }

    /// Total bytes handed out so far
    pub fn bytes_drawn(&self) -> usize {
        *self.drawn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntropySource for SimEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        for byte in dest.iter_mut() {
            *byte = source.next_byte();
        }
        *self.drawn.lock().unwrap_or_else(PoisonError::into_inner) += dest.len();
    }
}
