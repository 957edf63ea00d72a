//! Real host platform
//!
//! Implementations of the HAL traits for a hosted process. The entropy
//! source draws on the operating system through v4 UUID generation; the
//! host control aborts the process.

use hal::{DelayHal, EntropySource, HostControl};
use std::io::Write;
use std::time::Duration;
use uuid::Uuid;

/// Byte positions of a v4 UUID that carry no version or variant bits
const RANDOM_UUID_BYTES: [usize; 14] = [0, 1, 2, 3, 4, 5, 7, 9, 10, 11, 12, 13, 14, 15];

/// Operating-system randomness
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(RANDOM_UUID_BYTES.len()) {
            let uuid = Uuid::new_v4();
            let bytes = uuid.as_bytes();
            for (slot, index) in chunk.iter_mut().zip(RANDOM_UUID_BYTES) {
                *slot = bytes[index];
            }
        }
    }
}

/// Aborts the process; never returns
pub struct AbortHost;

impl HostControl for AbortHost {
    fn terminate_host(&self, message: &str) {
        let _ = std::io::stdout().flush();
        let _ = writeln!(std::io::stderr(), "host panic: {}", message);
        std::process::abort();
    }
}

/// Sleeps the calling thread
pub struct ThreadDelay;

impl DelayHal for ThreadDelay {
    fn delay_ms(&self, millis: u64) {
        std::thread::sleep(Duration::from_millis(millis));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_os_entropy_fills_odd_lengths() {
        let mut a = [0u8; 31];
        let mut b = [0u8; 31];
        OsEntropy.fill_bytes(&mut a);
        OsEntropy.fill_bytes(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_os_entropy_avoids_version_nibble() {
        // Byte 6 of a v4 UUID always starts with 0x4; a leak would make
        // every 7th byte fall in 0x40..=0x4f
        let mut buf = [0u8; 14 * 64];
        OsEntropy.fill_bytes(&mut buf);
        let stuck = buf
            .iter()
            .skip(6)
            .step_by(14)
            .all(|b| (0x40..=0x4f).contains(b));
        assert!(!stuck);
    }

    #[test]
    fn test_thread_delay_sleeps() {
        let start = Instant::now();
        ThreadDelay.delay_ms(5);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
