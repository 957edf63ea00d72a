//! # Entropy Source
//!
//! Hardware abstraction for random bytes.
//!
//! The driver side treats the source as an opaque provider of uniformly
//! distributed bytes. Whether those come from a hardware RNG, the host
//! operating system or a seeded generator is the implementation's business.

/// Uniform random-byte provider
///
/// # Implementation Notes
///
/// - Every byte of `dest` must be overwritten
/// - Bytes must be uniformly distributed over `0..=255`
/// - Must not fail; a source that cannot produce bytes should block
///   until it can
///
/// # Examples
///
/// ```
/// use hal::EntropySource;
///
/// fn coin_flip<E: EntropySource + ?Sized>(entropy: &E) -> bool {
///     entropy.next_u8() & 1 == 1
/// }
/// ```
pub trait EntropySource: Send + Sync {
    /// Fills `dest` with random bytes
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Returns a single random byte
    fn next_u8(&self) -> u8 {
        let mut byte = [0u8; 1];
        self.fill_bytes(&mut byte);
        byte[0]
    }
}
