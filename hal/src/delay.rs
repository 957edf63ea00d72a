//! Delay abstraction

/// Fixed-length stall
///
/// Unlike a timer, a delay blocks the caller. Drivers use it only on
/// paths where stalling is the point, such as giving a reader time to
/// observe output before the host goes down.
pub trait DelayHal: Send + Sync {
    /// Blocks the caller for at least `millis` milliseconds
    fn delay_ms(&self, millis: u64);
}
