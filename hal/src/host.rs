//! # Host Control
//!
//! The one irreversible thing a driver may ask of its host: stop.
//!
//! In a kernel this is a panic. In a hosted process it is an abort. In a
//! test harness it is a recorder that notes the request and returns, so the
//! test process survives to assert on it.

/// Host termination primitive
///
/// # Implementation Notes
///
/// - Production implementations must not return
/// - Test doubles may return; callers treat a returning call as
///   "the host would have terminated here"
/// - `message` is the final word logged by the host before it goes down
pub trait HostControl: Send + Sync {
    /// Terminates the host with a fixed message
    fn terminate_host(&self, message: &str);
}
