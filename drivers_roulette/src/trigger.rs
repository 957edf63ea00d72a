//! # Deferred Failure Trigger
//!
//! Arms when a session reads `"BANG!\n"` and fires when that session is
//! released: stall for the grace period so the reader can see the output,
//! then terminate the host. There is no disarm; the only way out is to
//! never arm.

use hal::{DelayHal, HostControl};
use services_logger::{LogEntry, LogLevel, Logger};

/// Pending fatal action of the current session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeferredFailure {
    armed: bool,
}

impl DeferredFailure {
    pub fn new() -> Self {
        Self { armed: false }
    }

    /// Arms the failure; returns `true` if it was not armed before
    pub fn arm(&mut self) -> bool {
        !std::mem::replace(&mut self.armed, true)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consumes the armed state, leaving the failure disarmed
    ///
    /// Returns `true` at most once per arming, which is what makes firing
    /// happen exactly once.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    /// Stalls for `grace_period_ms`, then terminates the host
    ///
    /// Production hosts do not return from this call.
    pub fn fire(
        grace_period_ms: u64,
        message: &str,
        delay: &dyn DelayHal,
        host: &dyn HostControl,
        logger: &Logger,
    ) {
        logger.log(
            LogEntry::new(LogLevel::Error, "deferred failure firing")
                .with_field("grace_ms", grace_period_ms),
        );
        delay.delay_ms(grace_period_ms);
        host.terminate_host(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services_logger::MemoryLog;
    use sim_kernel::{SimDelay, SimHost};

    #[test]
    fn test_arm_is_idempotent() {
        let mut failure = DeferredFailure::new();
        assert!(failure.arm());
        assert!(!failure.arm());
        assert!(failure.is_armed());
    }

    #[test]
    fn test_take_fires_once() {
        let mut failure = DeferredFailure::new();
        failure.arm();
        assert!(failure.take());
        assert!(!failure.take());
        assert!(!failure.is_armed());
    }

    #[test]
    fn test_fire_delays_then_terminates() {
        let delay = SimDelay::new();
        let host = SimHost::new();
        let memory = MemoryLog::new();

        DeferredFailure::fire(500, "Thanks for playing!", &delay, &host, &memory.logger());

        assert_eq!(delay.delays(), vec![500]);
        assert_eq!(host.terminations(), vec!["Thanks for playing!".to_string()]);
        assert!(memory.contains("deferred failure firing"));
    }
}
