//! Roulette device state machine

use crate::config::{ConfigError, RouletteConfig};
use crate::generator::{Chamber, Content, Outcome};
use crate::trigger::DeferredFailure;
use core_types::DeviceId;
use hal::{DelayHal, EntropySource, HostControl};
use kernel_api::{
    CharDevice, DeviceError, ReleaseError, SessionGate, SessionHandle, StreamCursor, UserBuffer,
};
use services_device_manager::{DeviceDescriptor, DriverModule};
use services_logger::{LogEntry, LogLevel, Logger};
use std::num::NonZeroU8;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Host services the roulette device depends on
#[derive(Clone)]
pub struct RoulettePlatform {
    pub entropy: Arc<dyn EntropySource>,
    pub host: Arc<dyn HostControl>,
    pub delay: Arc<dyn DelayHal>,
}

/// Everything that changes between opens, reads and releases
#[derive(Debug)]
struct RouletteState {
    /// Next sessions read the warning; survives across sessions
    show_warning: bool,
    /// The warning has been generated at least once since it was raised
    warning_over: bool,
    chamber: Chamber,
    outcome: Outcome,
    cursor: StreamCursor,
    failure: DeferredFailure,
}

/// The roulette character device
///
/// Only the session gate is contended. The remaining state sits behind a
/// mutex that is, in practice, only ever taken by the session holder.
pub struct RouletteDevice {
    gate: SessionGate,
    state: Mutex<RouletteState>,
    platform: RoulettePlatform,
    chambers: NonZeroU8,
    config: RouletteConfig,
    logger: Logger,
}

impl RouletteDevice {
    /// Creates a device with the warning raised
    pub fn new(
        config: RouletteConfig,
        platform: RoulettePlatform,
        logger: Logger,
    ) -> Result<Self, ConfigError> {
        let chambers = config.barrel()?;
        let id = DeviceId::new();
        Ok(Self {
            gate: SessionGate::new(id),
            state: Mutex::new(RouletteState {
                show_warning: true,
                warning_over: false,
                chamber: Chamber::LOADED,
                outcome: Outcome::Pending,
                cursor: StreamCursor::new(),
                failure: DeferredFailure::new(),
            }),
            platform,
            chambers,
            config,
            logger: logger.for_device(id),
        })
    }

    /// Raises the warning again, as a fresh module load does
    pub fn reset_warning(&self) {
        let mut state = self.state();
        state.show_warning = true;
        state.warning_over = false;
    }

    pub fn config(&self) -> &RouletteConfig {
        &self.config
    }

    /// Returns whether the next session will read the warning
    pub fn show_warning(&self) -> bool {
        self.state().show_warning
    }

    pub fn is_armed(&self) -> bool {
        self.state().failure.is_armed()
    }

    /// Outcome of the current (or most recent) session
    pub fn outcome(&self) -> Outcome {
        self.state().outcome
    }

    pub fn is_open(&self) -> bool {
        self.gate.is_active()
    }

    fn state(&self) -> MutexGuard<'_, RouletteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CharDevice for RouletteDevice {
    fn id(&self) -> DeviceId {
        self.gate.device()
    }

    fn open(&self) -> Result<SessionHandle, DeviceError> {
        let handle = self.gate.try_acquire().inspect_err(|_| {
            self.logger.warn("open refused: device busy");
        })?;

        let chamber = Chamber::spin(self.platform.entropy.as_ref(), self.chambers);
        let mut state = self.state();
        state.cursor.reset();
        state.chamber = chamber;
        state.outcome = Outcome::Pending;
        drop(state);

        self.logger.log(
            LogEntry::new(LogLevel::Debug, "barrel spun")
                .with_field("session", handle.session())
                .with_field("chamber", chamber.position()),
        );
        Ok(handle)
    }

    fn read(
        &self,
        handle: &SessionHandle,
        dest: &mut dyn UserBuffer,
        max_len: usize,
    ) -> Result<usize, DeviceError> {
        self.gate.check(handle)?;
        if max_len == 0 {
            return Ok(0);
        }

        let mut state = self.state();
        let content = Content::generate(state.show_warning, state.chamber);
        match content {
            Content::Warning => state.warning_over = true,
            Content::Bang => {
                if state.failure.arm() {
                    self.logger.log(
                        LogEntry::new(LogLevel::Warn, "deferred failure armed")
                            .with_field("session", handle.session()),
                    );
                }
            }
            Content::Blank => {}
        }
        state.outcome = content.outcome();

        state
            .cursor
            .read_byte(content.bytes(), dest, max_len)
            .inspect_err(|err| self.logger.warn(format!("read failed: {}", err)))
    }

    fn release(&self, handle: SessionHandle) -> Result<(), ReleaseError> {
        if let Err(reason) = self.gate.check(&handle) {
            let err = ReleaseError { reason, handle };
            self.logger.warn(err.to_string());
            return Err(err);
        }

        let fire = {
            let mut state = self.state();
            if state.warning_over && state.show_warning {
                state.show_warning = false;
                self.logger.info("warning acknowledged");
            }
            state.failure.take()
        };

        let session = self.gate.release(handle)?;
        self.logger
            .log(LogEntry::new(LogLevel::Debug, "session released").with_field("session", session));

        if fire {
            DeferredFailure::fire(
                self.config.grace_period_ms,
                &self.config.panic_message,
                self.platform.delay.as_ref(),
                self.platform.host.as_ref(),
                &self.logger,
            );
        }
        Ok(())
    }
}

/// Loadable module wrapping a [`RouletteDevice`]
pub struct RouletteModule {
    device: Arc<RouletteDevice>,
}

impl RouletteModule {
    pub fn new(
        config: RouletteConfig,
        platform: RoulettePlatform,
        logger: Logger,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            device: Arc::new(RouletteDevice::new(config, platform, logger)?),
        })
    }

    /// Concrete device, for callers that need more than [`CharDevice`]
    pub fn roulette(&self) -> Arc<RouletteDevice> {
        Arc::clone(&self.device)
    }
}

impl DriverModule for RouletteModule {
    fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::new("roulette", "roulettedev", "rouletteclass")
    }

    fn device(&self) -> Arc<dyn CharDevice> {
        self.device.clone()
    }

    fn module_init(&self) {
        self.device.reset_warning();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BANG_MESSAGE, BLANK_MESSAGE, WARNING_TEXT};
    use services_logger::MemoryLog;
    use sim_kernel::{CopyFaultPlan, FaultyUserBuffer, SimDelay, SimEntropy, SimHost};

    struct Fixture {
        device: RouletteDevice,
        host: Arc<SimHost>,
        delay: Arc<SimDelay>,
        log: MemoryLog,
    }

    /// Device whose barrel lands on `positions` in order
    fn fixture(positions: Vec<u8>) -> Fixture {
        let host = Arc::new(SimHost::new());
        let delay = Arc::new(SimDelay::new());
        let log = MemoryLog::new();
        let platform = RoulettePlatform {
            entropy: Arc::new(SimEntropy::scripted(positions)),
            host: host.clone(),
            delay: delay.clone(),
        };
        let device = RouletteDevice::new(RouletteConfig::default(), platform, log.logger()).unwrap();
        Fixture {
            device,
            host,
            delay,
            log,
        }
    }

    fn cycle(device: &RouletteDevice) -> Vec<u8> {
        let handle = device.open().unwrap();
        let out = device.read_to_end(&handle, 1).unwrap();
        device.release(handle).unwrap();
        out
    }

    #[test]
    fn test_first_session_reads_warning() {
        let f = fixture(vec![0, 1]);
        assert!(f.device.show_warning());

        // Loaded chamber does not matter while the warning is up
        assert_eq!(cycle(&f.device), WARNING_TEXT.as_bytes());
        assert!(!f.device.show_warning());
        assert!(f.host.terminations().is_empty());
        assert!(f.log.contains("warning acknowledged"));

        assert_eq!(cycle(&f.device), BLANK_MESSAGE);
    }

    #[test]
    fn test_warning_persists_until_read() {
        let f = fixture(vec![1, 1]);

        // Open and release without reading keeps the warning up
        let handle = f.device.open().unwrap();
        f.device.release(handle).unwrap();
        assert!(f.device.show_warning());

        assert_eq!(cycle(&f.device), WARNING_TEXT.as_bytes());
    }

    #[test]
    fn test_partial_warning_read_still_retires_it() {
        let f = fixture(vec![1, 2]);

        let handle = f.device.open().unwrap();
        let mut out = Vec::new();
        f.device.read(&handle, &mut out, 1).unwrap();
        f.device.release(handle).unwrap();

        assert_eq!(out, b"W");
        assert!(!f.device.show_warning());
    }

    #[test]
    fn test_copy_fault_holds_warning_position() {
        let f = fixture(vec![1, 2]);
        let handle = f.device.open().unwrap();
        let mut buf = FaultyUserBuffer::new(CopyFaultPlan::new().fail_copy(0).fail_copy(3));

        let mut faults = 0;
        loop {
            match f.device.read(&handle, &mut buf, 1) {
                Ok(0) => break,
                Ok(_) => {}
                Err(DeviceError::CopyFault(_)) => faults += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        f.device.release(handle).unwrap();

        assert_eq!(faults, 2);
        assert_eq!(buf.faults(), 2);
        assert_eq!(buf.received(), WARNING_TEXT.as_bytes());
        assert!(f.log.contains("read failed"));
    }

    #[test]
    fn test_faulted_warning_read_still_retires_it() {
        // Content is generated before the copy, so a read that faults has
        // already shown the warning
        let f = fixture(vec![1, 2]);
        let handle = f.device.open().unwrap();
        let mut buf = FaultyUserBuffer::new(CopyFaultPlan::new().fail_from(0));
        assert!(matches!(
            f.device.read(&handle, &mut buf, 1),
            Err(DeviceError::CopyFault(_))
        ));
        assert!(buf.received().is_empty());
        f.device.release(handle).unwrap();

        assert!(!f.device.show_warning());
        assert_eq!(cycle(&f.device), BLANK_MESSAGE);
    }

    #[test]
    fn test_faulted_bang_read_still_arms() {
        let f = fixture(vec![1, 0]);
        cycle(&f.device);

        let handle = f.device.open().unwrap();
        let mut buf = FaultyUserBuffer::new(CopyFaultPlan::new().fail_from(0));
        assert!(f.device.read(&handle, &mut buf, 1).is_err());
        assert!(f.device.is_armed());

        f.device.release(handle).unwrap();
        assert_eq!(f.host.terminations().len(), 1);
    }

    #[test]
    fn test_foreign_handle_release_is_handed_back() {
        let f = fixture(vec![1, 1]);
        let other = fixture(vec![1]);
        let _mine = f.device.open().unwrap();
        let theirs = other.device.open().unwrap();

        let err = f.device.release(theirs).unwrap_err();
        assert!(matches!(err.reason, DeviceError::InvalidHandle { .. }));
        assert!(f.device.is_open());
        assert!(f.log.contains("Release refused"));

        other.device.release(err.into_handle()).unwrap();
        assert!(!other.device.is_open());
        assert!(other.device.open().is_ok());
    }

    #[test]
    fn test_bang_arms_and_fires_on_release() {
        let f = fixture(vec![1, 0]);
        cycle(&f.device);

        let handle = f.device.open().unwrap();
        let out = f.device.read_to_end(&handle, 1).unwrap();
        assert_eq!(out, BANG_MESSAGE);
        assert!(f.device.is_armed());
        assert_eq!(f.device.outcome(), Outcome::Hit);
        assert!(f.host.terminations().is_empty());

        f.device.release(handle).unwrap();
        assert_eq!(f.delay.delays(), vec![500]);
        assert_eq!(f.host.terminations(), vec!["Thanks for playing!".to_string()]);
        assert!(!f.device.is_armed());
        assert!(!f.device.is_open());
    }

    #[test]
    fn test_loaded_chamber_without_read_does_not_fire() {
        let f = fixture(vec![1, 0]);
        cycle(&f.device);

        let handle = f.device.open().unwrap();
        f.device.release(handle).unwrap();
        assert!(f.host.terminations().is_empty());
    }

    #[test]
    fn test_blank_never_fires() {
        let f = fixture(vec![1, 1, 2, 3, 4, 5]);
        cycle(&f.device);
        for _ in 0..5 {
            assert_eq!(cycle(&f.device), BLANK_MESSAGE);
            assert_eq!(f.device.outcome(), Outcome::Blank);
        }
        assert!(f.host.terminations().is_empty());
        assert!(f.delay.delays().is_empty());
    }

    #[test]
    fn test_zero_length_read_leaves_state_alone() {
        let f = fixture(vec![1, 0]);
        cycle(&f.device);

        let handle = f.device.open().unwrap();
        let mut out = Vec::new();
        assert_eq!(f.device.read(&handle, &mut out, 0).unwrap(), 0);
        assert!(out.is_empty());
        assert!(!f.device.is_armed());
        assert_eq!(f.device.outcome(), Outcome::Pending);

        f.device.release(handle).unwrap();
        assert!(f.host.terminations().is_empty());
    }

    #[test]
    fn test_busy_does_not_disturb_session() {
        let f = fixture(vec![1, 3]);
        cycle(&f.device);

        let handle = f.device.open().unwrap();
        let mut out = Vec::new();
        f.device.read(&handle, &mut out, 1).unwrap();
        f.device.read(&handle, &mut out, 1).unwrap();

        assert_eq!(f.device.open().unwrap_err(), DeviceError::Busy);

        while f.device.read(&handle, &mut out, 1).unwrap() > 0 {}
        assert_eq!(out, BLANK_MESSAGE);
        f.device.release(handle).unwrap();
    }

    #[test]
    fn test_module_init_raises_warning_again() {
        let host = Arc::new(SimHost::new());
        let platform = RoulettePlatform {
            entropy: Arc::new(SimEntropy::scripted(vec![1, 1, 1])),
            host,
            delay: Arc::new(SimDelay::new()),
        };
        let module = RouletteModule::new(RouletteConfig::default(), platform, Logger::null()).unwrap();
        let device = module.roulette();

        cycle(&device);
        assert!(!device.show_warning());

        module.module_init();
        assert_eq!(cycle(&device), WARNING_TEXT.as_bytes());
        assert_eq!(module.descriptor().node_name, "roulette");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let platform = RoulettePlatform {
            entropy: Arc::new(SimEntropy::seeded(1)),
            host: Arc::new(SimHost::new()),
            delay: Arc::new(SimDelay::new()),
        };
        let config = RouletteConfig {
            chambers: 0,
            ..RouletteConfig::default()
        };
        assert!(matches!(
            RouletteDevice::new(config, platform, Logger::null()),
            Err(ConfigError::NoChambers)
        ));
    }
}
