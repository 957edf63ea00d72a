//! # Host Runtime
//!
//! Loads the driver modules and runs commands against them.

use crate::commands::HostCommand;
use crate::platform::{AbortHost, OsEntropy, ThreadDelay};
use drivers_korbo::KorboModule;
use drivers_roulette::{ConfigError, RouletteConfig, RouletteModule, RoulettePlatform};
use kernel_api::{CharDevice, DeviceError};
use services_device_manager::{DeviceManager, DeviceManagerError, DriverModule};
use services_logger::{LogLevel, Logger};
use sim_kernel::SimPlatform;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Bytes requested per read call, like `cat` asking for a page
const READ_CHUNK: usize = 4096;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Device manager error: {0}")]
    Manager(#[from] DeviceManagerError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),
}

/// Host mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Simulated platform (deterministic, never terminates)
    Sim,
    /// Real platform (OS randomness, real sleeps, real abort)
    Host,
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Host mode
    pub mode: HostMode,
    /// Entropy seed (sim mode only)
    pub seed: u64,
    /// Roulette tunables
    pub roulette: RouletteConfig,
    /// Lowest level written to the log
    pub log_level: LogLevel,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            mode: HostMode::Sim,
            seed: 0,
            roulette: RouletteConfig::default(),
            log_level: LogLevel::Warn,
        }
    }
}

/// Reads a roulette config from a JSON file
pub fn load_roulette_config(path: &Path) -> Result<RouletteConfig, HostRuntimeError> {
    let text = fs::read_to_string(path)?;
    Ok(RouletteConfig::from_json(&text)?)
}

/// Host runtime
pub struct HostRuntime {
    manager: DeviceManager,
    korbo: Arc<KorboModule>,
    roulette: Arc<RouletteModule>,
    /// Present in sim mode, to observe what the drivers did
    sim: Option<SimPlatform>,
    logger: Logger,
}

impl HostRuntime {
    /// Creates a runtime and loads both modules
    pub fn new(config: HostRuntimeConfig, logger: Logger) -> Result<Self, HostRuntimeError> {
        let logger = logger.with_min_level(config.log_level);

        let (platform, sim) = match config.mode {
            HostMode::Sim => {
                let sim = SimPlatform::seeded(config.seed);
                let platform = RoulettePlatform {
                    entropy: sim.entropy.clone(),
                    host: sim.host.clone(),
                    delay: sim.delay.clone(),
                };
                (platform, Some(sim))
            }
            HostMode::Host => {
                let platform = RoulettePlatform {
                    entropy: Arc::new(OsEntropy),
                    host: Arc::new(AbortHost),
                    delay: Arc::new(ThreadDelay),
                };
                (platform, None)
            }
        };

        let korbo = Arc::new(KorboModule::new(logger.clone()));
        let roulette = Arc::new(RouletteModule::new(config.roulette, platform, logger.clone())?);

        let mut manager = DeviceManager::new(logger.clone());
        manager.load(korbo.clone())?;
        manager.load(roulette.clone())?;

        Ok(Self {
            manager,
            korbo,
            roulette,
            sim,
            logger,
        })
    }

    pub fn manager(&self) -> &DeviceManager {
        &self.manager
    }

    /// Simulated platform, if running in sim mode
    pub fn sim(&self) -> Option<&SimPlatform> {
        self.sim.as_ref()
    }

    /// Executes one command, writing device output to `out`
    pub fn execute(&mut self, command: &HostCommand, out: &mut dyn Write) -> Result<(), HostRuntimeError> {
        match command {
            HostCommand::Cat { device } => {
                let device = self.device(device)?;
                self.cat(device.as_ref(), out)?;
            }
            HostCommand::Play { rounds } => self.play(*rounds, out)?,
            HostCommand::List => {
                for registration in self.manager.registrations() {
                    writeln!(
                        out,
                        "{} {} {} {}",
                        registration.descriptor.node_path(),
                        registration.number,
                        registration.descriptor.mode,
                        registration.descriptor.class_name
                    )?;
                }
            }
            HostCommand::Reload { device } => self.reload(device)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Streams one full session of `device` to `out`
    ///
    /// Bytes are written as they arrive, so they are visible before a
    /// release that may never return.
    fn cat(&self, device: &dyn CharDevice, out: &mut dyn Write) -> Result<(), HostRuntimeError> {
        let handle = device.open()?;
        let mut chunk = Vec::new();
        let drained = loop {
            chunk.clear();
            match device.read(&handle, &mut chunk, READ_CHUNK) {
                Ok(0) => break Ok(()),
                Ok(_) => {
                    if let Err(err) = out.write_all(&chunk) {
                        break Err(HostRuntimeError::from(err));
                    }
                }
                Err(err) => break Err(HostRuntimeError::from(err)),
            }
        };
        out.flush()?;
        device.release(handle).map_err(DeviceError::from)?;
        drained
    }

    fn play(&self, rounds: usize, out: &mut dyn Write) -> Result<(), HostRuntimeError> {
        let device = self.device("roulette")?;
        for _ in 0..rounds {
            let before = self.sim.as_ref().map_or(0, |sim| sim.host.terminations().len());
            self.cat(device.as_ref(), out)?;
            if let Some(sim) = &self.sim {
                let terminations = sim.host.terminations();
                if let Some(message) = terminations.get(before..).and_then(|fresh| fresh.last()) {
                    writeln!(out, "*** host terminated: {} ***", message)?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn reload(&mut self, name: &str) -> Result<(), HostRuntimeError> {
        let module: Arc<dyn DriverModule> = match name {
            "korbo" => self.korbo.clone(),
            "roulette" => self.roulette.clone(),
            other => return Err(HostRuntimeError::UnknownDevice(other.to_string())),
        };
        self.manager.unload(name)?;
        self.manager.load(module)?;
        self.logger.info(format!("{} reloaded", name));
        Ok(())
    }

    fn device(&self, name: &str) -> Result<Arc<dyn CharDevice>, HostRuntimeError> {
        self.manager.device(name).map_err(|err| match err {
            DeviceManagerError::DeviceNotFound(name) => HostRuntimeError::UnknownDevice(name),
            other => HostRuntimeError::Manager(other),
        })
    }
}
