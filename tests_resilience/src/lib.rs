//! Resilience Test Utilities
//!
//! This crate provides shared utilities for device integration tests.
//!
//! ## Test Philosophy
//!
//! - **Single occupancy**: A second open never disturbs the first session
//! - **Deterministic randomness**: Every roulette outcome is reproducible
//!   from a seed or a scripted byte sequence
//! - **Observable fatality**: The terminate primitive is recorded, never run

use drivers_korbo::{KorboDevice, KorboModule};
use drivers_roulette::{RouletteConfig, RouletteDevice, RouletteModule, RoulettePlatform};
use services_device_manager::DeviceManager;
use services_logger::{Logger, MemoryLog};
use sim_kernel::SimPlatform;
use std::sync::Arc;

/// A device manager with both modules loaded on a simulated platform
pub struct TestBed {
    pub manager: DeviceManager,
    pub korbo: Arc<KorboDevice>,
    pub roulette: Arc<RouletteDevice>,
    pub roulette_module: Arc<RouletteModule>,
    pub sim: SimPlatform,
    pub log: MemoryLog,
}

/// Bootstrap helper for tests
///
/// Loads korbo and roulette the way the host runtime does, with the
/// default roulette config.
pub fn test_bootstrap(sim: SimPlatform) -> TestBed {
    test_bootstrap_with(sim, RouletteConfig::default())
}

pub fn test_bootstrap_with(sim: SimPlatform, config: RouletteConfig) -> TestBed {
    let log = MemoryLog::new();
    let logger = log.logger();

    let korbo_module = Arc::new(KorboModule::new(logger.clone()));
    let roulette_module = Arc::new(
        RouletteModule::new(config, roulette_platform(&sim), logger.clone())
            .expect("Invalid roulette config"),
    );

    let mut manager = DeviceManager::new(logger);
    manager
        .load(korbo_module.clone())
        .expect("Failed to load korbo");
    manager
        .load(roulette_module.clone())
        .expect("Failed to load roulette");

    TestBed {
        manager,
        korbo: korbo_module.korbo(),
        roulette: roulette_module.roulette(),
        roulette_module,
        sim,
        log,
    }
}

/// Roulette view of a simulated platform
pub fn roulette_platform(sim: &SimPlatform) -> RoulettePlatform {
    RoulettePlatform {
        entropy: sim.entropy.clone(),
        host: sim.host.clone(),
        delay: sim.delay.clone(),
    }
}

/// A standalone roulette device on `sim`, warning raised
pub fn roulette_on(sim: &SimPlatform) -> RouletteDevice {
    RouletteDevice::new(RouletteConfig::default(), roulette_platform(sim), Logger::null())
        .expect("Invalid roulette config")
}
