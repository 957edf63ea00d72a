//! Roulette Protocol Tests
//!
//! Validates the warning-once flow and the per-session outcome through
//! the device manager.

use drivers_roulette::{Outcome, BANG_MESSAGE, BLANK_MESSAGE, WARNING_TEXT};
use kernel_api::CharDevice;
use services_device_manager::DriverModule;
use sim_kernel::test_utils::run_session;
use sim_kernel::SimPlatform;
use tests_resilience::test_bootstrap;

/// Test: the first cycle after load drains the warning verbatim
///
/// This validates that:
/// 1. The warning is shown regardless of the chamber drawn
/// 2. The warning flag drops at the end of that cycle
/// 3. The next cycle goes straight to the game
#[test]
fn test_first_cycle_is_warning() {
    let bed = test_bootstrap(SimPlatform::scripted(vec![0, 3]));
    let device = bed.manager.device("roulette").unwrap();

    assert!(bed.roulette.show_warning());
    assert_eq!(run_session(device.as_ref(), 1).unwrap(), WARNING_TEXT.as_bytes());
    assert!(!bed.roulette.show_warning());
    assert!(!bed.sim.host.terminated());

    assert_eq!(run_session(device.as_ref(), 1).unwrap(), BLANK_MESSAGE);
}

/// Test: the warning is read one byte per call
#[test]
fn test_warning_takes_one_call_per_byte() {
    let bed = test_bootstrap(SimPlatform::seeded(4));
    let handle = bed.roulette.open().unwrap();

    let mut out = Vec::new();
    let mut calls = 0;
    while bed.roulette.read(&handle, &mut out, 4096).unwrap() == 1 {
        calls += 1;
    }
    bed.roulette.release(handle).unwrap();

    assert_eq!(calls, WARNING_TEXT.len());
    assert_eq!(out, WARNING_TEXT.as_bytes());
}

/// Test: content is stable for the whole session
#[test]
fn test_content_stable_within_session() {
    let bed = test_bootstrap(SimPlatform::scripted(vec![1, 5]));
    run_session(bed.roulette.as_ref(), 1).unwrap();

    let handle = bed.roulette.open().unwrap();
    let mut out = Vec::new();
    while bed.roulette.read(&handle, &mut out, 1).unwrap() > 0 {
        assert_eq!(bed.roulette.outcome(), Outcome::Blank);
    }
    bed.roulette.release(handle).unwrap();
    assert_eq!(out, BLANK_MESSAGE);
}

/// Test: outcome is pending until the session reads
#[test]
fn test_outcome_pending_until_read() {
    let bed = test_bootstrap(SimPlatform::scripted(vec![1, 0]));
    run_session(bed.roulette.as_ref(), 1).unwrap();

    let handle = bed.roulette.open().unwrap();
    assert_eq!(bed.roulette.outcome(), Outcome::Pending);

    let mut out = Vec::new();
    bed.roulette.read(&handle, &mut out, 1).unwrap();
    assert_eq!(bed.roulette.outcome(), Outcome::Hit);
    assert_eq!(out, &BANG_MESSAGE[..1]);
    bed.roulette.release(handle).unwrap();
}

/// Test: reloading the module raises the warning again
#[test]
fn test_reload_shows_warning_again() {
    let mut bed = test_bootstrap(SimPlatform::scripted(vec![1]));
    run_session(bed.roulette.as_ref(), 1).unwrap();
    assert_eq!(run_session(bed.roulette.as_ref(), 1).unwrap(), BLANK_MESSAGE);

    bed.manager.unload("roulette").unwrap();
    bed.manager.load(bed.roulette_module.clone()).unwrap();

    assert_eq!(
        run_session(bed.roulette.as_ref(), 1).unwrap(),
        WARNING_TEXT.as_bytes()
    );
    assert_eq!(bed.roulette_module.descriptor().uevent_vars(), vec!["DEVMODE=0666"]);
}

/// Test: the device advertises world read/write permissions
#[test]
fn test_registration_metadata() {
    let bed = test_bootstrap(SimPlatform::seeded(1));
    let registration = bed.manager.registration("roulette").unwrap();

    assert_eq!(registration.descriptor.class_name, "rouletteclass");
    assert_eq!(registration.descriptor.region_name, "roulettedev");
    assert_eq!(registration.descriptor.mode.bits(), 0o666);
    assert_eq!(registration.number.minor, 0);
    assert!(bed.log.contains("roulettedev registered with major"));
}
