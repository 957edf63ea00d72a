//! Roulette Statistics Tests
//!
//! Validates that outcomes converge to one hit in six over many sessions.
//! Seeded, so the numbers are reproducible; the tolerance is wide enough
//! that any reasonable seed passes.

use drivers_roulette::{RouletteConfig, BANG_MESSAGE, BLANK_MESSAGE, WARNING_TEXT};
use sim_kernel::test_utils::{run_session, tally_sessions};
use sim_kernel::SimPlatform;
use tests_resilience::{test_bootstrap, test_bootstrap_with};

const SESSIONS: usize = 6000;

fn count(tally: &[(Vec<u8>, usize)], output: &[u8]) -> usize {
    tally
        .iter()
        .find(|(seen, _)| seen.as_slice() == output)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Test: hits converge to 1/6, blanks to 5/6
#[test]
fn test_outcome_ratio_converges() {
    for seed in [1, 2, 3] {
        let bed = test_bootstrap(SimPlatform::seeded(seed));
        assert_eq!(
            run_session(bed.roulette.as_ref(), 1).unwrap(),
            WARNING_TEXT.as_bytes()
        );

        let tally = tally_sessions(bed.roulette.as_ref(), SESSIONS).unwrap();
        let bangs = count(&tally, BANG_MESSAGE);
        let blanks = count(&tally, BLANK_MESSAGE);

        assert_eq!(bangs + blanks, SESSIONS, "only two outcomes exist");
        // Expected 1000, standard deviation about 29
        assert!((850..=1150).contains(&bangs), "seed {}: {} bangs", seed, bangs);

        // One termination per armed session, never more
        assert_eq!(bed.sim.host.terminations().len(), bangs);
    }
}

/// Test: a one-chamber barrel always fires
#[test]
fn test_single_chamber_always_hits() {
    let config = RouletteConfig {
        chambers: 1,
        grace_period_ms: 0,
        ..RouletteConfig::default()
    };
    let bed = test_bootstrap_with(SimPlatform::seeded(8), config);
    run_session(bed.roulette.as_ref(), 1).unwrap();

    let tally = tally_sessions(bed.roulette.as_ref(), 50).unwrap();
    assert_eq!(tally, vec![(BANG_MESSAGE.to_vec(), 50)]);
    assert_eq!(bed.sim.delay.delays(), vec![0; 50]);
}
