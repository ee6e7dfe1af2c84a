//! Trial phase transitions against the allowed-transition table

use lazyprop_harness::state_machine::{allowed_transitions, validate_transition, PhaseTracker};
use lazyprop_harness::TrialPhase;
use proptest::prelude::*;

fn phase() -> impl Strategy<Value = TrialPhase> {
    prop_oneof![
        Just(TrialPhase::Idle),
        Just(TrialPhase::Priming),
        Just(TrialPhase::Constructing),
        Just(TrialPhase::PostGcSampling),
        Just(TrialPhase::Draining),
    ]
}

#[test]
fn test_idle_only_primes() {
    assert_eq!(allowed_transitions(TrialPhase::Idle), vec![TrialPhase::Priming]);
}

#[test]
fn test_every_phase_drains_back_to_idle() {
    for start in TrialPhase::ALL {
        let mut current = start;
        let mut steps = 0;
        loop {
            current = *allowed_transitions(current).last().unwrap();
            steps += 1;
            if current == TrialPhase::Idle {
                break;
            }
            assert!(steps <= TrialPhase::ALL.len(), "{start} never drains");
        }
    }
}

#[cfg(not(feature = "strict-debug"))]
proptest! {
    #[test]
    fn prop_validation_matches_allowed_list(from in phase(), to in phase()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_tracker_only_moves_on_legal_steps(steps in proptest::collection::vec(phase(), 0..32)) {
        let mut tracker = PhaseTracker::new();
        for step in steps {
            let before = tracker.phase();
            let legal = allowed_transitions(before).contains(&step);
            if legal {
                tracker.advance(step).unwrap();
                prop_assert_eq!(tracker.phase(), step);
            } else {
                prop_assert!(tracker.advance(step).is_err());
                prop_assert_eq!(tracker.phase(), before);
            }
        }
    }
}
