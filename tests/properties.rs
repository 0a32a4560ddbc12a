//! Property tests over the full range of valid durations

use interval_chime::state::{Phase, TimerConfiguration, TimerMachine, MAX_DURATION_SECONDS};
use proptest::prelude::*;

/// Ticks needed to expire a phase; a zero-length phase still needs one tick
fn ticks_for(seconds: u32) -> u32 {
    seconds.max(1)
}

proptest! {
    #[test]
    fn countdown_and_interval_alternate(
        countdown in 0..=MAX_DURATION_SECONDS,
        interval in 0..=MAX_DURATION_SECONDS,
    ) {
        let mut machine = TimerMachine::new(TimerConfiguration::new(countdown, interval, true, false));
        let started = machine.start();
        prop_assert_eq!(started.phase, Phase::Countdown);
        prop_assert_eq!(started.remaining_seconds, countdown);

        for _ in 0..3 {
            for _ in 0..ticks_for(countdown) {
                machine.tick();
            }
            prop_assert_eq!(machine.snapshot().phase, Phase::Interval);
            prop_assert_eq!(machine.snapshot().remaining_seconds, interval);

            for _ in 0..ticks_for(interval) {
                machine.tick();
            }
            prop_assert_eq!(machine.snapshot().phase, Phase::Countdown);
            prop_assert_eq!(machine.snapshot().remaining_seconds, countdown);
            prop_assert!(machine.is_running());
        }
    }

    #[test]
    fn progress_stays_within_bounds(
        countdown in 0..=MAX_DURATION_SECONDS,
        interval in 0..=MAX_DURATION_SECONDS,
        ticks in 0u32..300,
    ) {
        let mut machine = TimerMachine::new(TimerConfiguration::new(countdown, interval, true, false));
        machine.start();
        for _ in 0..ticks {
            let outcome = machine.tick();
            prop_assert!((0.0..=100.0).contains(&outcome.snapshot.progress_percent));
        }
    }

    #[test]
    fn query_form_round_trips(
        countdown in 0..=MAX_DURATION_SECONDS,
        interval in 0..=MAX_DURATION_SECONDS,
        sound in any::<bool>(),
        interval_first in any::<bool>(),
    ) {
        let config = TimerConfiguration::new(countdown, interval, sound, interval_first);
        let parsed = TimerConfiguration::from_query(&config.to_query(), TimerConfiguration::default());
        prop_assert_eq!(parsed, config);
    }

    #[test]
    fn out_of_range_durations_never_load(
        countdown in (MAX_DURATION_SECONDS + 1)..10_000u32,
    ) {
        let base = TimerConfiguration::default();
        let parsed = TimerConfiguration::from_query(&format!("countdown={}", countdown), base);
        prop_assert_eq!(parsed, base);
    }
}
