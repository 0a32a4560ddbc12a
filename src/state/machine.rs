//! Countdown/interval state machine
//!
//! Pure and synchronous: the caller drives it with `tick()` once per elapsed
//! second while it is running. Cue selection is delegated to a [`CuePolicy`].

use std::sync::Arc;

use tracing::{debug, info};

use super::{
    session::{Phase, TimerSession, TimerSnapshot},
    settings::{ChangedFields, SettingsUpdate, TimerConfiguration},
};
use crate::services::cues::{CuePolicy, CueSet, CueTrigger, Tone, WARNING_SECONDS};

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub snapshot: TimerSnapshot,
    /// Tones to play, already filtered by the sound setting
    pub cues: Vec<Tone>,
    /// Phase change caused by this tick, as (from, to)
    pub transition: Option<(Phase, Phase)>,
}

#[derive(Debug, Clone)]
pub struct TimerMachine {
    config: TimerConfiguration,
    session: TimerSession,
    /// Last remaining-second value a warning cue was issued for in this pass
    last_played_second: Option<u32>,
    policy: Arc<dyn CuePolicy>,
    run_id: u64,
}

impl TimerMachine {
    pub fn new(config: TimerConfiguration) -> Self {
        Self::with_policy(config, Arc::new(CueSet::default()))
    }

    pub fn with_policy(config: TimerConfiguration, policy: Arc<dyn CuePolicy>) -> Self {
        Self {
            config,
            session: TimerSession::new(),
            last_played_second: None,
            policy,
            run_id: 0,
        }
    }

    pub fn config(&self) -> TimerConfiguration {
        self.config
    }

    pub fn session(&self) -> TimerSession {
        self.session
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running
    }

    /// Generation counter, bumped by every start and stop
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Begin a fresh run in the configured starting phase
    pub fn start(&mut self) -> TimerSnapshot {
        self.run_id += 1;
        self.last_played_second = None;
        self.session = if self.config.start_with_interval {
            TimerSession::running(Phase::Interval, self.config.interval_seconds)
        } else {
            TimerSession::running(Phase::Countdown, self.config.countdown_seconds)
        };
        info!(
            "Timer started in {} phase with {}s remaining",
            self.session.phase, self.session.remaining_seconds
        );
        self.snapshot()
    }

    /// Halt and return to idle
    pub fn stop(&mut self) -> TimerSnapshot {
        self.run_id += 1;
        self.last_played_second = None;
        self.session = TimerSession::new();
        info!("Timer stopped");
        self.snapshot()
    }

    /// Same as [`TimerMachine::stop`]
    pub fn reset(&mut self) -> TimerSnapshot {
        self.stop()
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TickOutcome {
        let from = self.session.phase;
        let next = self.session.remaining_seconds.saturating_sub(1);
        let mut cues = Vec::new();
        let mut transition = None;

        if WARNING_SECONDS.contains(&next) && self.last_played_second != Some(next) {
            cues.extend(self.policy.cues_for(CueTrigger::Warning(next)));
            self.last_played_second = Some(next);
        }

        if next == 0 {
            match from {
                Phase::Countdown => {
                    self.enter(Phase::Interval, self.config.interval_seconds);
                    cues.extend(self.policy.cues_for(CueTrigger::CountdownFinished));
                    transition = Some((Phase::Countdown, Phase::Interval));
                }
                Phase::Interval => {
                    self.enter(Phase::Countdown, self.config.countdown_seconds);
                    cues.extend(self.policy.cues_for(CueTrigger::IntervalFinished));
                    transition = Some((Phase::Interval, Phase::Countdown));
                }
                Phase::Idle => self.session.remaining_seconds = 0,
            }
        } else {
            self.session.remaining_seconds = next;
        }

        if let Some((from, to)) = transition {
            debug!("Phase {} expired, entering {}", from, to);
        }

        if !self.config.sound_enabled {
            cues.clear();
        }

        TickOutcome {
            snapshot: self.snapshot(),
            cues,
            transition,
        }
    }

    fn enter(&mut self, phase: Phase, remaining_seconds: u32) {
        self.session.phase = phase;
        self.session.remaining_seconds = remaining_seconds;
        self.last_played_second = None;
    }

    /// Apply a settings change.
    ///
    /// While stopped, a duration change for the current phase also resets the
    /// remaining time; while running the in-flight countdown is untouched.
    pub fn configure(&mut self, update: &SettingsUpdate) -> ChangedFields {
        let changed = self.config.apply(update);

        if !self.session.is_running {
            match self.session.phase {
                Phase::Countdown if changed.countdown => {
                    self.session.remaining_seconds = self.config.countdown_seconds;
                }
                Phase::Interval if changed.interval => {
                    self.session.remaining_seconds = self.config.interval_seconds;
                }
                _ => {}
            }
        }

        if changed.any() {
            debug!("Configuration updated: {:?}", self.config);
        }
        changed
    }

    pub fn set_countdown(&mut self, seconds: u32) -> ChangedFields {
        self.configure(&SettingsUpdate {
            countdown_seconds: Some(seconds),
            ..Default::default()
        })
    }

    pub fn set_interval(&mut self, seconds: u32) -> ChangedFields {
        self.configure(&SettingsUpdate {
            interval_seconds: Some(seconds),
            ..Default::default()
        })
    }

    pub fn set_sound(&mut self, enabled: bool) -> ChangedFields {
        self.configure(&SettingsUpdate {
            sound_enabled: Some(enabled),
            ..Default::default()
        })
    }

    pub fn set_start_with_interval(&mut self, interval_first: bool) -> ChangedFields {
        self.configure(&SettingsUpdate {
            start_with_interval: Some(interval_first),
            ..Default::default()
        })
    }

    fn phase_duration(&self) -> u32 {
        match self.session.phase {
            Phase::Idle => 0,
            Phase::Countdown => self.config.countdown_seconds,
            Phase::Interval => self.config.interval_seconds,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.session.phase,
            remaining_seconds: self.session.remaining_seconds,
            is_running: self.session.is_running,
            progress_percent: self.session.progress_percent(self.phase_duration()),
        }
    }
}

impl Default for TimerMachine {
    fn default() -> Self {
        Self::new(TimerConfiguration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cues::{COUNTDOWN_FINISHED_TONE, INTERVAL_FINISHED_TONE, WARNING_TONE};

    fn machine(countdown: u32, interval: u32) -> TimerMachine {
        TimerMachine::new(TimerConfiguration::new(countdown, interval, true, false))
    }

    fn tick_n(machine: &mut TimerMachine, n: u32) -> Vec<TickOutcome> {
        (0..n).map(|_| machine.tick()).collect()
    }

    #[test]
    fn starts_idle() {
        let machine = TimerMachine::default();
        assert_eq!(machine.snapshot(), TimerSnapshot::idle());
    }

    #[test]
    fn walks_through_the_example_scenario() {
        let mut machine = machine(10, 5);
        let started = machine.start();
        assert_eq!(started.phase, Phase::Countdown);
        assert_eq!(started.remaining_seconds, 10);

        let outcomes = tick_n(&mut machine, 7);
        let last = outcomes.last().unwrap();
        assert_eq!(last.snapshot.remaining_seconds, 3);
        assert_eq!(last.cues, vec![WARNING_TONE]);

        let outcomes = tick_n(&mut machine, 3);
        let last = outcomes.last().unwrap();
        assert_eq!(last.snapshot.phase, Phase::Interval);
        assert_eq!(last.snapshot.remaining_seconds, 5);
        assert_eq!(last.cues, vec![COUNTDOWN_FINISHED_TONE]);
        assert_eq!(last.transition, Some((Phase::Countdown, Phase::Interval)));

        let outcomes = tick_n(&mut machine, 5);
        let last = outcomes.last().unwrap();
        assert_eq!(last.snapshot.phase, Phase::Countdown);
        assert_eq!(last.snapshot.remaining_seconds, 10);
        assert_eq!(last.cues.len(), 2);
        assert!(last.cues.iter().all(|tone| tone.frequency_hz == 600));
    }

    #[test]
    fn warnings_fire_once_per_second_per_pass() {
        let mut machine = machine(6, 4);
        machine.start();

        let warnings: Vec<u32> = tick_n(&mut machine, 6)
            .iter()
            .filter(|outcome| outcome.cues.contains(&WARNING_TONE))
            .map(|outcome| outcome.snapshot.remaining_seconds)
            .collect();
        assert_eq!(warnings, vec![3, 2, 1]);

        // Interval pass of 4s warns again at 3, 2, 1.
        let warnings = tick_n(&mut machine, 4)
            .iter()
            .filter(|outcome| outcome.cues.contains(&WARNING_TONE))
            .count();
        assert_eq!(warnings, 3);
    }

    #[test]
    fn zero_countdown_expires_on_first_tick() {
        let mut machine = machine(0, 8);
        machine.start();
        let outcome = machine.tick();

        assert_eq!(outcome.snapshot.phase, Phase::Interval);
        assert_eq!(outcome.snapshot.remaining_seconds, 8);
        assert_eq!(outcome.cues, vec![COUNTDOWN_FINISHED_TONE]);
    }

    #[test]
    fn starting_with_interval_loads_interval_duration() {
        let mut machine =
            TimerMachine::new(TimerConfiguration::new(10, 7, true, true));
        let snapshot = machine.start();
        assert_eq!(snapshot.phase, Phase::Interval);
        assert_eq!(snapshot.remaining_seconds, 7);
    }

    #[test]
    fn stop_then_start_gives_fresh_session() {
        let mut machine = machine(10, 5);
        machine.start();
        tick_n(&mut machine, 4);
        let stopped = machine.stop();
        assert_eq!(stopped, TimerSnapshot::idle());

        let restarted = machine.start();
        assert_eq!(restarted.remaining_seconds, 10);
        assert_eq!(restarted.phase, Phase::Countdown);
    }

    #[test]
    fn reset_matches_stop() {
        let mut machine = machine(10, 5);
        machine.start();
        tick_n(&mut machine, 2);
        let run_id = machine.run_id();
        assert_eq!(machine.reset(), TimerSnapshot::idle());
        assert!(machine.run_id() > run_id);
    }

    #[test]
    fn muted_ticks_still_consume_warnings() {
        let mut machine = machine(5, 5);
        machine.start();
        tick_n(&mut machine, 1);

        machine.set_sound(false);
        let muted = machine.tick();
        assert_eq!(muted.snapshot.remaining_seconds, 3);
        assert!(muted.cues.is_empty());

        machine.set_sound(true);
        let two = machine.tick();
        let one = machine.tick();
        assert_eq!(two.cues, vec![WARNING_TONE]);
        assert_eq!(one.cues, vec![WARNING_TONE]);
    }

    #[test]
    fn simple_cue_set_has_single_pulses_and_no_warnings() {
        let mut machine = TimerMachine::with_policy(
            TimerConfiguration::new(3, 2, true, false),
            Arc::new(CueSet::Simple),
        );
        machine.start();

        let outcomes = tick_n(&mut machine, 5);
        let cues: Vec<Tone> = outcomes.into_iter().flat_map(|outcome| outcome.cues).collect();
        assert_eq!(cues, vec![COUNTDOWN_FINISHED_TONE, INTERVAL_FINISHED_TONE]);
    }

    #[test]
    fn duration_change_while_running_leaves_countdown_alone() {
        let mut machine = machine(10, 5);
        machine.start();
        tick_n(&mut machine, 2);

        machine.set_countdown(60);
        assert_eq!(machine.snapshot().remaining_seconds, 8);

        tick_n(&mut machine, 8);
        tick_n(&mut machine, 5);
        assert_eq!(machine.snapshot().remaining_seconds, 60);
    }

    #[test]
    fn out_of_range_durations_are_ignored() {
        let mut machine = machine(10, 5);
        let changed = machine.set_interval(121);
        assert!(!changed.any());
        assert_eq!(machine.config().interval_seconds, 5);
    }

    #[test]
    fn idle_tick_stays_idle() {
        let mut machine = TimerMachine::default();
        let outcome = machine.tick();
        assert_eq!(outcome.snapshot, TimerSnapshot::idle());
        assert!(outcome.transition.is_none());
    }

    #[test]
    fn progress_follows_active_phase_duration() {
        let mut machine = machine(10, 4);
        machine.start();
        tick_n(&mut machine, 5);
        assert_eq!(machine.snapshot().progress_percent, 50.0);

        tick_n(&mut machine, 6);
        assert_eq!(machine.snapshot().phase, Phase::Interval);
        assert_eq!(machine.snapshot().progress_percent, 75.0);
    }
}
