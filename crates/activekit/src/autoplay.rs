//! Autoplay: timed activation of the next item.
//!
//! Autoplay is a small state machine driven by the list's logical clock:
//!
//! ```text
//!            play()                 pause()
//!  Stopped ───────────▶ Playing ───────────▶ Paused
//!     ▲                  │  ▲                  │
//!     └──── stop() ──────┘  └──── play() ──────┘
//! ```
//!
//! While playing, a timer slot holds the next tick. A tick activates the
//! next item as an automatic call and rearms the slot. Pausing remembers the
//! remaining time; resuming fires after exactly that remainder.
//!
//! # Invariants
//!
//! 1. The timer is armed only in `Playing`. A computed duration on an empty
//!    list leaves it unarmed until the first insert.
//! 2. A tick on a non-circular list that reaches the last item stops
//!    autoplay before activating it, so `AutoPlayStopped` precedes the final
//!    `Activated`.
//! 3. When the last active item is deactivated or removed while autoplay
//!    runs, autoplay stops before the change is emitted.
//!
//! # Failure Modes
//!
//! A duration function that yields zero stops autoplay and surfaces
//! [`ActiveListError::AutoPlayDuration`] from the call that resolved it
//! (`configure_auto_play`, `play`, or [`ActiveList::poll_timers`]).

use std::time::Duration;

use activekit_core::{ActiveListError, ActiveListEventKind, Direction, Result};
use activekit_runtime::TimerSlot;

use crate::config::{ActionOptions, AutoPlayConfig};
use crate::list::ActiveList;

/// Autoplay lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutoPlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Snapshot of the autoplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoPlayStatus {
    pub is_playing: bool,
    /// Interval of the pending tick, zero when stopped.
    pub duration: Duration,
    /// Whether autoplay was ever stopped since initialization.
    pub has_been_stopped_before: bool,
}

pub(crate) struct AutoPlay<T> {
    pub(crate) config: Option<AutoPlayConfig<T>>,
    pub(crate) state: AutoPlayState,
    pub(crate) duration: Duration,
    pub(crate) has_been_stopped_before: bool,
    pub(crate) timer: TimerSlot,
    remaining: Option<Duration>,
}

impl<T> AutoPlay<T> {
    pub(crate) const fn new() -> Self {
        Self {
            config: None,
            state: AutoPlayState::Stopped,
            duration: Duration::ZERO,
            has_been_stopped_before: false,
            timer: TimerSlot::new(),
            remaining: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<T: Clone + PartialEq> ActiveList<T> {
    #[must_use]
    pub fn auto_play(&self) -> AutoPlayStatus {
        AutoPlayStatus {
            is_playing: self.auto_play.state == AutoPlayState::Playing,
            duration: self.auto_play.duration,
            has_been_stopped_before: self.auto_play.has_been_stopped_before,
        }
    }

    #[must_use]
    pub const fn auto_play_state(&self) -> AutoPlayState {
        self.auto_play.state
    }

    /// Replace the autoplay configuration.
    ///
    /// `Some` (re)starts autoplay with a fresh interval and emits
    /// `AutoPlayPlaying`; a zero duration fails without any change. `None`
    /// silently disables autoplay and forgets the configuration, leaving
    /// `has_been_stopped_before` as it was.
    pub fn configure_auto_play(&mut self, config: Option<AutoPlayConfig<T>>) -> Result<()> {
        const METHOD: &str = "configure_auto_play";
        let Some(config) = config else {
            self.auto_play.timer.cancel();
            self.auto_play.config = None;
            self.auto_play.state = AutoPlayState::Stopped;
            self.auto_play.duration = Duration::ZERO;
            self.auto_play.remaining = None;
            tracing::debug!("autoplay disabled");
            return Ok(());
        };

        let duration = self.resolve_duration(&config.duration);
        if duration == Some(Duration::ZERO) {
            return Err(ActiveListError::AutoPlayDuration { method: METHOD });
        }

        self.auto_play.timer.cancel();
        self.auto_play.config = Some(config);
        self.auto_play.state = AutoPlayState::Playing;
        self.auto_play.remaining = None;
        if let Some(duration) = duration {
            self.auto_play.duration = duration;
            self.auto_play.timer.schedule(self.now(), duration);
        }
        tracing::debug!(?duration, "autoplay configured");
        self.emit(ActiveListEventKind::AutoPlayPlaying);
        Ok(())
    }

    /// Start or resume autoplay.
    ///
    /// Resuming from a pause fires after the remaining time; starting from
    /// a stop begins a fresh interval. Does nothing while playing or when
    /// autoplay was never configured.
    pub fn play(&mut self) -> Result<()> {
        const METHOD: &str = "play";
        match self.auto_play.state {
            AutoPlayState::Playing => Ok(()),
            AutoPlayState::Paused => {
                let delay = self
                    .auto_play
                    .remaining
                    .take()
                    .unwrap_or(self.auto_play.duration);
                self.auto_play.state = AutoPlayState::Playing;
                self.auto_play.timer.schedule(self.now(), delay);
                tracing::debug!(?delay, "autoplay resumed");
                self.emit(ActiveListEventKind::AutoPlayPlaying);
                Ok(())
            }
            AutoPlayState::Stopped => {
                let Some(source) = self.auto_play.config.as_ref().map(|c| c.duration.clone())
                else {
                    return Ok(());
                };
                let duration = self.resolve_duration(&source);
                if duration == Some(Duration::ZERO) {
                    return Err(ActiveListError::AutoPlayDuration { method: METHOD });
                }
                self.auto_play.state = AutoPlayState::Playing;
                self.auto_play.has_been_stopped_before = true;
                if let Some(duration) = duration {
                    self.auto_play.duration = duration;
                    self.auto_play.timer.schedule(self.now(), duration);
                }
                tracing::debug!(?duration, "autoplay started");
                self.emit(ActiveListEventKind::AutoPlayPlaying);
                Ok(())
            }
        }
    }

    /// Freeze autoplay, keeping the time left until the next tick.
    pub fn pause(&mut self) {
        if self.auto_play.state != AutoPlayState::Playing {
            return;
        }
        let now = self.now();
        let remaining = self
            .auto_play
            .timer
            .remaining(now)
            .unwrap_or(self.auto_play.duration);
        self.auto_play.timer.cancel();
        self.auto_play.remaining = Some(remaining);
        self.auto_play.state = AutoPlayState::Paused;
        tracing::debug!(?remaining, "autoplay paused");
        self.emit(ActiveListEventKind::AutoPlayPaused);
    }

    /// Halt autoplay; a later [`play`](Self::play) starts a fresh interval.
    pub fn stop(&mut self) {
        if self.auto_play.state == AutoPlayState::Stopped {
            return;
        }
        self.auto_play.timer.cancel();
        self.auto_play.state = AutoPlayState::Stopped;
        self.auto_play.duration = Duration::ZERO;
        self.auto_play.remaining = None;
        self.auto_play.has_been_stopped_before = true;
        tracing::debug!("autoplay stopped");
        self.emit(ActiveListEventKind::AutoPlayStopped);
    }

    /// Stop or debounce autoplay ahead of a user-driven change.
    pub(crate) fn auto_play_on_user_interaction(&mut self, opts: &ActionOptions<T>) {
        if !opts.is_user_interaction || self.auto_play.state != AutoPlayState::Playing {
            return;
        }
        let stops = self
            .auto_play
            .config
            .as_ref()
            .is_some_and(|c| c.stops_on_user_interaction);
        if stops {
            self.stop();
        } else if self.auto_play.timer.is_armed() {
            let duration = self.auto_play.duration;
            self.auto_play.timer.schedule(self.now(), duration);
            tracing::trace!(?duration, "autoplay debounced");
        }
    }

    /// Called once the last active item went away.
    pub(crate) fn auto_play_on_emptied(&mut self) {
        if self.auto_play.state != AutoPlayState::Stopped {
            tracing::debug!("no active items left");
            self.stop();
        }
    }

    /// Arm the first tick of a computed duration once there is content to
    /// compute it from.
    pub(crate) fn auto_play_on_inserted(&mut self) {
        if self.auto_play.state != AutoPlayState::Playing || self.auto_play.timer.is_armed() {
            return;
        }
        if let Err(err) = self.rearm_auto_play("auto_play") {
            tracing::debug!(%err, "autoplay stopped after insert");
        }
    }

    pub(crate) fn auto_play_tick(&mut self) -> Result<()> {
        const METHOD: &str = "auto_play";
        if self.auto_play.state != AutoPlayState::Playing {
            return Ok(());
        }
        if self.contents.is_empty() {
            return self.rearm_auto_play(METHOD);
        }
        let Some(target) = self.step_target(Direction::Next) else {
            self.stop();
            return Ok(());
        };
        let is_final = !self.is_circular && target + 1 == self.contents.len();
        if is_final {
            self.stop();
        }

        tracing::trace!(target, is_final, "autoplay tick");
        if let Err(err) = self.activate_at(METHOD, target, ActionOptions::automatic()) {
            self.stop();
            return Err(err);
        }

        if !is_final
            && self.auto_play.state == AutoPlayState::Playing
            && !self.auto_play.timer.is_armed()
        {
            self.rearm_auto_play(METHOD)?;
        }
        Ok(())
    }

    fn rearm_auto_play(&mut self, method: &'static str) -> Result<()> {
        let Some(source) = self.auto_play.config.as_ref().map(|c| c.duration.clone()) else {
            return Ok(());
        };
        match self.resolve_duration(&source) {
            Some(duration) if duration.is_zero() => {
                self.stop();
                Err(ActiveListError::AutoPlayDuration { method })
            }
            Some(duration) => {
                self.auto_play.duration = duration;
                self.auto_play.timer.schedule(self.now(), duration);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActiveListConfig, DurationSource};
    use activekit_core::{ActiveListEventType, ManualClock};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn playing(clock: &ManualClock, circular: bool) -> ActiveList<&'static str> {
        ActiveList::with_clock(
            ActiveListConfig::new(["a", "b", "c"])
                .with_active_indexes([0])
                .circular(circular)
                .with_auto_play(AutoPlayConfig::new(ms(200)))
                .with_history(50),
            clock.clone(),
        )
        .unwrap()
    }

    fn advance(list: &mut ActiveList<&'static str>, clock: &ManualClock, by: u64) {
        clock.advance(ms(by));
        list.poll_timers().unwrap();
    }

    #[test]
    fn starts_playing_from_config() {
        let clock = ManualClock::new();
        let list = playing(&clock, false);
        assert_eq!(
            list.auto_play(),
            AutoPlayStatus {
                is_playing: true,
                duration: ms(200),
                has_been_stopped_before: false
            }
        );
        assert_eq!(list.next_deadline(), Some(ms(200)));
    }

    #[test]
    fn ticks_advance_and_stop_at_end() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, false);
        advance(&mut list, &clock, 200);
        assert_eq!(list.active(), vec!["b"]);
        advance(&mut list, &clock, 200);
        assert_eq!(list.active(), vec!["c"]);
        assert_eq!(list.auto_play_state(), AutoPlayState::Stopped);
        assert!(list.auto_play().has_been_stopped_before);

        let tail: Vec<_> = list
            .history()
            .rev()
            .take(2)
            .map(|e| e.event_type())
            .collect();
        assert_eq!(
            tail,
            vec![ActiveListEventType::Activated, ActiveListEventType::AutoPlayStopped]
        );
    }

    #[test]
    fn late_poll_catches_up_on_deadlines() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        advance(&mut list, &clock, 650);
        assert_eq!(list.active(), vec!["a"]);
        let times: Vec<_> = list
            .history()
            .filter(|e| e.event_type() == ActiveListEventType::Activated)
            .map(|e| e.time)
            .collect();
        assert_eq!(times, vec![ms(200), ms(400), ms(600)]);
        assert_eq!(list.next_deadline(), Some(ms(800)));
    }

    #[test]
    fn computed_duration_arms_once_contents_arrive() {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::<&'static str>::new([])
                .circular(true)
                .with_auto_play(AutoPlayConfig::new(DurationSource::computed(|_| ms(100)))),
            clock.clone(),
        )
        .unwrap();
        assert!(list.auto_play().is_playing);
        assert_eq!(list.next_deadline(), None);

        list.push("a");
        list.push("b");
        list.push("c");
        assert_eq!(list.next_deadline(), Some(ms(100)));

        list.activate_by_index(0, ActionOptions::automatic()).unwrap();
        advance(&mut list, &clock, 100);
        assert_eq!(list.active(), vec!["b"]);
        assert!(list.auto_play().is_playing);
        assert_eq!(list.next_deadline(), Some(ms(200)));
    }

    #[test]
    fn computed_zero_duration_stops_when_contents_arrive() {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::<&'static str>::new([])
                .with_auto_play(AutoPlayConfig::new(DurationSource::computed(|_| Duration::ZERO)))
                .with_history(10),
            clock,
        )
        .unwrap();
        list.push("a");
        assert_eq!(list.auto_play_state(), AutoPlayState::Stopped);
        assert_eq!(list.next_deadline(), None);
        let types: Vec<_> = list.history().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                ActiveListEventType::Initialized,
                ActiveListEventType::Inserted,
                ActiveListEventType::AutoPlayStopped,
            ]
        );
    }

    #[test]
    fn pause_keeps_remaining_time() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        advance(&mut list, &clock, 150);
        list.pause();
        assert_eq!(list.auto_play_state(), AutoPlayState::Paused);
        assert!(!list.auto_play().is_playing);

        advance(&mut list, &clock, 1000);
        assert_eq!(list.active(), vec!["a"]);

        list.play().unwrap();
        advance(&mut list, &clock, 49);
        assert_eq!(list.active(), vec!["a"]);
        advance(&mut list, &clock, 1);
        assert_eq!(list.active(), vec!["b"]);
    }

    #[test]
    fn user_interaction_debounces() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        advance(&mut list, &clock, 150);
        list.activate_by_index(2, ActionOptions::default()).unwrap();
        assert_eq!(list.next_deadline(), Some(ms(350)));
        advance(&mut list, &clock, 199);
        assert_eq!(list.active(), vec!["c"]);
        advance(&mut list, &clock, 1);
        assert_eq!(list.active(), vec!["a"]);
    }

    #[test]
    fn user_interaction_can_stop() {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::new(["a", "b", "c"])
                .with_active_indexes([0])
                .with_auto_play(AutoPlayConfig::new(ms(200)).stops_on_user_interaction(true))
                .with_history(10),
            clock.clone(),
        )
        .unwrap();
        list.activate_by_index(1, ActionOptions::default()).unwrap();
        assert_eq!(list.auto_play_state(), AutoPlayState::Stopped);
        let types: Vec<_> = list.history().skip(1).map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![ActiveListEventType::AutoPlayStopped, ActiveListEventType::Activated]
        );
    }

    #[test]
    fn stop_then_play_restarts_interval() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        advance(&mut list, &clock, 150);
        list.stop();
        assert_eq!(list.auto_play().duration, Duration::ZERO);
        list.play().unwrap();
        assert_eq!(list.next_deadline(), Some(ms(350)));
    }

    #[test]
    fn emptying_active_set_stops() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        list.deactivate_by_index(0, ActionOptions::automatic())
            .unwrap();
        assert_eq!(list.auto_play_state(), AutoPlayState::Stopped);
        let types: Vec<_> = list.history().skip(1).map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![ActiveListEventType::AutoPlayStopped, ActiveListEventType::Deactivated]
        );
    }

    #[test]
    fn configure_none_disables_and_forgets() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        let before = list.history().len();
        list.configure_auto_play(None).unwrap();
        assert_eq!(
            list.auto_play(),
            AutoPlayStatus {
                is_playing: false,
                duration: Duration::ZERO,
                has_been_stopped_before: false
            }
        );
        assert_eq!(list.history().len(), before);
        assert_eq!(list.next_deadline(), None);
        list.play().unwrap();
        assert_eq!(list.auto_play_state(), AutoPlayState::Stopped);
    }

    #[test]
    fn reconfigure_restarts_interval() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        advance(&mut list, &clock, 150);
        list.configure_auto_play(Some(AutoPlayConfig::new(ms(50))))
            .unwrap();
        assert_eq!(list.next_deadline(), Some(ms(200)));
        advance(&mut list, &clock, 50);
        assert_eq!(list.active(), vec!["b"]);
        assert_eq!(
            list.history().last().map(|e| e.event_type()),
            Some(ActiveListEventType::Activated)
        );
    }

    #[test]
    fn configure_rejects_zero_duration() {
        let clock = ManualClock::new();
        let mut list = playing(&clock, true);
        let err = list
            .configure_auto_play(Some(AutoPlayConfig::new(Duration::ZERO)))
            .unwrap_err();
        assert_eq!(
            err,
            ActiveListError::AutoPlayDuration {
                method: "configure_auto_play"
            }
        );
        assert_eq!(list.auto_play().duration, ms(200));
    }

    #[test]
    fn computed_duration_follows_active_item() {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::new(["a", "b", "c"])
                .with_active_indexes([0])
                .circular(true)
                .with_auto_play(AutoPlayConfig::new(DurationSource::computed(|ctx| {
                    ms(100 * (ctx.index as u64 + 1))
                }))),
            clock.clone(),
        )
        .unwrap();
        assert_eq!(list.next_deadline(), Some(ms(100)));
        advance(&mut list, &clock, 100);
        assert_eq!(list.active(), vec!["b"]);
        assert_eq!(list.auto_play().duration, ms(200));
        assert_eq!(list.next_deadline(), Some(ms(300)));
    }

    #[test]
    fn computed_zero_duration_surfaces_on_tick() {
        let clock = ManualClock::new();
        let mut list = ActiveList::with_clock(
            ActiveListConfig::new(["a", "b", "c"])
                .with_active_indexes([0])
                .circular(true)
                .with_auto_play(AutoPlayConfig::new(DurationSource::computed(|ctx| {
                    if ctx.index == 1 { Duration::ZERO } else { ms(100) }
                }))),
            clock.clone(),
        )
        .unwrap();
        clock.advance(ms(100));
        let err = list.poll_timers().unwrap_err();
        assert_eq!(err, ActiveListError::AutoPlayDuration { method: "auto_play" });
        assert_eq!(list.active(), vec!["b"]);
        assert_eq!(list.auto_play_state(), AutoPlayState::Stopped);
    }
}
