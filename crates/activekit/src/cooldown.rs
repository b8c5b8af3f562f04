//! Cooldown: a window after a user activation during which further user
//! activation calls are ignored.
//!
//! The duration comes from the call's [`ActionOptions::cooldown`] or, when
//! absent, the configured default. It is resolved against the content the
//! call acted on. Automatic calls neither start nor respect a cooldown.

use std::time::Duration;

use activekit_core::{ActiveListError, ActiveListEventKind, Result};
use activekit_runtime::TimerSlot;

use crate::config::{ActionOptions, DurationSource};
use crate::content::ContentId;
use crate::list::ActiveList;

/// Snapshot of the cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CooldownStatus {
    pub is_active: bool,
    /// Length of the running cooldown, zero when idle.
    pub duration: Duration,
}

#[derive(Debug)]
pub(crate) struct Cooldown<T> {
    pub(crate) default: Option<DurationSource<T>>,
    pub(crate) is_active: bool,
    pub(crate) duration: Duration,
    pub(crate) timer: TimerSlot,
}

impl<T> Cooldown<T> {
    pub(crate) const fn new() -> Self {
        Self {
            default: None,
            is_active: false,
            duration: Duration::ZERO,
            timer: TimerSlot::new(),
        }
    }

    pub(crate) fn reset(&mut self, default: Option<DurationSource<T>>) {
        self.timer.cancel();
        self.default = default;
        self.is_active = false;
        self.duration = Duration::ZERO;
    }
}

impl<T: Clone + PartialEq> ActiveList<T> {
    #[must_use]
    pub fn cooldown(&self) -> CooldownStatus {
        CooldownStatus {
            is_active: self.cooldown.is_active,
            duration: self.cooldown.duration,
        }
    }

    pub(crate) fn is_cooling_down_for(&self, opts: &ActionOptions<T>) -> bool {
        self.cooldown.is_active && opts.is_user_interaction
    }

    /// Start a cooldown after a user call acted on `id`.
    pub(crate) fn start_cooldown(
        &mut self,
        method: &'static str,
        opts: &ActionOptions<T>,
        id: ContentId,
    ) -> Result<()> {
        if !opts.is_user_interaction {
            return Ok(());
        }
        let Some(source) = opts
            .cooldown
            .clone()
            .or_else(|| self.cooldown.default.clone())
        else {
            return Ok(());
        };
        let Some(index) = self.index_of_id(id) else {
            return Ok(());
        };
        let duration = source.resolve(&self.context(index));
        if duration.is_zero() {
            return Err(ActiveListError::CooldownDuration { method });
        }

        self.cooldown.is_active = true;
        self.cooldown.duration = duration;
        self.cooldown.timer.schedule(self.now(), duration);
        tracing::debug!(method, ?duration, "cooldown started");
        self.emit(ActiveListEventKind::CooldownStarted);
        Ok(())
    }

    pub(crate) fn end_cooldown(&mut self) {
        if !self.cooldown.is_active {
            return;
        }
        self.cooldown.timer.cancel();
        self.cooldown.is_active = false;
        self.cooldown.duration = Duration::ZERO;
        tracing::debug!("cooldown ended");
        self.emit(ActiveListEventKind::CooldownEnded);
    }
}
