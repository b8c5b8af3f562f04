//! Events emitted by an active list.
//!
//! Every change to a list is reported as one [`ActiveListEvent`]: a
//! timestamp plus an [`ActiveListEventKind`] carrying the indexes and values
//! involved. Indexes are positions at the moment the event is emitted.
//!
//! # Invariants
//!
//! 1. Exactly one event per observable change; no-op calls emit nothing.
//! 2. Batch operations emit a single `*Multiple` event, never one per item.
//! 3. `Initialized` is the only event that can appear at the head of a
//!    freshly reset history.

use core::fmt;
use std::time::Duration;

/// Discriminant of [`ActiveListEventKind`], used for dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ActiveListEventType {
    Initialized,
    Activated,
    ActivatedMultiple,
    Deactivated,
    DeactivatedMultiple,
    Inserted,
    Removed,
    RemovedMultiple,
    Swapped,
    Moved,
    AutoPlayPlaying,
    AutoPlayPaused,
    AutoPlayStopped,
    CooldownStarted,
    CooldownEnded,
}

impl ActiveListEventType {
    /// All event types, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Initialized,
        Self::Activated,
        Self::ActivatedMultiple,
        Self::Deactivated,
        Self::DeactivatedMultiple,
        Self::Inserted,
        Self::Removed,
        Self::RemovedMultiple,
        Self::Swapped,
        Self::Moved,
        Self::AutoPlayPlaying,
        Self::AutoPlayPaused,
        Self::AutoPlayStopped,
        Self::CooldownStarted,
        Self::CooldownEnded,
    ];

    /// Stable upper-case name, e.g. `"ACTIVATED_MULTIPLE"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialized => "INITIALIZED",
            Self::Activated => "ACTIVATED",
            Self::ActivatedMultiple => "ACTIVATED_MULTIPLE",
            Self::Deactivated => "DEACTIVATED",
            Self::DeactivatedMultiple => "DEACTIVATED_MULTIPLE",
            Self::Inserted => "INSERTED",
            Self::Removed => "REMOVED",
            Self::RemovedMultiple => "REMOVED_MULTIPLE",
            Self::Swapped => "SWAPPED",
            Self::Moved => "MOVED",
            Self::AutoPlayPlaying => "AUTO_PLAY_PLAYING",
            Self::AutoPlayPaused => "AUTO_PLAY_PAUSED",
            Self::AutoPlayStopped => "AUTO_PLAY_STOPPED",
            Self::CooldownStarted => "COOLDOWN_STARTED",
            Self::CooldownEnded => "COOLDOWN_ENDED",
        }
    }
}

impl fmt::Display for ActiveListEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an [`ActiveListEvent`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ActiveListEventKind<T> {
    /// The list was (re)initialized; carries the initial active set.
    Initialized { indexes: Vec<usize>, values: Vec<T> },
    /// One item became active, possibly evicting another.
    Activated {
        index: usize,
        value: T,
        deactivated_index: Option<usize>,
        deactivated_value: Option<T>,
    },
    /// A predicate batch activated items, possibly evicting others.
    ActivatedMultiple {
        indexes: Vec<usize>,
        values: Vec<T>,
        deactivated_indexes: Vec<usize>,
        deactivated_values: Vec<T>,
    },
    Deactivated { index: usize, value: T },
    DeactivatedMultiple { indexes: Vec<usize>, values: Vec<T> },
    Inserted { index: usize, value: T },
    Removed { index: usize, value: T },
    /// Removed items in positional order, indexes as they were before removal.
    RemovedMultiple { indexes: Vec<usize>, values: Vec<T> },
    /// `value_a` was at `a` before the swap and is now at `b`.
    Swapped {
        a: usize,
        b: usize,
        value_a: T,
        value_b: T,
    },
    Moved { from: usize, to: usize, value: T },
    AutoPlayPlaying,
    AutoPlayPaused,
    AutoPlayStopped,
    CooldownStarted,
    CooldownEnded,
}

impl<T> ActiveListEventKind<T> {
    /// Discriminant of this payload.
    #[must_use]
    pub const fn event_type(&self) -> ActiveListEventType {
        match self {
            Self::Initialized { .. } => ActiveListEventType::Initialized,
            Self::Activated { .. } => ActiveListEventType::Activated,
            Self::ActivatedMultiple { .. } => ActiveListEventType::ActivatedMultiple,
            Self::Deactivated { .. } => ActiveListEventType::Deactivated,
            Self::DeactivatedMultiple { .. } => ActiveListEventType::DeactivatedMultiple,
            Self::Inserted { .. } => ActiveListEventType::Inserted,
            Self::Removed { .. } => ActiveListEventType::Removed,
            Self::RemovedMultiple { .. } => ActiveListEventType::RemovedMultiple,
            Self::Swapped { .. } => ActiveListEventType::Swapped,
            Self::Moved { .. } => ActiveListEventType::Moved,
            Self::AutoPlayPlaying => ActiveListEventType::AutoPlayPlaying,
            Self::AutoPlayPaused => ActiveListEventType::AutoPlayPaused,
            Self::AutoPlayStopped => ActiveListEventType::AutoPlayStopped,
            Self::CooldownStarted => ActiveListEventType::CooldownStarted,
            Self::CooldownEnded => ActiveListEventType::CooldownEnded,
        }
    }
}

/// A timestamped change notification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveListEvent<T> {
    /// Logical clock reading when the event was emitted.
    pub time: Duration,
    pub kind: ActiveListEventKind<T>,
}

impl<T> ActiveListEvent<T> {
    #[must_use]
    pub const fn new(kind: ActiveListEventKind<T>, time: Duration) -> Self {
        Self { time, kind }
    }

    #[must_use]
    pub const fn event_type(&self) -> ActiveListEventType {
        self.kind.event_type()
    }
}
