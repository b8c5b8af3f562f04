//! Configuration for [`ActiveList`](crate::ActiveList) and per-call options.
//!
//! Durations for cooldowns and autoplay are either fixed or computed from
//! the content they apply to, see [`DurationSource`].

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use activekit_core::DirectionLabels;

use crate::content::ContentContext;

/// What happens when an activation would exceed the activation limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LimitBehavior {
    /// Deactivate the item that has been active the longest (FIFO).
    #[default]
    Circular,
    /// Drop the activation without any change or event.
    Ignore,
    /// Fail with [`ActiveListError::ActivationLimitReached`](activekit_core::ActiveListError).
    Error,
}

/// Function form of a [`DurationSource`].
pub type DurationFn<T> = dyn Fn(&ContentContext<'_, T>) -> Duration;

/// A fixed duration or one computed from the content it applies to.
pub enum DurationSource<T> {
    Fixed(Duration),
    Computed(Rc<DurationFn<T>>),
}

impl<T> DurationSource<T> {
    /// Wrap a function of the acting content.
    pub fn computed(f: impl Fn(&ContentContext<'_, T>) -> Duration + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Evaluate against `ctx`.
    #[must_use]
    pub fn resolve(&self, ctx: &ContentContext<'_, T>) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Computed(f) => f(ctx),
        }
    }

    /// The duration if it does not depend on content.
    #[must_use]
    pub const fn fixed(&self) -> Option<Duration> {
        match self {
            Self::Fixed(d) => Some(*d),
            Self::Computed(_) => None,
        }
    }
}

impl<T> Clone for DurationSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(d) => Self::Fixed(*d),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T> From<Duration> for DurationSource<T> {
    fn from(d: Duration) -> Self {
        Self::Fixed(d)
    }
}

impl<T> fmt::Debug for DurationSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Autoplay settings.
pub struct AutoPlayConfig<T> {
    /// Time each item stays active before the next one is activated.
    pub duration: DurationSource<T>,
    /// Stop autoplay on manual interaction instead of restarting the
    /// pending interval.
    pub stops_on_user_interaction: bool,
}

impl<T> AutoPlayConfig<T> {
    #[must_use]
    pub fn new(duration: impl Into<DurationSource<T>>) -> Self {
        Self {
            duration: duration.into(),
            stops_on_user_interaction: false,
        }
    }

    #[must_use]
    pub fn stops_on_user_interaction(mut self, stops: bool) -> Self {
        self.stops_on_user_interaction = stops;
        self
    }
}

impl<T> Clone for AutoPlayConfig<T> {
    fn clone(&self) -> Self {
        Self {
            duration: self.duration.clone(),
            stops_on_user_interaction: self.stops_on_user_interaction,
        }
    }
}

impl<T> fmt::Debug for AutoPlayConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoPlayConfig")
            .field("duration", &self.duration)
            .field("stops_on_user_interaction", &self.stops_on_user_interaction)
            .finish()
    }
}

/// Items active right after initialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InitialActive<T> {
    #[default]
    None,
    /// Activate by position, in the given order.
    Indexes(Vec<usize>),
    /// Activate the first content equal to each value, in the given order.
    Values(Vec<T>),
}

/// Full configuration of an [`ActiveList`](crate::ActiveList).
///
/// ```
/// use activekit::{ActiveListConfig, LimitBehavior};
///
/// let config = ActiveListConfig::new(vec!["a", "b", "c"])
///     .with_active_indexes([0])
///     .circular(true)
///     .with_max_activation_limit(Some(2))
///     .with_limit_behavior(LimitBehavior::Ignore)
///     .with_history(50);
/// assert_eq!(config.contents.len(), 3);
/// ```
pub struct ActiveListConfig<T> {
    pub contents: Vec<T>,
    pub active: InitialActive<T>,
    pub is_circular: bool,
    /// `None` means unlimited.
    pub max_activation_limit: Option<usize>,
    pub max_activation_limit_behavior: LimitBehavior,
    /// Number of events kept in history; zero disables recording.
    pub keep_history_for: usize,
    /// Default cooldown for activation calls without their own.
    pub cooldown: Option<DurationSource<T>>,
    pub auto_play: Option<AutoPlayConfig<T>>,
    pub directions: DirectionLabels,
}

impl<T> Default for ActiveListConfig<T> {
    fn default() -> Self {
        Self {
            contents: Vec::new(),
            active: InitialActive::None,
            is_circular: false,
            max_activation_limit: Some(1),
            max_activation_limit_behavior: LimitBehavior::Circular,
            keep_history_for: 0,
            cooldown: None,
            auto_play: None,
            directions: DirectionLabels::default(),
        }
    }
}

impl<T> ActiveListConfig<T> {
    /// Configuration with `contents` and defaults for everything else.
    #[must_use]
    pub fn new(contents: impl IntoIterator<Item = T>) -> Self {
        Self {
            contents: contents.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_active_indexes(mut self, indexes: impl IntoIterator<Item = usize>) -> Self {
        self.active = InitialActive::Indexes(indexes.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_active(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.active = InitialActive::Values(values.into_iter().collect());
        self
    }

    #[must_use]
    pub fn circular(mut self, is_circular: bool) -> Self {
        self.is_circular = is_circular;
        self
    }

    #[must_use]
    pub fn with_max_activation_limit(mut self, limit: Option<usize>) -> Self {
        self.max_activation_limit = limit;
        self
    }

    #[must_use]
    pub fn with_limit_behavior(mut self, behavior: LimitBehavior) -> Self {
        self.max_activation_limit_behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_history(mut self, keep: usize) -> Self {
        self.keep_history_for = keep;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: impl Into<DurationSource<T>>) -> Self {
        self.cooldown = Some(cooldown.into());
        self
    }

    #[must_use]
    pub fn with_auto_play(mut self, auto_play: AutoPlayConfig<T>) -> Self {
        self.auto_play = Some(auto_play);
        self
    }

    #[must_use]
    pub fn with_directions(mut self, directions: DirectionLabels) -> Self {
        self.directions = directions;
        self
    }
}

impl<T: Clone> Clone for ActiveListConfig<T> {
    fn clone(&self) -> Self {
        Self {
            contents: self.contents.clone(),
            active: self.active.clone(),
            is_circular: self.is_circular,
            max_activation_limit: self.max_activation_limit,
            max_activation_limit_behavior: self.max_activation_limit_behavior,
            keep_history_for: self.keep_history_for,
            cooldown: self.cooldown.clone(),
            auto_play: self.auto_play.clone(),
            directions: self.directions.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ActiveListConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveListConfig")
            .field("contents", &self.contents)
            .field("active", &self.active)
            .field("is_circular", &self.is_circular)
            .field("max_activation_limit", &self.max_activation_limit)
            .field(
                "max_activation_limit_behavior",
                &self.max_activation_limit_behavior,
            )
            .field("keep_history_for", &self.keep_history_for)
            .field("cooldown", &self.cooldown)
            .field("auto_play", &self.auto_play)
            .field("directions", &self.directions)
            .finish()
    }
}

/// Options accepted by activation, deactivation, and toggle calls.
pub struct ActionOptions<T> {
    /// Whether the call comes from the user. Defaults to `true`.
    ///
    /// User calls are dropped during a cooldown, start cooldowns, and
    /// interrupt autoplay. Automatic calls bypass all three.
    pub is_user_interaction: bool,
    /// Cooldown for this call, taking precedence over the configured one.
    pub cooldown: Option<DurationSource<T>>,
}

impl<T> Default for ActionOptions<T> {
    fn default() -> Self {
        Self {
            is_user_interaction: true,
            cooldown: None,
        }
    }
}

impl<T> Clone for ActionOptions<T> {
    fn clone(&self) -> Self {
        Self {
            is_user_interaction: self.is_user_interaction,
            cooldown: self.cooldown.clone(),
        }
    }
}

impl<T> fmt::Debug for ActionOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionOptions")
            .field("is_user_interaction", &self.is_user_interaction)
            .field("cooldown", &self.cooldown)
            .finish()
    }
}

impl<T> ActionOptions<T> {
    /// A user interaction with no cooldown override.
    #[must_use]
    pub fn user() -> Self {
        Self::default()
    }

    /// A programmatic call that bypasses cooldowns and autoplay
    /// interruption.
    #[must_use]
    pub fn automatic() -> Self {
        Self {
            is_user_interaction: false,
            cooldown: None,
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: impl Into<DurationSource<T>>) -> Self {
        self.cooldown = Some(cooldown.into());
        self
    }
}

/// Where an item lands relative to a predicate match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Take the match's position.
    #[default]
    At,
    /// Directly before the match.
    Before,
    /// Directly after the match.
    After,
}
