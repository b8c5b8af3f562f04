//! The [`ActiveList`] aggregate: storage, lifecycle, queries, dispatch.
//!
//! Operations live in sibling modules (`activation`, `structure`,
//! `cooldown`, `autoplay`) as further `impl` blocks on the same type; this
//! module owns the state they share.
//!
//! # Invariants
//!
//! 1. `contents[i].index() == i` whenever control leaves the list (events
//!    included).
//! 2. Every id in the activation order belongs to a current content and
//!    appears once.
//! 3. The activation order never holds more ids than a numeric limit.
//! 4. An event is appended to history before any subscriber sees it.
//!
//! # Emission order
//!
//! For a single call: state mutation, then event construction, then history
//! append, then subscriber notification. Several effects of one call (an
//! autoplay stop, the change itself, a cooldown start) are emitted as
//! separate events in that order, each with the list fully consistent.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use activekit_core::{
    ActiveListError, ActiveListEvent, ActiveListEventKind, Clock, Direction, DirectionLabels,
    Result, SystemClock,
};
use activekit_runtime::{EventBus, HistoryRing, SubscriberId};
use ahash::AHashSet;

use crate::autoplay::{AutoPlay, AutoPlayState};
use crate::config::{ActiveListConfig, InitialActive, LimitBehavior};
use crate::content::{Content, ContentContext, ContentId, ContentMut};
use crate::cooldown::Cooldown;

/// Callback notified of every event.
///
/// Subscribers receive the list itself and may call back into it; events
/// raised by such nested calls are delivered before the outer dispatch
/// continues.
pub type Subscriber<T> = dyn Fn(&mut ActiveList<T>, &ActiveListEvent<T>);

/// Ordered collection with an activation state per item.
///
/// ```
/// use activekit::{ActionOptions, ActiveList, ActiveListConfig};
///
/// let mut tabs = ActiveList::new(
///     ActiveListConfig::new(["home", "profile", "settings"]).with_active_indexes([0]),
/// )?;
/// tabs.activate_next(ActionOptions::default())?;
/// assert_eq!(tabs.active(), vec!["profile"]);
/// assert_eq!(tabs.direction(), "right");
/// # Ok::<(), activekit::ActiveListError>(())
/// ```
pub struct ActiveList<T> {
    pub(crate) contents: Vec<Content<T>>,
    pub(crate) activation_order: Vec<ContentId>,
    next_id: u64,
    pub(crate) last_activated: Option<ContentId>,
    pub(crate) last_deactivated: Option<ContentId>,
    pub(crate) is_circular: bool,
    pub(crate) max_activation_limit: Option<usize>,
    pub(crate) limit_behavior: LimitBehavior,
    labels: DirectionLabels,
    pub(crate) direction: Direction,
    pub(crate) has_active_changed_at_least_once: bool,
    pub(crate) cooldown: Cooldown<T>,
    pub(crate) auto_play: AutoPlay<T>,
    history: HistoryRing<ActiveListEvent<T>>,
    bus: EventBus<Subscriber<T>>,
    clock: Rc<dyn Clock>,
    /// Deadline of the timer being fired; stands in for `clock.now()` so a
    /// late pump still sees each tick at its nominal time.
    firing_at: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
enum DueTimer {
    Cooldown,
    AutoPlay,
}

impl<T: Clone + PartialEq> ActiveList<T> {
    /// Create a list on the system clock.
    pub fn new(config: ActiveListConfig<T>) -> Result<Self> {
        Self::from_parts(config, Rc::new(SystemClock::new()), None)
    }

    /// Create a list whose timers run on `clock`.
    pub fn with_clock(config: ActiveListConfig<T>, clock: impl Clock + 'static) -> Result<Self> {
        Self::from_parts(config, Rc::new(clock), None)
    }

    /// Create a list with a subscriber that also sees the `Initialized`
    /// event.
    pub fn with_subscriber(
        config: ActiveListConfig<T>,
        subscriber: impl Fn(&mut ActiveList<T>, &ActiveListEvent<T>) + 'static,
    ) -> Result<Self> {
        Self::from_parts(config, Rc::new(SystemClock::new()), Some(Rc::new(subscriber)))
    }

    pub fn from_parts(
        config: ActiveListConfig<T>,
        clock: Rc<dyn Clock>,
        subscriber: Option<Rc<Subscriber<T>>>,
    ) -> Result<Self> {
        let mut list = Self {
            contents: Vec::new(),
            activation_order: Vec::new(),
            next_id: 1,
            last_activated: None,
            last_deactivated: None,
            is_circular: false,
            max_activation_limit: Some(1),
            limit_behavior: LimitBehavior::Circular,
            labels: DirectionLabels::default(),
            direction: Direction::Next,
            has_active_changed_at_least_once: false,
            cooldown: Cooldown::new(),
            auto_play: AutoPlay::new(),
            history: HistoryRing::new(0),
            bus: EventBus::new(),
            clock,
            firing_at: None,
        };
        if let Some(subscriber) = subscriber {
            list.bus.subscribe(subscriber);
        }
        list.initialize(config)?;
        Ok(list)
    }

    /// Reset the list to `config`.
    ///
    /// Pending timers are cancelled; history, cooldown, autoplay, and the
    /// activation state are rebuilt from the new configuration and a single
    /// `Initialized` event is emitted. Subscribers are kept.
    ///
    /// Bad initial indexes or values, and an initial active set too large
    /// for the `Error` limit behavior, fail before anything changes. An
    /// autoplay duration function yielding zero fails after the
    /// `Initialized` event, leaving autoplay stopped.
    pub fn initialize(&mut self, config: ActiveListConfig<T>) -> Result<()> {
        const METHOD: &str = "initialize";
        let ActiveListConfig {
            contents,
            active,
            is_circular,
            max_activation_limit,
            max_activation_limit_behavior,
            keep_history_for,
            cooldown,
            auto_play,
            directions,
        } = config;

        let len = contents.len();
        let mut initial: Vec<usize> = match active {
            InitialActive::None => Vec::new(),
            InitialActive::Indexes(indexes) => {
                if let Some(&index) = indexes.iter().find(|&&i| i >= len) {
                    return Err(ActiveListError::IndexOutOfBounds {
                        method: METHOD,
                        param: "index",
                        index,
                        len,
                    });
                }
                indexes
            }
            InitialActive::Values(values) => values
                .iter()
                .map(|value| {
                    contents
                        .iter()
                        .position(|c| c == value)
                        .ok_or(ActiveListError::ItemNotFound { method: METHOD })
                })
                .collect::<Result<_>>()?,
        };
        let mut seen = AHashSet::with_capacity(initial.len());
        initial.retain(|index| seen.insert(*index));

        if let (Some(limit), LimitBehavior::Error) =
            (max_activation_limit, max_activation_limit_behavior)
        {
            if initial.len() > limit {
                return Err(ActiveListError::ActivationLimitReached {
                    method: METHOD,
                    limit,
                });
            }
        }
        if cooldown.as_ref().and_then(|c| c.fixed()) == Some(Duration::ZERO) {
            return Err(ActiveListError::CooldownDuration { method: METHOD });
        }
        if auto_play.as_ref().and_then(|a| a.duration.fixed()) == Some(Duration::ZERO) {
            return Err(ActiveListError::AutoPlayDuration { method: METHOD });
        }

        self.cooldown.reset(cooldown);
        self.auto_play.reset();

        let mut fresh = Vec::with_capacity(len);
        for value in contents {
            fresh.push(Content::new(self.allocate_id(), value));
        }
        self.contents = fresh;
        self.activation_order.clear();
        self.last_activated = None;
        self.last_deactivated = None;
        self.is_circular = is_circular;
        self.max_activation_limit = max_activation_limit;
        self.limit_behavior = max_activation_limit_behavior;
        self.labels = directions;
        self.direction = Direction::Next;
        self.has_active_changed_at_least_once = false;
        self.history.reset(keep_history_for);

        for index in initial {
            let id = self.contents[index].id;
            if let Some(limit) = self.max_activation_limit {
                if self.activation_order.len() >= limit {
                    match self.limit_behavior {
                        LimitBehavior::Circular if limit > 0 => {
                            self.activation_order.remove(0);
                        }
                        _ => continue,
                    }
                }
            }
            self.activation_order.push(id);
        }
        self.last_activated = self.activation_order.last().copied();

        let mut deferred = None;
        if let Some(auto_play) = auto_play {
            let duration = self.resolve_duration(&auto_play.duration);
            self.auto_play.config = Some(auto_play);
            match duration {
                Some(d) if d.is_zero() => {
                    deferred = Some(ActiveListError::AutoPlayDuration { method: METHOD });
                }
                duration => {
                    self.auto_play.state = AutoPlayState::Playing;
                    if let Some(d) = duration {
                        self.auto_play.duration = d;
                        self.auto_play.timer.schedule(self.now(), d);
                    }
                }
            }
        }

        tracing::debug!(
            contents = self.contents.len(),
            active = self.activation_order.len(),
            auto_play = ?self.auto_play.state,
            "initialized"
        );

        self.resync();
        let (indexes, values) = self.payload_for(&self.activation_order.clone());
        self.emit(ActiveListEventKind::Initialized { indexes, values });

        deferred.map_or(Ok(()), Err)
    }

    // --- Subscriptions ---

    /// Register a subscriber; returns the handle to unsubscribe it.
    pub fn subscribe(
        &mut self,
        subscriber: impl Fn(&mut ActiveList<T>, &ActiveListEvent<T>) + 'static,
    ) -> SubscriberId {
        self.bus.subscribe(Rc::new(subscriber))
    }

    /// Register a shared subscriber, which can later be removed by
    /// reference with [`unsubscribe_rc`](Self::unsubscribe_rc).
    pub fn subscribe_rc(&mut self, subscriber: Rc<Subscriber<T>>) -> SubscriberId {
        self.bus.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn unsubscribe_rc(&mut self, subscriber: &Rc<Subscriber<T>>) -> bool {
        self.bus.unsubscribe_rc(subscriber)
    }

    pub fn unsubscribe_all(&mut self) {
        self.bus.clear();
    }

    // --- Queries ---

    #[must_use]
    pub fn contents(&self) -> &[Content<T>] {
        &self.contents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Content<T>> {
        self.contents.get(index)
    }

    /// Mutable per-content handle for the content at `index`.
    pub fn content_mut(&mut self, index: usize) -> Option<ContentMut<'_, T>> {
        let id = self.contents.get(index)?.id;
        Some(ContentMut { list: self, id })
    }

    #[must_use]
    pub fn content_by_id(&self, id: ContentId) -> Option<&Content<T>> {
        self.contents.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn index_of_id(&self, id: ContentId) -> Option<usize> {
        self.contents.iter().position(|c| c.id == id)
    }

    /// Position of the first content equal to `item`.
    #[must_use]
    pub fn get_index(&self, item: &T) -> Option<usize> {
        self.contents.iter().position(|c| c.value == *item)
    }

    /// Active positions in activation order.
    #[must_use]
    pub fn active_indexes(&self) -> Vec<usize> {
        self.activation_order
            .iter()
            .filter_map(|id| self.index_of_id(*id))
            .collect()
    }

    /// Active values in activation order.
    #[must_use]
    pub fn active(&self) -> Vec<T> {
        self.active_contents()
            .into_iter()
            .map(|c| c.value.clone())
            .collect()
    }

    /// Active contents in activation order.
    #[must_use]
    pub fn active_contents(&self) -> Vec<&Content<T>> {
        self.activation_order
            .iter()
            .filter_map(|id| self.content_by_id(*id))
            .collect()
    }

    #[must_use]
    pub fn last_activated_index(&self) -> Option<usize> {
        self.last_activated.and_then(|id| self.index_of_id(id))
    }

    #[must_use]
    pub fn last_activated_content(&self) -> Option<&Content<T>> {
        self.last_activated.and_then(|id| self.content_by_id(id))
    }

    #[must_use]
    pub fn last_activated_value(&self) -> Option<&T> {
        self.last_activated_content().map(Content::value)
    }

    #[must_use]
    pub fn last_deactivated_index(&self) -> Option<usize> {
        self.last_deactivated.and_then(|id| self.index_of_id(id))
    }

    #[must_use]
    pub fn last_deactivated_content(&self) -> Option<&Content<T>> {
        self.last_deactivated.and_then(|id| self.content_by_id(id))
    }

    #[must_use]
    pub fn last_deactivated_value(&self) -> Option<&T> {
        self.last_deactivated_content().map(Content::value)
    }

    #[must_use]
    pub const fn is_circular(&self) -> bool {
        self.is_circular
    }

    /// `None` means unlimited.
    #[must_use]
    pub const fn max_activation_limit(&self) -> Option<usize> {
        self.max_activation_limit
    }

    #[must_use]
    pub const fn max_activation_limit_behavior(&self) -> LimitBehavior {
        self.limit_behavior
    }

    /// Label of the direction of the last activation.
    #[must_use]
    pub fn direction(&self) -> &str {
        self.labels.label(self.direction)
    }

    #[must_use]
    pub fn opposite_direction(&self) -> &str {
        self.labels.label(self.direction.opposite())
    }

    #[must_use]
    pub const fn direction_kind(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn direction_labels(&self) -> &DirectionLabels {
        &self.labels
    }

    #[must_use]
    pub const fn has_active_changed_at_least_once(&self) -> bool {
        self.has_active_changed_at_least_once
    }

    /// Recorded events, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &ActiveListEvent<T>> + ExactSizeIterator {
        self.history.iter()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.firing_at.unwrap_or_else(|| self.clock.now())
    }

    // --- Timers ---

    /// Fire every autoplay tick and cooldown expiry due at `clock.now()`.
    ///
    /// Timers fire in deadline order (cooldown first on ties), each one
    /// observing its own deadline as the current time. Hosts call this from
    /// their event loop, using [`next_deadline`](Self::next_deadline) to
    /// decide when to wake up.
    pub fn poll_timers(&mut self) -> Result<()> {
        let outer = self.firing_at;
        let result = self.fire_due_timers();
        self.firing_at = outer;
        result
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.cooldown.timer.deadline(), self.auto_play.timer.deadline()) {
            (Some(c), Some(a)) => Some(c.min(a)),
            (c, a) => c.or(a),
        }
    }

    fn fire_due_timers(&mut self) -> Result<()> {
        let now = self.clock.now();
        loop {
            let due = match (
                self.cooldown.timer.due_at(now),
                self.auto_play.timer.due_at(now),
            ) {
                (None, None) => return Ok(()),
                (Some(c), Some(a)) if c > a => DueTimer::AutoPlay,
                (Some(_), _) => DueTimer::Cooldown,
                (None, Some(_)) => DueTimer::AutoPlay,
            };
            match due {
                DueTimer::Cooldown => {
                    if let Some(at) = self.cooldown.timer.take_due(now) {
                        tracing::trace!(?due, ?at, ?now, "timer fired");
                        self.firing_at = Some(at);
                        self.end_cooldown();
                    }
                }
                DueTimer::AutoPlay => {
                    if let Some(at) = self.auto_play.timer.take_due(now) {
                        tracing::trace!(?due, ?at, ?now, "timer fired");
                        self.firing_at = Some(at);
                        self.auto_play_tick()?;
                    }
                }
            }
        }
    }

    // --- Internals shared by the operation modules ---

    fn allocate_id(&mut self) -> ContentId {
        let id = ContentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn new_content(&mut self, value: T) -> Content<T> {
        let id = self.allocate_id();
        Content::new(id, value)
    }

    pub(crate) fn check_index(
        &self,
        method: &'static str,
        param: &'static str,
        index: usize,
    ) -> Result<()> {
        if index < self.contents.len() {
            Ok(())
        } else {
            Err(ActiveListError::IndexOutOfBounds {
                method,
                param,
                index,
                len: self.contents.len(),
            })
        }
    }

    pub(crate) fn find_value(&self, method: &'static str, item: &T) -> Result<usize> {
        self.get_index(item)
            .ok_or(ActiveListError::ItemNotFound { method })
    }

    pub(crate) fn is_id_active(&self, id: ContentId) -> bool {
        self.activation_order.contains(&id)
    }

    pub(crate) fn context(&self, index: usize) -> ContentContext<'_, T> {
        let content = &self.contents[index];
        ContentContext {
            index,
            value: &content.value,
            content,
            list: self,
        }
    }

    /// Ids of contents matching `predicate`, in positional order.
    pub(crate) fn matching_ids(
        &self,
        predicate: &mut impl FnMut(&ContentContext<'_, T>) -> bool,
    ) -> Vec<ContentId> {
        (0..self.contents.len())
            .filter(|&index| predicate(&self.context(index)))
            .map(|index| self.contents[index].id)
            .collect()
    }

    /// Current indexes and values of `ids`; ids no longer present are skipped.
    pub(crate) fn payload_for(&self, ids: &[ContentId]) -> (Vec<usize>, Vec<T>) {
        ids.iter()
            .filter_map(|id| {
                self.index_of_id(*id)
                    .map(|index| (index, self.contents[index].value.clone()))
            })
            .unzip()
    }

    /// Refresh positions and derived flags of every content.
    pub(crate) fn resync(&mut self) {
        let active: AHashSet<ContentId> = self.activation_order.iter().copied().collect();
        let last = self.last_activated_index();
        let len = self.contents.len();
        let circular = self.is_circular;

        for (index, content) in self.contents.iter_mut().enumerate() {
            content.index = index;
            content.is_active = active.contains(&content.id);
            content.has_been_active_before |= content.is_active;
            content.is_first = index == 0;
            content.is_last = index + 1 == len;
            content.has_next = circular || index + 1 < len;
            content.has_previous = circular || index > 0;
            (content.is_next, content.is_previous) = match last {
                None => (false, false),
                Some(last) if circular => (
                    (last + 1) % len == index,
                    (last + len - 1) % len == index,
                ),
                Some(last) => (last + 1 == index, last.checked_sub(1) == Some(index)),
            };
        }
    }

    /// Record `kind` and notify subscribers.
    pub(crate) fn emit(&mut self, kind: ActiveListEventKind<T>) {
        self.resync();
        let event = ActiveListEvent::new(kind, self.now());
        tracing::trace!(
            event = %event.event_type(),
            subscribers = self.bus.len(),
            "emit"
        );
        if self.history.is_enabled() {
            self.history.push(event.clone());
        }
        for subscriber in self.bus.snapshot() {
            subscriber(self, &event);
        }
    }

    pub(crate) fn resolve_duration(
        &self,
        source: &crate::config::DurationSource<T>,
    ) -> Option<Duration> {
        if let Some(fixed) = source.fixed() {
            return Some(fixed);
        }
        let index = self.last_activated_index().or_else(|| {
            if self.contents.is_empty() {
                None
            } else {
                Some(0)
            }
        })?;
        Some(source.resolve(&self.context(index)))
    }
}

impl<T: fmt::Debug> fmt::Debug for ActiveList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveList")
            .field("contents", &self.contents)
            .field("activation_order", &self.activation_order)
            .field("is_circular", &self.is_circular)
            .field("max_activation_limit", &self.max_activation_limit)
            .field("limit_behavior", &self.limit_behavior)
            .field("direction", &self.direction)
            .field("auto_play", &self.auto_play.state)
            .field("cooldown_active", &self.cooldown.is_active)
            .field("history", &self.history.len())
            .field("subscribers", &self.bus.len())
            .finish()
    }
}
