//! Activation, deactivation, and toggling.
//!
//! # Invariants
//!
//! 1. Activating an active item or deactivating an inactive one is a no-op:
//!    no event, no cooldown, no autoplay side effect.
//! 2. Under [`LimitBehavior::Circular`] the longest-active item is evicted
//!    first, and the eviction is reported inside the same `Activated` /
//!    `ActivatedMultiple` event.
//! 3. User calls made while a cooldown is active are dropped silently.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Index past the end | [`ActiveListError::IndexOutOfBounds`], nothing changes |
//! | Value not in the list | [`ActiveListError::ItemNotFound`], nothing changes |
//! | Limit reached with [`LimitBehavior::Error`] | [`ActiveListError::ActivationLimitReached`]; predicate batches keep the part that fit |
//! | Cooldown duration resolves to zero | [`ActiveListError::CooldownDuration`] after the change was emitted |

use activekit_core::{ActiveListError, ActiveListEventKind, Direction, Result, direction_towards};

use crate::config::{ActionOptions, LimitBehavior};
use crate::content::{ContentContext, ContentId};
use crate::list::ActiveList;

/// Outcome of fitting a batch of candidates under the activation limit.
#[derive(Debug, Default)]
struct BatchPlan {
    order: Vec<ContentId>,
    added: Vec<ContentId>,
    evicted: Vec<ContentId>,
    limit_hit: bool,
}

impl BatchPlan {
    fn is_noop(&self) -> bool {
        self.added.is_empty() && self.evicted.is_empty()
    }
}

impl<T: Clone + PartialEq> ActiveList<T> {
    pub fn activate_by_index(&mut self, index: usize, opts: ActionOptions<T>) -> Result<()> {
        self.activate_at("activate_by_index", index, opts)
    }

    /// Activate the first content equal to `item`.
    pub fn activate(&mut self, item: &T, opts: ActionOptions<T>) -> Result<()> {
        let index = self.find_value("activate", item)?;
        self.activate_at("activate", index, opts)
    }

    /// Activate the item after the last activated one.
    ///
    /// Activates the first item when nothing was activated yet; does nothing
    /// at the end of a non-circular list.
    pub fn activate_next(&mut self, opts: ActionOptions<T>) -> Result<()> {
        match self.step_target(Direction::Next) {
            Some(index) => self.activate_at("activate_next", index, opts),
            None => Ok(()),
        }
    }

    /// Mirror of [`activate_next`](Self::activate_next).
    pub fn activate_previous(&mut self, opts: ActionOptions<T>) -> Result<()> {
        match self.step_target(Direction::Previous) {
            Some(index) => self.activate_at("activate_previous", index, opts),
            None => Ok(()),
        }
    }

    pub fn activate_first(&mut self, opts: ActionOptions<T>) -> Result<()> {
        self.activate_at("activate_first", 0, opts)
    }

    pub fn activate_last(&mut self, opts: ActionOptions<T>) -> Result<()> {
        let last = self.contents.len().saturating_sub(1);
        self.activate_at("activate_last", last, opts)
    }

    /// Activate every inactive content matching `predicate`, in positional
    /// order, as one `ActivatedMultiple` event.
    pub fn activate_by_predicate(
        &mut self,
        mut predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        opts: ActionOptions<T>,
    ) -> Result<()> {
        const METHOD: &str = "activate_by_predicate";
        let matches = self.matching_ids(&mut predicate);

        if self.inactive_candidates(&matches).is_empty() || self.is_cooling_down_for(&opts) {
            return Ok(());
        }
        let plan = self.plan_batch_activation(&self.inactive_candidates(&matches));
        if plan.is_noop() {
            return self.limit_result(METHOD, plan.limit_hit);
        }

        self.auto_play_on_user_interaction(&opts);

        // Replan in case a subscriber changed the list while autoplay stopped.
        let plan = self.plan_batch_activation(&self.inactive_candidates(&matches));
        if plan.is_noop() {
            return self.limit_result(METHOD, plan.limit_hit);
        }

        let len = self.contents.len();
        let mut last = self.last_activated_index();
        for id in &plan.added {
            if let Some(index) = self.index_of_id(*id) {
                self.direction = direction_towards(last, index, len, self.is_circular);
                last = Some(index);
            }
        }

        let (deactivated_indexes, deactivated_values) = self.payload_for(&plan.evicted);
        let (indexes, values) = self.payload_for(&plan.added);

        self.activation_order = plan.order;
        if let Some(&id) = plan.added.last() {
            self.last_activated = Some(id);
        }
        if let Some(&id) = plan.evicted.last() {
            self.last_deactivated = Some(id);
        }
        self.has_active_changed_at_least_once = true;

        tracing::debug!(
            method = METHOD,
            ?indexes,
            ?deactivated_indexes,
            limit_hit = plan.limit_hit,
            "activated multiple"
        );
        self.emit(ActiveListEventKind::ActivatedMultiple {
            indexes,
            values,
            deactivated_indexes,
            deactivated_values,
        });

        self.limit_result(METHOD, plan.limit_hit)?;
        match plan.added.last() {
            Some(&id) => self.start_cooldown(METHOD, &opts, id),
            None => Ok(()),
        }
    }

    pub fn deactivate_by_index(&mut self, index: usize, opts: ActionOptions<T>) -> Result<()> {
        self.deactivate_at("deactivate_by_index", index, opts)
    }

    /// Deactivate the first content equal to `item`.
    pub fn deactivate(&mut self, item: &T, opts: ActionOptions<T>) -> Result<()> {
        let index = self.find_value("deactivate", item)?;
        self.deactivate_at("deactivate", index, opts)
    }

    /// Deactivate every active content matching `predicate` as one
    /// `DeactivatedMultiple` event.
    pub fn deactivate_by_predicate(
        &mut self,
        mut predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        opts: ActionOptions<T>,
    ) -> Result<()> {
        const METHOD: &str = "deactivate_by_predicate";
        let matches = self.matching_ids(&mut predicate);
        if !matches.iter().any(|id| self.is_id_active(*id)) || self.is_cooling_down_for(&opts) {
            return Ok(());
        }

        self.auto_play_on_user_interaction(&opts);

        let targets: Vec<ContentId> = matches
            .into_iter()
            .filter(|id| self.is_id_active(*id))
            .collect();
        let Some(&cooldown_id) = targets.last() else {
            return Ok(());
        };

        self.activation_order.retain(|id| !targets.contains(id));
        self.last_deactivated = Some(cooldown_id);
        if self.last_activated.is_some_and(|id| targets.contains(&id)) {
            self.last_activated = self.activation_order.last().copied();
        }
        self.has_active_changed_at_least_once = true;

        if self.activation_order.is_empty() {
            self.auto_play_on_emptied();
        }

        let (indexes, values) = self.payload_for(&targets);
        tracing::debug!(method = METHOD, ?indexes, "deactivated multiple");
        self.emit(ActiveListEventKind::DeactivatedMultiple { indexes, values });
        self.start_cooldown(METHOD, &opts, cooldown_id)
    }

    pub fn toggle_by_index(&mut self, index: usize, opts: ActionOptions<T>) -> Result<()> {
        self.toggle_at("toggle_by_index", index, opts)
    }

    /// Toggle the first content equal to `item`.
    pub fn toggle(&mut self, item: &T, opts: ActionOptions<T>) -> Result<()> {
        let index = self.find_value("toggle", item)?;
        self.toggle_at("toggle", index, opts)
    }

    fn toggle_at(&mut self, method: &'static str, index: usize, opts: ActionOptions<T>) -> Result<()> {
        self.check_index(method, "index", index)?;
        if self.contents[index].is_active {
            self.deactivate_at(method, index, opts)
        } else {
            self.activate_at(method, index, opts)
        }
    }

    pub(crate) fn activate_at(
        &mut self,
        method: &'static str,
        index: usize,
        opts: ActionOptions<T>,
    ) -> Result<()> {
        self.check_index(method, "index", index)?;
        let id = self.contents[index].id;
        if self.is_id_active(id) {
            return Ok(());
        }
        if self.is_cooling_down_for(&opts) {
            tracing::debug!(method, index, "dropped during cooldown");
            return Ok(());
        }
        if let Some(limit) = self.max_activation_limit {
            if self.activation_order.len() >= limit {
                match self.limit_behavior {
                    LimitBehavior::Error => {
                        return Err(ActiveListError::ActivationLimitReached { method, limit });
                    }
                    LimitBehavior::Ignore => {
                        tracing::debug!(method, index, limit, "activation ignored at limit");
                        return Ok(());
                    }
                    LimitBehavior::Circular if limit == 0 => return Ok(()),
                    LimitBehavior::Circular => {}
                }
            }
        }

        self.auto_play_on_user_interaction(&opts);

        // A subscriber notified of an autoplay stop may have moved, removed,
        // or activated the target.
        let Some(index) = self.index_of_id(id) else {
            return Ok(());
        };
        if self.is_id_active(id) {
            return Ok(());
        }

        self.direction = direction_towards(
            self.last_activated_index(),
            index,
            self.contents.len(),
            self.is_circular,
        );

        let mut evicted = None;
        if let Some(limit) = self.max_activation_limit {
            while limit > 0 && self.activation_order.len() >= limit {
                evicted = Some(self.activation_order.remove(0));
            }
        }
        let (deactivated_index, deactivated_value) = evicted
            .and_then(|old| {
                self.index_of_id(old)
                    .map(|i| (i, self.contents[i].value.clone()))
            })
            .unzip();
        if evicted.is_some() {
            self.last_deactivated = evicted;
        }

        self.activation_order.push(id);
        self.last_activated = Some(id);
        self.has_active_changed_at_least_once = true;

        tracing::debug!(
            method,
            index,
            ?deactivated_index,
            direction = %self.direction,
            "activated"
        );
        let value = self.contents[index].value.clone();
        self.emit(ActiveListEventKind::Activated {
            index,
            value,
            deactivated_index,
            deactivated_value,
        });
        self.start_cooldown(method, &opts, id)
    }

    pub(crate) fn deactivate_at(
        &mut self,
        method: &'static str,
        index: usize,
        opts: ActionOptions<T>,
    ) -> Result<()> {
        self.check_index(method, "index", index)?;
        let id = self.contents[index].id;
        if !self.is_id_active(id) {
            return Ok(());
        }
        if self.is_cooling_down_for(&opts) {
            tracing::debug!(method, index, "dropped during cooldown");
            return Ok(());
        }

        self.auto_play_on_user_interaction(&opts);
        if !self.is_id_active(id) {
            return Ok(());
        }

        self.activation_order.retain(|active| *active != id);
        self.last_deactivated = Some(id);
        if self.last_activated == Some(id) {
            self.last_activated = self.activation_order.last().copied();
        }
        self.has_active_changed_at_least_once = true;

        if self.activation_order.is_empty() {
            self.auto_play_on_emptied();
        }

        let Some(index) = self.index_of_id(id) else {
            return Ok(());
        };
        tracing::debug!(method, index, "deactivated");
        let value = self.contents[index].value.clone();
        self.emit(ActiveListEventKind::Deactivated { index, value });
        self.start_cooldown(method, &opts, id)
    }

    /// Neighbor of the last activated item in `direction`.
    pub(crate) fn step_target(&self, direction: Direction) -> Option<usize> {
        let len = self.contents.len();
        let Some(last) = self.last_activated_index() else {
            return Some(0);
        };
        match direction {
            Direction::Next if last + 1 < len => Some(last + 1),
            Direction::Next if self.is_circular => Some(0),
            Direction::Previous if last > 0 => Some(last - 1),
            Direction::Previous if self.is_circular => Some(len - 1),
            _ => None,
        }
    }

    fn inactive_candidates(&self, matches: &[ContentId]) -> Vec<ContentId> {
        matches
            .iter()
            .copied()
            .filter(|id| self.index_of_id(*id).is_some() && !self.is_id_active(*id))
            .collect()
    }

    fn plan_batch_activation(&self, candidates: &[ContentId]) -> BatchPlan {
        let mut plan = BatchPlan {
            order: self.activation_order.clone(),
            ..BatchPlan::default()
        };
        for &id in candidates {
            if let Some(limit) = self.max_activation_limit {
                if plan.order.len() >= limit {
                    match self.limit_behavior {
                        LimitBehavior::Circular if limit > 0 => {
                            let oldest = plan.order.remove(0);
                            match plan.added.iter().position(|added| *added == oldest) {
                                Some(pos) => {
                                    plan.added.remove(pos);
                                }
                                None => plan.evicted.push(oldest),
                            }
                        }
                        LimitBehavior::Error => {
                            plan.limit_hit = true;
                            break;
                        }
                        _ => break,
                    }
                }
            }
            plan.order.push(id);
            plan.added.push(id);
        }
        plan
    }

    fn limit_result(&self, method: &'static str, limit_hit: bool) -> Result<()> {
        match (limit_hit, self.max_activation_limit) {
            (true, Some(limit)) => Err(ActiveListError::ActivationLimitReached { method, limit }),
            _ => Ok(()),
        }
    }
}
