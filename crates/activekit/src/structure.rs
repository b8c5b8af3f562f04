//! Structural edits: insertion, removal, swapping, and moving.
//!
//! Structural edits never change which items are active; they only shift
//! positions. Removing an active item is the exception: it leaves the
//! activation order with it, and emptying the active set this way stops
//! autoplay like a deactivation would.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Index past the end (`len` is allowed for insertion) | [`ActiveListError::IndexOutOfBounds`] naming the parameter |
//! | Value or predicate without a match | [`ActiveListError::ItemNotFound`] |
//!
//! Failed calls change nothing and emit nothing.

use activekit_core::{ActiveListError, ActiveListEventKind, Result};
use ahash::AHashSet;

use crate::config::Placement;
use crate::content::{ContentContext, ContentId};
use crate::list::ActiveList;

impl<T: Clone + PartialEq> ActiveList<T> {
    // --- Insertion ---

    /// Insert `value` at `index` (`0..=len`); returns its position.
    pub fn insert_at_index(&mut self, index: usize, value: T) -> Result<usize> {
        let len = self.contents.len();
        if index > len {
            return Err(ActiveListError::IndexOutOfBounds {
                method: "insert_at_index",
                param: "index",
                index,
                len,
            });
        }
        Ok(self.insert_content(index, value))
    }

    /// Append `value`; returns its position.
    pub fn push(&mut self, value: T) -> usize {
        let index = self.contents.len();
        self.insert_content(index, value)
    }

    /// Prepend `value`; returns its position.
    pub fn unshift(&mut self, value: T) -> usize {
        self.insert_content(0, value)
    }

    /// Insert `value` relative to the first content matching `predicate`.
    pub fn insert_by_predicate(
        &mut self,
        value: T,
        mut predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        placement: Placement,
    ) -> Result<usize> {
        let found = self.first_match(&mut predicate).ok_or(ActiveListError::ItemNotFound {
            method: "insert_by_predicate",
        })?;
        let index = match placement {
            Placement::At | Placement::Before => found,
            Placement::After => found + 1,
        };
        Ok(self.insert_content(index, value))
    }

    fn insert_content(&mut self, index: usize, value: T) -> usize {
        let content = self.new_content(value.clone());
        self.contents.insert(index, content);
        tracing::debug!(index, len = self.contents.len(), "inserted");
        self.emit(ActiveListEventKind::Inserted { index, value });
        self.auto_play_on_inserted();
        index
    }

    // --- Removal ---

    /// Remove the content at `index`, returning its value.
    pub fn remove_by_index(&mut self, index: usize) -> Result<T> {
        self.check_index("remove_by_index", "index", index)?;
        Ok(self.remove_single(index))
    }

    /// Remove the first content equal to `item`.
    pub fn remove(&mut self, item: &T) -> Result<T> {
        let index = self.find_value("remove", item)?;
        Ok(self.remove_single(index))
    }

    /// Remove the last content.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.contents.len().checked_sub(1)?;
        Some(self.remove_single(last))
    }

    /// Remove the first content.
    pub fn shift(&mut self) -> Option<T> {
        if self.contents.is_empty() {
            return None;
        }
        Some(self.remove_single(0))
    }

    /// Remove every content matching `predicate` as one `RemovedMultiple`
    /// event; returns the removed values in positional order.
    pub fn remove_by_predicate(
        &mut self,
        mut predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
    ) -> Vec<T> {
        let ids = self.matching_ids(&mut predicate);
        if ids.is_empty() {
            return Vec::new();
        }
        self.remove_many(&ids)
    }

    fn remove_single(&mut self, index: usize) -> T {
        let content = self.contents.remove(index);
        let was_active = self.detach(content.id);
        tracing::debug!(index, was_active, "removed");

        if was_active && self.activation_order.is_empty() {
            self.auto_play_on_emptied();
        }
        self.emit(ActiveListEventKind::Removed {
            index,
            value: content.value.clone(),
        });
        content.value
    }

    fn remove_many(&mut self, ids: &[ContentId]) -> Vec<T> {
        let doomed: AHashSet<ContentId> = ids.iter().copied().collect();
        let mut indexes = Vec::with_capacity(ids.len());
        let mut values = Vec::with_capacity(ids.len());
        let mut kept = Vec::with_capacity(self.contents.len() - ids.len());
        let mut was_active = false;

        for (index, content) in std::mem::take(&mut self.contents).into_iter().enumerate() {
            if doomed.contains(&content.id) {
                was_active |= self.detach(content.id);
                indexes.push(index);
                values.push(content.value);
            } else {
                kept.push(content);
            }
        }
        self.contents = kept;
        tracing::debug!(?indexes, was_active, "removed multiple");

        if was_active && self.activation_order.is_empty() {
            self.auto_play_on_emptied();
        }
        self.emit(ActiveListEventKind::RemovedMultiple {
            indexes,
            values: values.clone(),
        });
        values
    }

    /// Drop `id` from the activation state; returns whether it was active.
    fn detach(&mut self, id: ContentId) -> bool {
        let before = self.activation_order.len();
        self.activation_order.retain(|active| *active != id);
        if self.last_activated == Some(id) {
            self.last_activated = None;
        }
        if self.last_deactivated == Some(id) {
            self.last_deactivated = None;
        }
        self.activation_order.len() != before
    }

    // --- Swapping ---

    pub fn swap_by_index(&mut self, a: usize, b: usize) -> Result<()> {
        const METHOD: &str = "swap_by_index";
        self.check_index(METHOD, "a", a)?;
        self.check_index(METHOD, "b", b)?;
        self.swap_at(a, b);
        Ok(())
    }

    /// Swap the first contents equal to `a` and `b`.
    pub fn swap(&mut self, a: &T, b: &T) -> Result<()> {
        let a = self.find_value("swap", a)?;
        let b = self.find_value("swap", b)?;
        self.swap_at(a, b);
        Ok(())
    }

    /// Swap `index` with its successor, wrapping on circular lists.
    pub fn swap_with_next(&mut self, index: usize) -> Result<()> {
        self.check_index("swap_with_next", "index", index)?;
        let len = self.contents.len();
        let other = if index + 1 < len {
            index + 1
        } else if self.is_circular {
            0
        } else {
            return Ok(());
        };
        self.swap_at(index, other);
        Ok(())
    }

    /// Swap `index` with its predecessor, wrapping on circular lists.
    pub fn swap_with_previous(&mut self, index: usize) -> Result<()> {
        self.check_index("swap_with_previous", "index", index)?;
        let len = self.contents.len();
        let other = if index > 0 {
            index - 1
        } else if self.is_circular {
            len - 1
        } else {
            return Ok(());
        };
        self.swap_at(index, other);
        Ok(())
    }

    fn swap_at(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let value_a = self.contents[a].value.clone();
        let value_b = self.contents[b].value.clone();
        self.contents.swap(a, b);
        tracing::debug!(a, b, "swapped");
        self.emit(ActiveListEventKind::Swapped {
            a,
            b,
            value_a,
            value_b,
        });
    }

    // --- Moving ---

    /// Move the content at `from` so it ends up at `to`.
    pub fn move_by_index(&mut self, from: usize, to: usize) -> Result<()> {
        self.move_at("move_by_index", from, to)
    }

    /// Move the first content equal to `item` to `to`.
    pub fn move_item(&mut self, item: &T, to: usize) -> Result<()> {
        let from = self.find_value("move_item", item)?;
        self.move_at("move_item", from, to)
    }

    pub fn move_to_first(&mut self, index: usize) -> Result<()> {
        self.move_at("move_to_first", index, 0)
    }

    pub fn move_to_last(&mut self, index: usize) -> Result<()> {
        let last = self.contents.len().saturating_sub(1);
        self.move_at("move_to_last", index, last)
    }

    /// Move the content at `from` next to the first content matching
    /// `predicate`.
    ///
    /// The match is located before the move; `Before` and `After` are
    /// relative to it, so the moved item ends up adjacent to the match.
    pub fn move_by_index_by_predicate(
        &mut self,
        from: usize,
        predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        placement: Placement,
    ) -> Result<()> {
        self.move_relative("move_by_index_by_predicate", from, predicate, placement)
    }

    /// Move the first content equal to `item` next to the first content
    /// matching `predicate`.
    pub fn move_by_predicate(
        &mut self,
        item: &T,
        predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        placement: Placement,
    ) -> Result<()> {
        let from = self.find_value("move_by_predicate", item)?;
        self.move_relative("move_by_predicate", from, predicate, placement)
    }

    fn move_relative(
        &mut self,
        method: &'static str,
        from: usize,
        mut predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        placement: Placement,
    ) -> Result<()> {
        self.check_index(method, "from", from)?;
        let found = self
            .first_match(&mut predicate)
            .ok_or(ActiveListError::ItemNotFound { method })?;
        if found == from {
            return Ok(());
        }
        let to = match (placement, from < found) {
            (Placement::At, _) => found,
            (Placement::Before, true) => found - 1,
            (Placement::Before, false) | (Placement::After, true) => found,
            (Placement::After, false) => found + 1,
        };
        self.move_at(method, from, to)
    }

    fn move_at(&mut self, method: &'static str, from: usize, to: usize) -> Result<()> {
        self.check_index(method, "from", from)?;
        self.check_index(method, "to", to)?;
        if from == to {
            return Ok(());
        }
        let content = self.contents.remove(from);
        let value = content.value.clone();
        self.contents.insert(to, content);
        tracing::debug!(from, to, "moved");
        self.emit(ActiveListEventKind::Moved { from, to, value });
        Ok(())
    }

    fn first_match(
        &self,
        predicate: &mut impl FnMut(&ContentContext<'_, T>) -> bool,
    ) -> Option<usize> {
        (0..self.contents.len()).find(|&index| predicate(&self.context(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActionOptions, ActiveListConfig};
    use activekit_core::ActiveListEventType;

    fn list(active: &[usize]) -> ActiveList<&'static str> {
        ActiveList::new(
            ActiveListConfig::new(["a", "b", "c", "d"])
                .with_max_activation_limit(None)
                .with_active_indexes(active.iter().copied())
                .with_history(20),
        )
        .unwrap()
    }

    fn values(list: &ActiveList<&'static str>) -> Vec<&'static str> {
        list.contents().iter().map(|c| *c.value()).collect()
    }

    fn last_kind(list: &ActiveList<&'static str>) -> ActiveListEventKind<&'static str> {
        list.history().last().unwrap().kind.clone()
    }

    #[test]
    fn insert_keeps_active_items() {
        let mut l = list(&[1]);
        assert_eq!(l.insert_at_index(0, "z").unwrap(), 0);
        assert_eq!(l.active_indexes(), vec![2]);
        assert_eq!(l.last_activated_index(), Some(2));
        assert_eq!(l.push("y"), 5);
        assert_eq!(l.unshift("x"), 0);
        assert_eq!(values(&l), vec!["x", "z", "a", "b", "c", "d", "y"]);
        assert_eq!(last_kind(&l), ActiveListEventKind::Inserted { index: 0, value: "x" });
    }

    #[test]
    fn insert_past_end_fails() {
        let mut l = list(&[]);
        assert_eq!(
            l.insert_at_index(5, "z").unwrap_err(),
            ActiveListError::IndexOutOfBounds {
                method: "insert_at_index",
                param: "index",
                index: 5,
                len: 4
            }
        );
        assert_eq!(l.insert_at_index(4, "z").unwrap(), 4);
    }

    #[test]
    fn insert_by_predicate_placements() {
        let mut l = list(&[]);
        assert_eq!(
            l.insert_by_predicate("x", |c| *c.value == "c", Placement::Before).unwrap(),
            2
        );
        assert_eq!(
            l.insert_by_predicate("y", |c| *c.value == "c", Placement::After).unwrap(),
            4
        );
        assert_eq!(values(&l), vec!["a", "b", "x", "c", "y", "d"]);
        assert!(matches!(
            l.insert_by_predicate("q", |_| false, Placement::At),
            Err(ActiveListError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn removing_last_activated_clears_pointer() {
        let mut l = list(&[0, 2]);
        assert_eq!(l.remove_by_index(2).unwrap(), "c");
        assert_eq!(l.active(), vec!["a"]);
        assert_eq!(l.last_activated_index(), None);
        assert_eq!(last_kind(&l), ActiveListEventKind::Removed { index: 2, value: "c" });
    }

    #[test]
    fn pop_and_shift() {
        let mut l = list(&[]);
        assert_eq!(l.pop(), Some("d"));
        assert_eq!(l.shift(), Some("a"));
        assert_eq!(values(&l), vec!["b", "c"]);
        let mut empty = ActiveList::new(ActiveListConfig::<u8>::default()).unwrap();
        assert_eq!(empty.pop(), None);
        assert_eq!(empty.shift(), None);
    }

    #[test]
    fn remove_by_predicate_reports_old_positions() {
        let mut l = list(&[1, 3]);
        let removed = l.remove_by_predicate(|c| c.index % 2 == 1);
        assert_eq!(removed, vec!["b", "d"]);
        assert!(l.active().is_empty());
        assert_eq!(
            last_kind(&l),
            ActiveListEventKind::RemovedMultiple {
                indexes: vec![1, 3],
                values: vec!["b", "d"],
            }
        );
        assert!(l.remove_by_predicate(|_| false).is_empty());
    }

    #[test]
    fn remove_unknown_value() {
        let mut l = list(&[]);
        assert_eq!(
            l.remove(&"z").unwrap_err(),
            ActiveListError::ItemNotFound { method: "remove" }
        );
    }

    #[test]
    fn swap_reports_values_before_swap() {
        let mut l = list(&[0]);
        l.swap_by_index(0, 3).unwrap();
        assert_eq!(values(&l), vec!["d", "b", "c", "a"]);
        assert_eq!(l.active_indexes(), vec![3]);
        assert_eq!(
            last_kind(&l),
            ActiveListEventKind::Swapped {
                a: 0,
                b: 3,
                value_a: "a",
                value_b: "d",
            }
        );
    }

    #[test]
    fn swap_bounds_name_parameter() {
        let mut l = list(&[]);
        let err = l.swap_by_index(0, 9).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ActiveList > swap_by_index > \"b\" is out of bounds (got 9, length 4)"
        );
    }

    #[test]
    fn swap_with_neighbors() {
        let mut l = list(&[]);
        l.swap_with_next(3).unwrap();
        assert_eq!(values(&l), vec!["a", "b", "c", "d"]);
        l.swap_with_previous(1).unwrap();
        assert_eq!(values(&l), vec!["b", "a", "c", "d"]);

        let mut circular = ActiveList::new(ActiveListConfig::new(["a", "b", "c"]).circular(true)).unwrap();
        circular.swap_with_next(2).unwrap();
        assert_eq!(circular.contents()[0].value(), &"c");
        circular.swap_with_previous(0).unwrap();
        assert_eq!(circular.contents()[0].value(), &"a");
        assert_eq!(circular.contents()[2].value(), &"c");
    }

    #[test]
    fn move_shifts_neighbors() {
        let mut l = list(&[1]);
        l.move_by_index(0, 2).unwrap();
        assert_eq!(values(&l), vec!["b", "c", "a", "d"]);
        assert_eq!(l.active_indexes(), vec![0]);
        assert_eq!(last_kind(&l), ActiveListEventKind::Moved { from: 0, to: 2, value: "a" });
        l.move_to_last(0).unwrap();
        l.move_item(&"d", 0).unwrap();
        assert_eq!(values(&l), vec!["d", "c", "a", "b"]);
        l.move_to_first(2).unwrap();
        assert_eq!(values(&l), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn move_relative_to_match() {
        let mut l = list(&[]);
        l.move_by_index_by_predicate(0, |c| *c.value == "c", Placement::After)
            .unwrap();
        assert_eq!(values(&l), vec!["b", "c", "a", "d"]);
        l.move_by_predicate(&"d", |c| *c.value == "b", Placement::Before)
            .unwrap();
        assert_eq!(values(&l), vec!["d", "b", "c", "a"]);
        l.move_by_predicate(&"d", |c| *c.value == "a", Placement::At)
            .unwrap();
        assert_eq!(values(&l), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn move_onto_itself_is_silent() {
        let mut l = list(&[]);
        let before = l.history().len();
        l.move_by_index(1, 1).unwrap();
        l.move_by_index_by_predicate(1, |c| c.index == 1, Placement::After)
            .unwrap();
        assert_eq!(l.history().len(), before);
    }

    #[test]
    fn removing_last_active_stops_autoplay() {
        use crate::config::AutoPlayConfig;
        use std::time::Duration;

        let mut l = ActiveList::new(
            ActiveListConfig::new(["a", "b"])
                .with_active_indexes([0])
                .with_auto_play(AutoPlayConfig::new(Duration::from_secs(1)))
                .with_history(10),
        )
        .unwrap();
        l.remove_by_index(0).unwrap();
        let types: Vec<_> = l.history().skip(1).map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![ActiveListEventType::AutoPlayStopped, ActiveListEventType::Removed]
        );
        l.activate_by_index(0, ActionOptions::default()).unwrap();
        assert_eq!(l.active(), vec!["b"]);
    }
}
