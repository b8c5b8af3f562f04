//! Items of an [`ActiveList`] and the per-item facade.
//!
//! A [`Content`] wraps one value with its position and flags derived from
//! the list around it. The list refreshes every content after each change,
//! so the flags are always consistent when an event is emitted.
//!
//! [`ContentMut`] is a short-lived handle that pairs a mutable borrow of the
//! list with a content's stable [`ContentId`]. Its methods look up the
//! current index by id and delegate to the list's index-based operations, so
//! a handle keeps pointing at the same item after it moves.

use std::fmt;

use activekit_core::{ActiveListError, Result};

use crate::config::{ActionOptions, Placement};
use crate::list::ActiveList;

/// Stable identity of a content within one list.
///
/// Assigned on insertion and never reused by the same list, even across
/// [`ActiveList::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub(crate) u64);

impl ContentId {
    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// One item of an [`ActiveList`].
#[derive(Debug, Clone, PartialEq)]
pub struct Content<T> {
    pub(crate) id: ContentId,
    pub(crate) value: T,
    pub(crate) index: usize,
    pub(crate) is_active: bool,
    pub(crate) has_been_active_before: bool,
    pub(crate) is_first: bool,
    pub(crate) is_last: bool,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
    pub(crate) is_next: bool,
    pub(crate) is_previous: bool,
}

impl<T> Content<T> {
    pub(crate) fn new(id: ContentId, value: T) -> Self {
        Self {
            id,
            value,
            index: 0,
            is_active: false,
            has_been_active_before: false,
            is_first: false,
            is_last: false,
            has_next: false,
            has_previous: false,
            is_next: false,
            is_previous: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> ContentId {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Current position in the list.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether this content was ever active since the last initialization.
    #[inline]
    #[must_use]
    pub const fn has_been_active_before(&self) -> bool {
        self.has_been_active_before
    }

    #[inline]
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.is_first
    }

    #[inline]
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.is_last
    }

    /// Whether a next item exists; always true on circular lists.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Whether a previous item exists; always true on circular lists.
    #[inline]
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Whether this is the item after the last activated one.
    #[inline]
    #[must_use]
    pub const fn is_next(&self) -> bool {
        self.is_next
    }

    /// Whether this is the item before the last activated one.
    #[inline]
    #[must_use]
    pub const fn is_previous(&self) -> bool {
        self.is_previous
    }
}

/// Arguments handed to predicates and duration functions.
pub struct ContentContext<'a, T> {
    pub index: usize,
    pub value: &'a T,
    pub content: &'a Content<T>,
    pub list: &'a ActiveList<T>,
}

impl<T: fmt::Debug> fmt::Debug for ContentContext<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentContext")
            .field("index", &self.index)
            .field("value", self.value)
            .finish_non_exhaustive()
    }
}

/// Mutable handle to one content, see the [module docs](self).
pub struct ContentMut<'a, T> {
    pub(crate) list: &'a mut ActiveList<T>,
    pub(crate) id: ContentId,
}

impl<T: Clone + PartialEq> ContentMut<'_, T> {
    #[must_use]
    pub const fn id(&self) -> ContentId {
        self.id
    }

    /// The content, or `None` once it has been removed.
    #[must_use]
    pub fn content(&self) -> Option<&Content<T>> {
        self.list.content_by_id(self.id)
    }

    fn index(&self, method: &'static str) -> Result<usize> {
        self.list
            .index_of_id(self.id)
            .ok_or(ActiveListError::ItemNotFound { method })
    }

    pub fn activate(&mut self, opts: ActionOptions<T>) -> Result<()> {
        let index = self.index("activate")?;
        self.list.activate_by_index(index, opts)
    }

    pub fn deactivate(&mut self, opts: ActionOptions<T>) -> Result<()> {
        let index = self.index("deactivate")?;
        self.list.deactivate_by_index(index, opts)
    }

    pub fn toggle(&mut self, opts: ActionOptions<T>) -> Result<()> {
        let index = self.index("toggle")?;
        self.list.toggle_by_index(index, opts)
    }

    /// Remove this content from the list, returning its value.
    pub fn remove(self) -> Result<T> {
        let index = self.index("remove")?;
        self.list.remove_by_index(index)
    }

    /// Swap with the content at `other`.
    pub fn swap_with(&mut self, other: usize) -> Result<()> {
        let index = self.index("swap_with")?;
        self.list.swap_by_index(index, other)
    }

    pub fn swap_with_next(&mut self) -> Result<()> {
        let index = self.index("swap_with_next")?;
        self.list.swap_with_next(index)
    }

    pub fn swap_with_previous(&mut self) -> Result<()> {
        let index = self.index("swap_with_previous")?;
        self.list.swap_with_previous(index)
    }

    pub fn move_to_first(&mut self) -> Result<()> {
        let index = self.index("move_to_first")?;
        self.list.move_to_first(index)
    }

    pub fn move_to_last(&mut self) -> Result<()> {
        let index = self.index("move_to_last")?;
        self.list.move_to_last(index)
    }

    pub fn move_to_index(&mut self, to: usize) -> Result<()> {
        let index = self.index("move_to_index")?;
        self.list.move_by_index(index, to)
    }

    /// Move next to the first content matching `predicate`.
    pub fn move_by_predicate(
        &mut self,
        predicate: impl FnMut(&ContentContext<'_, T>) -> bool,
        placement: Placement,
    ) -> Result<()> {
        let index = self.index("move_by_predicate")?;
        self.list
            .move_by_index_by_predicate(index, predicate, placement)
    }
}

impl<T: fmt::Debug> fmt::Debug for ContentMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentMut").field("id", &self.id).finish()
    }
}
