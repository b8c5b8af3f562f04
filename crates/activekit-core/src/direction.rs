//! Navigation direction between activations.
//!
//! # Invariants
//!
//! 1. The reported direction and its opposite are always the configured
//!    label pair; labels are never mixed across pairs.
//! 2. On circular lists the shorter way round wins; equal distances resolve
//!    to [`Direction::Next`].
//! 3. With nothing activated before, the direction is [`Direction::Next`].

use core::fmt;

/// Direction of travel from the previously activated item to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    /// The other direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Next => Self::Previous,
            Self::Previous => Self::Next,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "next"),
            Self::Previous => write!(f, "previous"),
        }
    }
}

/// User-facing names for the two directions.
///
/// Tabs usually read `right`/`left`, vertical carousels `down`/`up`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionLabels {
    pub next: String,
    pub previous: String,
}

impl Default for DirectionLabels {
    fn default() -> Self {
        Self::new("right", "left")
    }
}

impl DirectionLabels {
    #[must_use]
    pub fn new(next: impl Into<String>, previous: impl Into<String>) -> Self {
        Self {
            next: next.into(),
            previous: previous.into(),
        }
    }

    /// Label for `direction`.
    #[must_use]
    pub fn label(&self, direction: Direction) -> &str {
        match direction {
            Direction::Next => &self.next,
            Direction::Previous => &self.previous,
        }
    }
}

/// Direction of travel from `last` to `index` in a collection of `len` items.
///
/// Non-circular: `Next` when `index > last`, otherwise `Previous`.
/// Circular: compares the forward distance `(index - last) mod len` with the
/// backward distance `(last - index) mod len` and picks the shorter one.
#[must_use]
pub fn direction_towards(last: Option<usize>, index: usize, len: usize, circular: bool) -> Direction {
    let Some(last) = last else {
        return Direction::Next;
    };

    if !circular || len == 0 {
        return if index >= last {
            Direction::Next
        } else {
            Direction::Previous
        };
    }

    let (index, last) = (index % len, last % len);
    let forward = (index + len - last) % len;
    let backward = (last + len - index) % len;
    if backward < forward {
        Direction::Previous
    } else {
        Direction::Next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels_are_right_left() {
        let labels = DirectionLabels::default();
        assert_eq!(labels.label(Direction::Next), "right");
        assert_eq!(labels.label(Direction::Previous), "left");
    }

    #[test]
    fn opposite_round_trips() {
        assert_eq!(Direction::Next.opposite(), Direction::Previous);
        assert_eq!(Direction::Next.opposite().opposite(), Direction::Next);
    }

    #[test]
    fn nothing_activated_goes_next() {
        assert_eq!(direction_towards(None, 0, 3, false), Direction::Next);
        assert_eq!(direction_towards(None, 2, 3, true), Direction::Next);
    }

    #[test]
    fn linear_compares_positions() {
        assert_eq!(direction_towards(Some(0), 2, 3, false), Direction::Next);
        assert_eq!(direction_towards(Some(2), 0, 3, false), Direction::Previous);
        assert_eq!(direction_towards(Some(1), 1, 3, false), Direction::Next);
    }

    #[test]
    fn circular_takes_shortest_way() {
        // 5 items, from 2 to 4: forward 2, backward 3.
        assert_eq!(direction_towards(Some(2), 4, 5, true), Direction::Next);
        // from 0 to 4: forward 4, backward 1.
        assert_eq!(direction_towards(Some(0), 4, 5, true), Direction::Previous);
        // from 4 to 0: forward 1.
        assert_eq!(direction_towards(Some(4), 0, 5, true), Direction::Next);
    }

    #[test]
    fn circular_tie_goes_next() {
        // 4 items, from 0 to 2: both ways are 2 steps.
        assert_eq!(direction_towards(Some(0), 2, 4, true), Direction::Next);
        assert_eq!(direction_towards(Some(3), 1, 4, true), Direction::Next);
    }

    proptest::proptest! {
        #[test]
        fn circular_choice_is_never_the_longer_way(
            len in 1usize..64,
            last in 0usize..64,
            index in 0usize..64,
        ) {
            let (last, index) = (last % len, index % len);
            let forward = (index + len - last) % len;
            let backward = (last + len - index) % len;
            let taken = match direction_towards(Some(last), index, len, true) {
                Direction::Next => forward,
                Direction::Previous => backward,
            };
            proptest::prop_assert_eq!(taken, forward.min(backward));
        }
    }
}
