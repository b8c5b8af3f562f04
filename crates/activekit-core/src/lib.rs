#![forbid(unsafe_code)]

//! Core types for activekit.
//!
//! This crate holds the vocabulary shared by the runtime plumbing and the
//! [`ActiveList`] aggregate:
//!
//! - [`ActiveListError`]: every failure an operation can report.
//! - [`ActiveListEvent`]: the tagged event stream emitted on each change.
//! - [`Direction`] / [`DirectionLabels`]: navigation direction and the
//!   user-facing labels for it, plus the shortest-path computation used for
//!   circular lists.
//! - [`Clock`]: the single logical clock timers are measured against.
//!
//! [`ActiveList`]: https://docs.rs/activekit

pub mod clock;
pub mod direction;
pub mod error;
pub mod event;

pub use clock::{Clock, ManualClock, SystemClock};
pub use direction::{Direction, DirectionLabels, direction_towards};
pub use error::{ActiveListError, Result};
pub use event::{ActiveListEvent, ActiveListEventKind, ActiveListEventType};
