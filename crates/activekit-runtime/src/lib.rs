#![forbid(unsafe_code)]

//! Runtime plumbing for activekit.
//!
//! - [`EventBus`]: ordered subscriber list with snapshot dispatch, so
//!   callbacks may subscribe, unsubscribe, or re-enter the emitter while a
//!   notification is in flight.
//! - [`HistoryRing`]: bounded FIFO of recorded events.
//! - [`TimerSlot`]: a single cancellable one-shot deadline on a logical
//!   clock.
//!
//! None of these types know about the active list itself; they are generic
//! over the callback, entry, and clock representation.

pub mod bus;
pub mod history;
pub mod timer;

pub use bus::{EventBus, SubscriberId};
pub use history::HistoryRing;
pub use timer::TimerSlot;
