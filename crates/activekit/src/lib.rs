#![forbid(unsafe_code)]

//! Activation state for ordered collections.
//!
//! An [`ActiveList`] holds an ordered sequence of values and tracks which of
//! them are active. The same engine drives tabs (one active item), carousels
//! (autoplay over a circular list), accordions (several open sections), and
//! checkbox-style selections (no limit).
//!
//! Every change is reported to subscribers as an [`ActiveListEvent`] and can
//! be kept in a bounded history. Time-based behavior (autoplay, cooldown)
//! runs on a logical [`Clock`]; hosts pump due timers with
//! [`ActiveList::poll_timers`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use activekit::{ActiveList, ActiveListConfig, AutoPlayConfig, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut carousel = ActiveList::with_clock(
//!     ActiveListConfig::new(["intro", "features", "pricing"])
//!         .with_active_indexes([0])
//!         .circular(true)
//!         .with_auto_play(AutoPlayConfig::new(Duration::from_secs(5))),
//!     clock.clone(),
//! )?;
//!
//! clock.advance(Duration::from_secs(5));
//! carousel.poll_timers()?;
//! assert_eq!(carousel.active(), vec!["features"]);
//! # Ok::<(), activekit::ActiveListError>(())
//! ```
//!
//! # Feature flags
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `serde` | Serialize/Deserialize for events and configuration enums |
//! | `policy-config` | [`ActiveListSettings`] loaded from TOML or JSON |

mod activation;
pub mod autoplay;
pub mod config;
pub mod content;
pub mod cooldown;
pub mod handlers;
pub mod list;
#[cfg(feature = "policy-config")]
pub mod settings;
mod structure;

pub use autoplay::{AutoPlayState, AutoPlayStatus};
pub use config::{
    ActionOptions, ActiveListConfig, AutoPlayConfig, DurationFn, DurationSource, InitialActive,
    LimitBehavior, Placement,
};
pub use content::{Content, ContentContext, ContentId, ContentMut};
pub use cooldown::CooldownStatus;
pub use handlers::EventHandlers;
pub use list::{ActiveList, Subscriber};
#[cfg(feature = "policy-config")]
pub use settings::{ActiveListSettings, AutoPlaySettings, LimitSetting, SettingsError};

pub use activekit_core::{
    ActiveListError, ActiveListEvent, ActiveListEventKind, ActiveListEventType, Clock, Direction,
    DirectionLabels, ManualClock, Result, SystemClock,
};
pub use activekit_runtime::SubscriberId;
