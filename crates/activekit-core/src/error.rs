//! Errors reported by active list operations.
//!
//! Every message is qualified as `ActiveList > <method> > <reason>` so a
//! failure can be traced back to the call that produced it.
//!
//! # Failure Modes
//!
//! | Error | Raised | Mutation before raise |
//! |-------|--------|-----------------------|
//! | `IndexOutOfBounds` | bad index argument | never |
//! | `ItemNotFound` | value or predicate lookup miss | never |
//! | `ActivationLimitReached` | `Error` limit behavior | prefix of a predicate batch |
//! | `CooldownDuration` | cooldown resolved to zero | the triggering change |
//! | `AutoPlayDuration` | autoplay duration resolved to zero | never on configure |

use core::fmt;

/// Errors from active list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveListError {
    /// An index argument did not point into the collection.
    IndexOutOfBounds {
        method: &'static str,
        /// Name of the offending argument (`index`, `from`, `to`, `a`, `b`).
        param: &'static str,
        index: usize,
        len: usize,
    },
    /// Activation was refused because the limit is reached and the limit
    /// behavior is `Error`.
    ActivationLimitReached { method: &'static str, limit: usize },
    /// No content matched the given value or predicate.
    ItemNotFound { method: &'static str },
    /// A cooldown resolved to a zero duration.
    CooldownDuration { method: &'static str },
    /// An autoplay duration resolved to a zero duration.
    AutoPlayDuration { method: &'static str },
}

impl ActiveListError {
    /// The public method that raised the error.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::IndexOutOfBounds { method, .. }
            | Self::ActivationLimitReached { method, .. }
            | Self::ItemNotFound { method }
            | Self::CooldownDuration { method }
            | Self::AutoPlayDuration { method } => method,
        }
    }

    pub(crate) const fn reason(&self) -> &'static str {
        match self {
            Self::IndexOutOfBounds { .. } => "out of bounds",
            Self::ActivationLimitReached { .. } => "activation limit reached",
            Self::ItemNotFound { .. } => "item not found",
            Self::CooldownDuration { .. } => "cooldown duration must be greater than zero",
            Self::AutoPlayDuration { .. } => "autoplay duration must be greater than zero",
        }
    }
}

impl fmt::Display for ActiveListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds {
                method,
                param,
                index,
                len,
            } => write!(
                f,
                "ActiveList > {method} > \"{param}\" is {} (got {index}, length {len})",
                self.reason()
            ),
            Self::ActivationLimitReached { method, limit } => {
                write!(f, "ActiveList > {method} > {} ({limit})", self.reason())
            }
            _ => write!(f, "ActiveList > {} > {}", self.method(), self.reason()),
        }
    }
}

impl std::error::Error for ActiveListError {}

/// Result alias for active list operations.
pub type Result<T> = core::result::Result<T, ActiveListError>;
