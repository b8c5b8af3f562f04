//! Policy-as-data: list behavior loaded from TOML or JSON.
//!
//! [`ActiveListSettings`] captures the data-only part of an
//! [`ActiveListConfig`] (everything except contents, initial active items,
//! and duration functions). Every field is optional; [`apply`] overrides
//! only what the document sets.
//!
//! ```toml
//! is_circular = true
//! max_activation_limit = 3          # or `false` for unlimited
//! max_activation_limit_behavior = "ignore"
//! keep_history_for = 50
//! cooldown_ms = 300
//!
//! [auto_play]
//! duration_ms = 5000
//! stops_on_user_interaction = true
//!
//! [directions]
//! next = "down"
//! previous = "up"
//! ```
//!
//! [`apply`]: ActiveListSettings::apply

use std::fmt;
use std::time::Duration;

use activekit_core::DirectionLabels;
use serde::{Deserialize, Serialize};

use crate::config::{ActiveListConfig, AutoPlayConfig, LimitBehavior};

/// Activation limit as written in a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitSetting {
    /// A boolean means no limit.
    Unlimited(bool),
    Count(usize),
}

impl LimitSetting {
    #[must_use]
    pub const fn limit(self) -> Option<usize> {
        match self {
            Self::Unlimited(_) => None,
            Self::Count(n) => Some(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoPlaySettings {
    pub duration_ms: u64,
    #[serde(default)]
    pub stops_on_user_interaction: bool,
}

/// Data-only list configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActiveListSettings {
    pub is_circular: Option<bool>,
    pub max_activation_limit: Option<LimitSetting>,
    pub max_activation_limit_behavior: Option<LimitBehavior>,
    pub keep_history_for: Option<usize>,
    pub cooldown_ms: Option<u64>,
    pub auto_play: Option<AutoPlaySettings>,
    pub directions: Option<DirectionLabels>,
}

/// Failure to load settings.
#[derive(Debug)]
pub enum SettingsError {
    Toml(toml::de::Error),
    Json(serde_json::Error),
    /// A duration was given as zero milliseconds.
    ZeroDuration { field: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(e) => write!(f, "invalid TOML settings: {e}"),
            Self::Json(e) => write!(f, "invalid JSON settings: {e}"),
            Self::ZeroDuration { field } => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::ZeroDuration { .. } => None,
        }
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl ActiveListSettings {
    pub fn from_toml_str(input: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(input)?;
        settings.validate()
    }

    pub fn from_json_str(input: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(input)?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if self.cooldown_ms == Some(0) {
            return Err(SettingsError::ZeroDuration {
                field: "cooldown_ms",
            });
        }
        if self.auto_play.as_ref().is_some_and(|a| a.duration_ms == 0) {
            return Err(SettingsError::ZeroDuration {
                field: "auto_play.duration_ms",
            });
        }
        tracing::debug!(settings = ?self, "loaded active list settings");
        Ok(self)
    }

    /// Override the fields of `config` that these settings set.
    #[must_use]
    pub fn apply<T>(&self, mut config: ActiveListConfig<T>) -> ActiveListConfig<T> {
        if let Some(circular) = self.is_circular {
            config.is_circular = circular;
        }
        if let Some(limit) = self.max_activation_limit {
            config.max_activation_limit = limit.limit();
        }
        if let Some(behavior) = self.max_activation_limit_behavior {
            config.max_activation_limit_behavior = behavior;
        }
        if let Some(keep) = self.keep_history_for {
            config.keep_history_for = keep;
        }
        if let Some(ms) = self.cooldown_ms {
            config.cooldown = Some(Duration::from_millis(ms).into());
        }
        if let Some(auto_play) = &self.auto_play {
            config.auto_play = Some(
                AutoPlayConfig::new(Duration::from_millis(auto_play.duration_ms))
                    .stops_on_user_interaction(auto_play.stops_on_user_interaction),
            );
        }
        if let Some(directions) = &self.directions {
            config.directions = directions.clone();
        }
        config
    }
}
