//! Configuration management for calendar-engine

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transition::TransitionTiming;
use crate::types::Orientation;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Picker defaults
    pub calendar: CalendarConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Defaults applied when a host leaves an option out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// First year of the default bounds
    pub min_year: i32,

    /// Default bounds end on December 31st of the year before this one
    pub max_year: i32,

    /// First column of the day grid
    pub week_start: Weekday,

    /// Month transition animation length in milliseconds
    pub transition_duration_ms: u64,

    /// Slack before the fallback timer settles a transition
    pub settle_margin_ms: u64,

    /// Range picker panel layout
    pub orientation: Orientation,

    /// Longest range a second click may close (unset = unlimited)
    pub max_selectable_days: Option<u32>,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            min_year: 1900,
            max_year: 2100,
            week_start: Weekday::Sun,
            transition_duration_ms: 300,
            settle_margin_ms: 100,
            orientation: Orientation::default(),
            max_selectable_days: None,
        }
    }
}

impl CalendarConfig {
    /// Transition timing built from the millisecond settings
    #[must_use]
    pub const fn timing(&self) -> TransitionTiming {
        TransitionTiming {
            animation: Duration::from_millis(self.transition_duration_ms),
            margin: Duration::from_millis(self.settle_margin_ms),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        Ok(config_path)
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let calendar = &self.calendar;

        if calendar.min_year >= calendar.max_year {
            return Err(Error::config(format!(
                "min_year must be below max_year, got {} and {}",
                calendar.min_year, calendar.max_year
            )));
        }

        // chrono's NaiveDate covers roughly +/-262000 years
        if !(1..=9999).contains(&calendar.min_year) || !(1..=10000).contains(&calendar.max_year) {
            return Err(Error::config(format!(
                "years must lie within 1..=9999, got {}..{}",
                calendar.min_year, calendar.max_year
            )));
        }

        if calendar.transition_duration_ms > 10_000 {
            return Err(Error::config(format!(
                "transition_duration_ms should not exceed 10000, got {}",
                calendar.transition_duration_ms
            )));
        }

        if calendar.max_selectable_days == Some(0) {
            return Err(Error::config(
                "max_selectable_days must be at least 1 (omit it for no limit)",
            ));
        }

        // Validate log_level is a known level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        Ok(())
    }
}
