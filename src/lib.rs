//! # Calendar Engine
//!
//! Date-selection engine behind calendar picker dialogs.
//!
//! This crate provides:
//! - Month day grids with a configurable first weekday
//! - Single-day and two-click range selection, clamped into bounds
//! - Month transitions settled by animation end or a fallback timer
//! - A year selector and keyboard navigation
//! - A tokio driver feeding host input and timer deadlines to a picker
//!
//! Rendering is left to the host: pickers expose panels of [`calendar::DayView`]
//! cells, navigation affordances and the transition in flight.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod calendar;
pub mod config;
pub mod date_range;
pub mod display;
pub mod error;
pub mod grid;
pub mod range;
pub mod script;
pub mod selection;
pub mod transition;
pub mod types;
pub mod year;

pub use calendar::{
    DatePicker, PickerDriver, PickerEvent, PickerHandle, PickerOptions, PickerSnapshot,
};
pub use config::Config;
pub use date_range::{Bounds, DateRange};
pub use error::{Error, Result};
pub use selection::{PickerResult, Selection, SelectionMode};
pub use types::CalendarDate;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "calendar-engine";
