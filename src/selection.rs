//! Selection model: what is selected, what may be selected.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::date_range::{Bounds, DateRange};
use crate::range::RangeSelection;
use crate::types::CalendarDate;

/// Picker flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    Range,
}

/// The current selection of a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Selection {
    Single { selected: CalendarDate },
    Range(RangeSelection),
}

impl Selection {
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        match self {
            Self::Single { .. } => SelectionMode::Single,
            Self::Range(_) => SelectionMode::Range,
        }
    }

    /// Selected days as a range (a one-day range in single mode).
    #[must_use]
    pub const fn selected_range(&self) -> DateRange {
        match self {
            Self::Single { selected } => DateRange::single(*selected),
            Self::Range(range) => range.selected(),
        }
    }

    /// Single mode: exact day match. Range mode: day within the range.
    #[must_use]
    pub fn is_selected(&self, day: CalendarDate) -> bool {
        match self {
            Self::Single { selected } => *selected == day,
            Self::Range(range) => range.selected().contains(day),
        }
    }

    /// The committed value handed to the host.
    #[must_use]
    pub const fn to_result(&self) -> PickerResult {
        match self {
            Self::Single { selected } => PickerResult::Single { date: *selected },
            Self::Range(range) => {
                let selected = range.selected();
                PickerResult::Range {
                    start: selected.start(),
                    end: selected.end(),
                }
            }
        }
    }
}

/// Committed picker value. Dates serialize as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PickerResult {
    Single {
        date: CalendarDate,
    },
    Range {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl PickerResult {
    /// Dates as day strings: `[date]` or `[start, end]`.
    #[must_use]
    pub fn to_day_strings(&self) -> Vec<String> {
        match self {
            Self::Single { date } => vec![date.to_string()],
            Self::Range { start, end } => vec![start.to_string(), end.to_string()],
        }
    }
}

/// Selection plus the bounds it lives in.
///
/// Every write clamps into the bounds, so a reachable selection never lies
/// outside `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    selection: Selection,
    bounds: Bounds,
}

impl SelectionModel {
    /// Single-day model, `day` clamped into `bounds`.
    #[must_use]
    pub fn single(day: CalendarDate, bounds: Bounds) -> Self {
        Self {
            selection: Selection::Single {
                selected: bounds.clamp(day),
            },
            bounds,
        }
    }

    /// Range model, both endpoints clamped into `bounds`.
    #[must_use]
    pub fn range(
        selected: DateRange,
        bounds: Bounds,
        max_selectable_days: Option<NonZeroU32>,
    ) -> Self {
        Self {
            selection: Selection::Range(RangeSelection::new(
                bounds.clamp_range(selected),
                max_selectable_days,
            )),
            bounds,
        }
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    #[must_use]
    pub fn is_selected(&self, day: CalendarDate) -> bool {
        self.selection.is_selected(day)
    }

    /// Days a click may currently land on.
    #[must_use]
    pub fn window(&self) -> DateRange {
        match &self.selection {
            Selection::Single { .. } => self.bounds.as_range(),
            Selection::Range(range) => range.window(&self.bounds),
        }
    }

    /// Whether `day` may be picked while `displayed_month` is on screen.
    ///
    /// Single mode additionally requires `day` to belong to the displayed
    /// month: overflow days are reached by navigating, not by clicking.
    #[must_use]
    pub fn is_selectable(&self, day: CalendarDate, displayed_month: CalendarDate) -> bool {
        if !self.window().contains(day) {
            return false;
        }
        match self.selection {
            Selection::Single { .. } => day.same_month(displayed_month),
            Selection::Range(_) => true,
        }
    }

    /// Replace the single selected day, clamped into bounds.
    ///
    /// Returns the applied day, or `None` for a range model.
    pub fn set_single(&mut self, day: CalendarDate) -> Option<CalendarDate> {
        match &mut self.selection {
            Selection::Single { selected } => {
                *selected = self.bounds.clamp(day);
                Some(*selected)
            }
            Selection::Range(_) => {
                warn!("set_single called on a range selection, ignoring {}", day);
                None
            }
        }
    }

    /// Feed one click to the range protocol.
    ///
    /// Returns the resulting range, or `None` for a single-day model.
    pub fn set_range_endpoint(&mut self, day: CalendarDate) -> Option<DateRange> {
        match &mut self.selection {
            Selection::Range(range) => Some(range.pick(day, &self.bounds)),
            Selection::Single { .. } => {
                warn!("set_range_endpoint called on a single selection, ignoring {}", day);
                None
            }
        }
    }

    /// Range protocol state, if in range mode.
    #[must_use]
    pub const fn range_selection(&self) -> Option<&RangeSelection> {
        match &self.selection {
            Selection::Range(range) => Some(range),
            Selection::Single { .. } => None,
        }
    }
}
