//! Two-click range selection.
//!
//! The first click anchors a one-day range, the second click closes it on
//! the other endpoint, in whichever order the two days fall. With a
//! `max_selectable_days` limit, the first click also narrows the selectable
//! window to the days still reachable from the anchor.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_range::{Bounds, DateRange};
use crate::types::{CalendarDate, DayCount};

/// Which click the protocol expects next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Awaiting {
    /// Next click anchors a new range
    #[default]
    First,
    /// Next click closes the range opened by the anchor
    Second,
}

/// How a day of the selected range is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeCell {
    /// One-day range, capped on both sides
    Single,
    /// First day of the range
    Start,
    /// Last day of the range
    End,
    /// Any day strictly inside, month edges included
    Middle,
}

/// Range selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSelection {
    selected: DateRange,
    selectable: Option<DateRange>,
    max_selectable_days: Option<NonZeroU32>,
    awaiting: Awaiting,
}

impl RangeSelection {
    /// A committed range waiting for a fresh anchor.
    #[must_use]
    pub const fn new(selected: DateRange, max_selectable_days: Option<NonZeroU32>) -> Self {
        Self {
            selected,
            selectable: None,
            max_selectable_days,
            awaiting: Awaiting::First,
        }
    }

    #[must_use]
    pub const fn selected(&self) -> DateRange {
        self.selected
    }

    /// Window narrowed by the max-days limit while the second click is pending.
    #[must_use]
    pub const fn selectable(&self) -> Option<DateRange> {
        self.selectable
    }

    #[must_use]
    pub const fn max_selectable_days(&self) -> Option<NonZeroU32> {
        self.max_selectable_days
    }

    #[must_use]
    pub const fn awaiting(&self) -> Awaiting {
        self.awaiting
    }

    /// Days a click may land on: `bounds` narrowed by the selectable window.
    #[must_use]
    pub fn window(&self, bounds: &Bounds) -> DateRange {
        let global = bounds.as_range();
        self.selectable
            .and_then(|w| w.intersect(&global))
            .unwrap_or(global)
    }

    /// Feed one click to the protocol and return the range it produces.
    ///
    /// `day` is clamped into the current window first, so a programmatic
    /// pick can never escape the bounds or the max-days limit.
    pub fn pick(&mut self, day: CalendarDate, bounds: &Bounds) -> DateRange {
        let window = self.window(bounds);
        let day = day.clamp(window.start(), window.end());

        match self.awaiting {
            Awaiting::First => {
                self.selected = DateRange::single(day);
                self.selectable = self.max_selectable_days.map(|n| {
                    let radius = DayCount(i64::from(n.get()) - 1);
                    bounds.clamp_range(DateRange::around(day, radius))
                });
                self.awaiting = Awaiting::Second;
                debug!("Range anchored at {} (window {:?})", day, self.selectable);
            }
            Awaiting::Second => {
                let anchor = self.selected.start();
                self.selected = DateRange::new(anchor, day);
                self.selectable = None;
                self.awaiting = Awaiting::First;
                debug!("Range closed: {}", self.selected);
            }
        }

        self.selected
    }

    /// Drawing shape of `day`, `None` when outside the selected range.
    #[must_use]
    pub fn cell(&self, day: CalendarDate) -> Option<RangeCell> {
        let range = self.selected;
        if !range.contains(day) {
            return None;
        }
        Some(match (day == range.start(), day == range.end()) {
            (true, true) => RangeCell::Single,
            (true, false) => RangeCell::Start,
            (false, true) => RangeCell::End,
            (false, false) => RangeCell::Middle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn wide_bounds() -> Bounds {
        Bounds::from_years(1900, 2100)
    }

    fn selection(start: &str, end: &str, max_days: Option<u32>) -> RangeSelection {
        RangeSelection::new(
            DateRange::new(date(start), date(end)),
            max_days.and_then(NonZeroU32::new),
        )
    }

    #[test]
    fn test_first_click_anchors_single_day() {
        let mut sel = selection("2022-01-01", "2022-01-05", None);
        let range = sel.pick(date("2022-01-10"), &wide_bounds());
        assert_eq!(range, DateRange::single(date("2022-01-10")));
        assert_eq!(sel.awaiting(), Awaiting::Second);
        assert!(sel.selectable().is_none());
    }

    #[test]
    fn test_forward_pair() {
        let mut sel = selection("2021-06-01", "2021-06-01", None);
        sel.pick(date("2022-01-01"), &wide_bounds());
        let range = sel.pick(date("2022-01-05"), &wide_bounds());
        assert_eq!(range, DateRange::new(date("2022-01-01"), date("2022-01-05")));
        assert_eq!(sel.awaiting(), Awaiting::First);
    }

    #[test]
    fn test_backward_pair_is_swapped() {
        let mut sel = selection("2021-06-01", "2021-06-01", None);
        sel.pick(date("2022-01-15"), &wide_bounds());
        let range = sel.pick(date("2022-01-08"), &wide_bounds());
        assert_eq!(range.start(), date("2022-01-08"));
        assert_eq!(range.end(), date("2022-01-15"));
    }

    #[test]
    fn test_same_day_twice_is_one_day_range() {
        let mut sel = selection("2021-06-01", "2021-06-01", None);
        sel.pick(date("2022-01-03"), &wide_bounds());
        let range = sel.pick(date("2022-01-03"), &wide_bounds());
        assert!(range.is_single_day());
        assert_eq!(sel.awaiting(), Awaiting::First);
    }

    #[test]
    fn test_max_days_window_and_reset() {
        let mut sel = selection("2022-01-01", "2022-01-05", Some(10));
        sel.pick(date("2021-12-31"), &wide_bounds());
        assert_eq!(
            sel.selectable(),
            Some(DateRange::new(date("2021-12-22"), date("2022-01-09")))
        );

        let range = sel.pick(date("2021-12-24"), &wide_bounds());
        assert_eq!(range, DateRange::new(date("2021-12-24"), date("2021-12-31")));
        assert!(sel.selectable().is_none());
    }

    #[test]
    fn test_max_days_window_clamped_to_bounds() {
        let bounds = Bounds::new(date("2022-01-01"), date("2022-01-31"));
        let mut sel = selection("2022-01-10", "2022-01-10", Some(7));
        sel.pick(date("2022-01-03"), &bounds);
        assert_eq!(
            sel.selectable(),
            Some(DateRange::new(date("2022-01-01"), date("2022-01-09")))
        );
    }

    #[test]
    fn test_second_click_clamped_into_window() {
        let mut sel = selection("2022-01-01", "2022-01-01", Some(3));
        sel.pick(date("2022-01-10"), &wide_bounds());
        let range = sel.pick(date("2022-03-01"), &wide_bounds());
        assert_eq!(range, DateRange::new(date("2022-01-10"), date("2022-01-12")));
    }

    #[test]
    fn test_cells() {
        let sel = selection("2021-12-30", "2022-01-02", None);
        assert_eq!(sel.cell(date("2021-12-30")), Some(RangeCell::Start));
        assert_eq!(sel.cell(date("2021-12-31")), Some(RangeCell::Middle));
        assert_eq!(sel.cell(date("2022-01-01")), Some(RangeCell::Middle));
        assert_eq!(sel.cell(date("2022-01-02")), Some(RangeCell::End));
        assert_eq!(sel.cell(date("2022-01-03")), None);

        let one = selection("2022-01-02", "2022-01-02", None);
        assert_eq!(one.cell(date("2022-01-02")), Some(RangeCell::Single));
    }
}
