//! Inclusive calendar-day ranges and the global bounds of a picker.
//!
//! [`DateRange`] never exposes an inverted pair: every constructor orders its
//! endpoints. [`Bounds`] is the host supplied `[min, max]` window every
//! selection is clamped into.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CalendarDate, DayCount};

/// An inclusive range of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRange", into = "RawRange")]
pub struct DateRange {
    start: CalendarDate,
    end: CalendarDate,
}

/// Unchecked wire form, reordered on the way in.
#[derive(Serialize, Deserialize)]
struct RawRange {
    start: CalendarDate,
    end: CalendarDate,
}

impl From<RawRange> for DateRange {
    fn from(raw: RawRange) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl From<DateRange> for RawRange {
    fn from(range: DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl DateRange {
    /// Create a range from two endpoints in any order.
    #[must_use]
    pub fn new(a: CalendarDate, b: CalendarDate) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// A one-day range.
    #[must_use]
    pub const fn single(day: CalendarDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// A window of `radius` days on each side of `center`.
    #[must_use]
    pub fn around(center: CalendarDate, radius: DayCount) -> Self {
        let radius = radius.abs().get();
        Self {
            start: center.add_days(-radius),
            end: center.add_days(radius),
        }
    }

    /// The whole month containing `day`.
    #[must_use]
    pub fn month_of(day: CalendarDate) -> Self {
        Self {
            start: day.first_of_month(),
            end: day.last_of_month(),
        }
    }

    #[must_use]
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Whether `day` lies within the range, endpoints included.
    #[must_use]
    pub fn contains(&self, day: CalendarDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Whether the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Common days of both ranges, `None` when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        self.overlaps(other).then(|| Self {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Number of days covered, both endpoints included.
    #[must_use]
    pub fn len(&self) -> DayCount {
        self.start.days_until(self.end) + DayCount(1)
    }

    /// A range always covers at least one day.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether start and end are the same day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Endpoints as `YYYY-MM-DD` strings `(start, end)`.
    #[must_use]
    pub fn to_day_strings(&self) -> (String, String) {
        (self.start.to_string(), self.end.to_string())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Global inclusive bounds of a picker.
///
/// Inverted input is swapped, never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds(DateRange);

impl Bounds {
    /// Create bounds from `min` and `max`, swapping them if inverted.
    #[must_use]
    pub fn new(min: CalendarDate, max: CalendarDate) -> Self {
        Self(DateRange::new(min, max))
    }

    /// Default bounds spanning `[min_year-01-01, (max_year - 1)-12-31]`.
    #[must_use]
    pub fn from_years(min_year: i32, max_year: i32) -> Self {
        let min = CalendarDate::from_ymd(min_year, 1, 1);
        let max = CalendarDate::from_ymd(max_year - 1, 12, 31);
        match (min, max) {
            (Some(min), Some(max)) => Self::new(min, max),
            _ => Self(DateRange::single(CalendarDate::today())),
        }
    }

    #[must_use]
    pub const fn min(&self) -> CalendarDate {
        self.0.start()
    }

    #[must_use]
    pub const fn max(&self) -> CalendarDate {
        self.0.end()
    }

    /// The bounds as a date range.
    #[must_use]
    pub const fn as_range(&self) -> DateRange {
        self.0
    }

    /// Whether `day` is within the bounds, both ends included.
    #[must_use]
    pub fn contains(&self, day: CalendarDate) -> bool {
        self.0.contains(day)
    }

    /// Clamp `day` to the nearer bound when outside.
    #[must_use]
    pub fn clamp(&self, day: CalendarDate) -> CalendarDate {
        day.clamp(self.min(), self.max())
    }

    /// Clamp both endpoints of `range` into the bounds.
    #[must_use]
    pub fn clamp_range(&self, range: DateRange) -> DateRange {
        DateRange::new(self.clamp(range.start()), self.clamp(range.end()))
    }

    /// Whether any day of the month containing `month` is within bounds.
    #[must_use]
    pub fn overlaps_month(&self, month: CalendarDate) -> bool {
        self.0.overlaps(&DateRange::month_of(month))
    }

    /// First and last selectable years.
    #[must_use]
    pub fn years(&self) -> (i32, i32) {
        (self.min().year(), self.max().year())
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min(), self.max())
    }
}
