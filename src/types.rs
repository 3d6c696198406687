//! Domain-specific newtypes for type safety.
//!
//! This module provides strongly-typed wrappers for the calendar concepts the
//! engine passes around, so a day count can never be mixed up with a
//! transition id, and a calendar day can never be mistaken for an instant.
//! Uses `derive_more` to eliminate arithmetic boilerplate.

use std::fmt;
use std::ops::{AddAssign, Sub, SubAssign};
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};
use derive_more::{Add as DeriveAdd, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Textual form of a calendar day at every host boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Macros for reducing boilerplate
// ============================================================================

/// Generates common methods for numeric newtypes.
macro_rules! impl_newtype_common {
    ($type:ty, $inner:ty) => {
        impl $type {
            /// Create a new instance.
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Get the inner value.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }
    };
}

/// Generates Sub and assignment trait implementations.
macro_rules! impl_sub_traits {
    ($type:ty) => {
        impl Sub for $type {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl SubAssign for $type {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }
    };
}

// ============================================================================
// CalendarDate
// ============================================================================

/// A timezone-naive calendar day.
///
/// All comparisons are by calendar day. The textual form is `YYYY-MM-DD`, both
/// for `Display`/`FromStr` and for serde.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from its parts, `None` if the day does not exist.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date on the local wall clock.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The underlying chrono date.
    #[must_use]
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of month, 1-31.
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// First day of this date's month.
    #[must_use]
    pub fn first_of_month(self) -> Self {
        Self(self.0 - Days::new(u64::from(self.0.day() - 1)))
    }

    /// Last day of this date's month.
    #[must_use]
    pub fn last_of_month(self) -> Self {
        let first = self.first_of_month().0;
        first
            .checked_add_months(Months::new(1))
            .and_then(|last| last.pred_opt())
            .map_or(Self(NaiveDate::MAX), Self)
    }

    /// Shift by a signed number of days, saturating at the representable range.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map_or_else(
            || Self(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN }),
            Self,
        )
    }

    /// Shift by a signed number of months, keeping the day of month where it
    /// exists and clamping to the month's last day otherwise.
    #[must_use]
    pub fn add_months(self, months: i32) -> Self {
        let magnitude = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(magnitude)
        } else {
            self.0.checked_sub_months(magnitude)
        };
        shifted.map_or(self, Self)
    }

    /// Same month and day in another year, clamped to the month's length
    /// (29 February becomes 28 February in a common year).
    #[must_use]
    pub fn with_year(self, year: i32) -> Self {
        let month_start = NaiveDate::from_ymd_opt(year, self.month(), 1);
        month_start.map_or(self, |first| {
            let first = Self(first);
            let day = self.day().min(first.last_of_month().day());
            first.add_days(i64::from(day) - 1)
        })
    }

    /// Number of whole days from `self` to `other` (negative if `other` is earlier).
    #[must_use]
    pub fn days_until(self, other: Self) -> DayCount {
        DayCount((other.0 - self.0).num_days())
    }

    /// Month ordinal (`year * 12 + month - 1`), used to compare months.
    #[must_use]
    pub fn month_index(self) -> i64 {
        i64::from(self.year()) * 12 + i64::from(self.month()) - 1
    }

    /// Whether both dates fall in the same calendar month.
    #[must_use]
    pub fn same_month(self, other: Self) -> bool {
        self.month_index() == other.month_index()
    }

    /// Format with a chrono format string (month labels and the like).
    #[must_use]
    pub fn format(self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| Error::invalid_date(s))
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

// ============================================================================
// DayCount
// ============================================================================

/// A signed number of calendar days.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveAdd, From, Into,
)]
pub struct DayCount(pub i64);

impl_newtype_common!(DayCount, i64);
impl_sub_traits!(DayCount);

impl DayCount {
    /// Absolute distance in days.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.abs() {
            1 => write!(f, "{} day", self.0),
            _ => write!(f, "{} days", self.0),
        }
    }
}

// ============================================================================
// TransitionId
// ============================================================================

/// Identifies one month transition for the lifetime of a picker.
///
/// Ids increase monotonically, so a signal addressed to an already settled
/// transition can always be told apart from the one in flight.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Serialize, Deserialize,
)]
pub struct TransitionId(pub u64);

impl_newtype_common!(TransitionId, u64);

impl TransitionId {
    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Small enums
// ============================================================================

/// Which way the month panels slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Target month precedes the current one
    Left,
    /// Target month follows the current one
    Right,
}

/// Layout of the two range panels, passed through to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Panels side by side
    #[default]
    Landscape,
    /// Panels stacked
    Portrait,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    mod calendar_date {
        use super::*;

        #[test]
        fn parse_and_display() {
            let d = date("2021-11-09");
            assert_eq!((d.year(), d.month(), d.day()), (2021, 11, 9));
            assert_eq!(d.to_string(), "2021-11-09");
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!("2021-02-30".parse::<CalendarDate>().is_err());
            assert!("09/11/2021".parse::<CalendarDate>().is_err());
            assert!("".parse::<CalendarDate>().is_err());
        }

        #[test]
        fn month_edges() {
            assert_eq!(date("2024-02-14").first_of_month(), date("2024-02-01"));
            assert_eq!(date("2024-02-14").last_of_month(), date("2024-02-29"));
            assert_eq!(date("2023-02-14").last_of_month(), date("2023-02-28"));
            assert_eq!(date("2021-12-31").last_of_month(), date("2021-12-31"));
        }

        #[test]
        fn day_and_month_arithmetic() {
            assert_eq!(date("2021-12-31").add_days(1), date("2022-01-01"));
            assert_eq!(date("2022-01-01").add_days(-9), date("2021-12-23"));
            assert_eq!(date("2022-03-31").add_months(-1), date("2022-02-28"));
            assert_eq!(date("2021-11-09").add_months(2), date("2022-01-09"));
        }

        #[test]
        fn with_year_clamps_leap_day() {
            assert_eq!(date("2024-02-29").with_year(2023), date("2023-02-28"));
            assert_eq!(date("2021-11-09").with_year(2020), date("2020-11-09"));
        }

        #[test]
        fn days_until_is_signed() {
            assert_eq!(date("2022-01-01").days_until(date("2022-01-05")), DayCount(4));
            assert_eq!(date("2022-01-05").days_until(date("2022-01-01")), DayCount(-4));
        }

        #[test]
        fn month_comparison() {
            assert!(date("2021-11-01").same_month(date("2021-11-30")));
            assert!(!date("2021-11-30").same_month(date("2021-12-01")));
            assert!(date("2021-12-01").month_index() < date("2022-01-01").month_index());
        }

        #[test]
        fn serde_uses_day_strings() {
            let json = serde_json::to_string(&date("2022-01-05")).unwrap();
            assert_eq!(json, "\"2022-01-05\"");
            let back: CalendarDate = serde_json::from_str(&json).unwrap();
            assert_eq!(back, date("2022-01-05"));
            assert!(serde_json::from_str::<CalendarDate>("\"not a date\"").is_err());
        }
    }

    mod day_count {
        use super::*;

        #[test]
        fn arithmetic_and_display() {
            let mut c = DayCount::new(3) + DayCount::new(4);
            assert_eq!(c, DayCount(7));
            c -= DayCount(6);
            assert_eq!(c.to_string(), "1 day");
            assert_eq!(DayCount(-2).abs().to_string(), "2 days");
        }
    }

    #[test]
    fn transition_ids_increase() {
        let id = TransitionId::default();
        assert!(id.next() > id);
        assert_eq!(id.next().to_string(), "#1");
    }
}
