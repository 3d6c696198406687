//! Month day grid: the 6×7 block of days a month panel renders.
//!
//! The grid always holds six full weeks so panels keep the same height from
//! month to month. Days before the 1st and after the last day of the month
//! are overflow days borrowed from the neighbouring months.

use chrono::Weekday;
use serde::Serialize;

use crate::types::CalendarDate;

/// Days in a week.
pub const DAYS_PER_WEEK: usize = 7;

/// Weeks in every grid.
pub const WEEKS_PER_GRID: usize = 6;

/// Cells in every grid.
pub const GRID_DAYS: usize = DAYS_PER_WEEK * WEEKS_PER_GRID;

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDay {
    pub date: CalendarDate,
    /// False for overflow days from the previous or next month
    pub in_current_month: bool,
}

/// The 42 days shown for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    month: CalendarDate,
    week_start: Weekday,
    days: Vec<GridDay>,
}

impl MonthGrid {
    /// Build the grid for the month containing `current_month`.
    ///
    /// The first cell is the last `week_start` weekday on or before the 1st.
    #[must_use]
    pub fn build(current_month: CalendarDate, week_start: Weekday) -> Self {
        let month = current_month.first_of_month();
        let lead = i64::from(month.weekday().days_since(week_start));
        let first_cell = month.add_days(-lead);

        let days = (0..GRID_DAYS as i64)
            .map(|offset| {
                let date = first_cell.add_days(offset);
                GridDay {
                    date,
                    in_current_month: date.same_month(month),
                }
            })
            .collect();

        Self {
            month,
            week_start,
            days,
        }
    }

    /// First day of the month this grid displays.
    #[must_use]
    pub const fn month(&self) -> CalendarDate {
        self.month
    }

    #[must_use]
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// All 42 cells in display order.
    #[must_use]
    pub fn days(&self) -> &[GridDay] {
        &self.days
    }

    /// The six rows of the grid.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridDay]> {
        self.days.chunks(DAYS_PER_WEEK)
    }

    /// First and last cell dates.
    #[must_use]
    pub fn span(&self) -> (CalendarDate, CalendarDate) {
        (self.days[0].date, self.days[GRID_DAYS - 1].date)
    }

    /// Cell for `date`, if the grid shows it.
    #[must_use]
    pub fn find(&self, date: CalendarDate) -> Option<&GridDay> {
        let (first, last) = self.span();
        if date < first || date > last {
            return None;
        }
        usize::try_from(first.days_until(date).get())
            .ok()
            .and_then(|index| self.days.get(index))
    }

    /// Column headers in display order.
    #[must_use]
    pub fn weekday_header(&self) -> [Weekday; DAYS_PER_WEEK] {
        weekday_order(self.week_start)
    }
}

/// The seven weekdays starting at `week_start`.
#[must_use]
pub fn weekday_order(week_start: Weekday) -> [Weekday; DAYS_PER_WEEK] {
    let mut order = [week_start; DAYS_PER_WEEK];
    for i in 1..DAYS_PER_WEEK {
        order[i] = order[i - 1].succ();
    }
    order
}
