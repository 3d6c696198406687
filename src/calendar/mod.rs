//! Calendar controller: single-day and range pickers.
//!
//! Wires the day grid, selection model, transition controller and year
//! selector together and exposes the interface a dialog wrapper consumes:
//! initialization options, a live-change callback, a result callback and
//! navigation affordances.

mod driver;
mod keys;
mod range_picker;
mod single_picker;

pub use driver::{PickerDriver, PickerHandle, PickerSnapshot};
pub use keys::KeyCommand;
pub use range_picker::RangeDatePicker;
pub use single_picker::SingleDatePicker;

use std::num::NonZeroU32;

use chrono::Weekday;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CalendarConfig;
use crate::date_range::{Bounds, DateRange};
use crate::grid::{MonthGrid, DAYS_PER_WEEK};
use crate::range::RangeCell;
use crate::selection::{PickerResult, Selection, SelectionMode, SelectionModel};
use crate::transition::{MonthTransition, TransitionController, TransitionScheduler, TransitionTiming};
use crate::types::{CalendarDate, Orientation, TransitionId};
use crate::year::YearKey;

/// Live-change callback, called with the selection after every mutation.
pub type ChangeCallback = Box<dyn FnMut(&Selection) + Send>;

/// Result callback: `Some` on confirm, `None` on cancel.
pub type ResultCallback = Box<dyn FnMut(Option<PickerResult>) + Send>;

/// Everything a host supplies when opening a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    pub mode: SelectionMode,
    /// Selected day (single) or range start; `today` when absent
    pub start: Option<CalendarDate>,
    /// Range end; `start` when absent
    pub end: Option<CalendarDate>,
    pub min_date: Option<CalendarDate>,
    pub max_date: Option<CalendarDate>,
    pub max_selectable_days: Option<NonZeroU32>,
    pub today: CalendarDate,
    pub week_start: Weekday,
    pub orientation: Orientation,
    pub timing: TransitionTiming,
    /// Default bounds when `min_date`/`max_date` are absent
    pub min_year: i32,
    pub max_year: i32,
}

impl PickerOptions {
    /// Options for the given mode with configuration defaults.
    #[must_use]
    pub fn from_config(mode: SelectionMode, config: &CalendarConfig) -> Self {
        Self {
            mode,
            start: None,
            end: None,
            min_date: None,
            max_date: None,
            max_selectable_days: config.max_selectable_days.and_then(NonZeroU32::new),
            today: CalendarDate::today(),
            week_start: config.week_start,
            orientation: config.orientation,
            timing: config.timing(),
            min_year: config.min_year,
            max_year: config.max_year,
        }
    }

    /// Single-day picker opened on `day`.
    #[must_use]
    pub fn single(day: CalendarDate) -> Self {
        Self {
            start: Some(day),
            ..Self::from_config(SelectionMode::Single, &CalendarConfig::default())
        }
    }

    /// Range picker opened on `[start, end]`.
    #[must_use]
    pub fn range(start: CalendarDate, end: CalendarDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::from_config(SelectionMode::Range, &CalendarConfig::default())
        }
    }

    #[must_use]
    pub const fn with_bounds(mut self, min: CalendarDate, max: CalendarDate) -> Self {
        self.min_date = Some(min);
        self.max_date = Some(max);
        self
    }

    #[must_use]
    pub fn with_max_selectable_days(mut self, days: u32) -> Self {
        self.max_selectable_days = NonZeroU32::new(days);
        self
    }

    #[must_use]
    pub const fn with_today(mut self, today: CalendarDate) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub const fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Resolved bounds: host values, or the configured year span.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let defaults = Bounds::from_years(self.min_year, self.max_year);
        Bounds::new(
            self.min_date.unwrap_or_else(|| defaults.min()),
            self.max_date.unwrap_or_else(|| defaults.max()),
        )
    }

    /// Normalized selection model for these options.
    #[must_use]
    pub fn selection_model(&self) -> SelectionModel {
        let bounds = self.bounds();
        let start = self.start.unwrap_or(self.today);
        match self.mode {
            SelectionMode::Single => SelectionModel::single(start, bounds),
            SelectionMode::Range => {
                let end = self.end.unwrap_or(start);
                SelectionModel::range(DateRange::new(start, end), bounds, self.max_selectable_days)
            }
        }
    }
}

/// Input delivered to a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    DayClicked(CalendarDate),
    Key(KeyCommand),
    PrevMonth,
    NextMonth,
    /// Show or hide the year list (single picker)
    ToggleYearSelector,
    /// A year was clicked in the year list
    YearPicked(i32),
    /// The renderer finished animating a transition
    AnimationEnd(TransitionId),
    /// A transition's fallback deadline passed
    TransitionDeadline(TransitionId),
    Confirm,
    Cancel,
}

/// What a picker did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Applied,
    /// Dropped: muted during a transition, out of bounds, or meaningless
    Ignored,
    /// The picker delivered its result and accepts nothing more
    Closed,
}

/// Month and year of a displayed panel; formatting is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthLabel {
    pub year: i32,
    pub month: u32,
}

impl MonthLabel {
    #[must_use]
    pub fn of(day: CalendarDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    /// English `"November 2021"` label for hosts without a formatter.
    #[must_use]
    pub fn default_text(&self) -> String {
        CalendarDate::from_ymd(self.year, self.month, 1)
            .map_or_else(|| format!("{}-{:02}", self.year, self.month), |d| d.format("%B %Y"))
    }
}

/// Navigation affordances a host may bind its own controls to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub can_go_prev: bool,
    pub can_go_next: bool,
    /// Month in the last (or only) panel
    pub current_month: MonthLabel,
    pub transitioning: bool,
}

/// Render state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: CalendarDate,
    pub in_current_month: bool,
    /// Range panels hide overflow days entirely
    pub visible: bool,
    pub selectable: bool,
    pub selected: bool,
    pub range_cell: Option<RangeCell>,
}

/// One month panel ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub month: MonthLabel,
    pub header: [Weekday; DAYS_PER_WEEK],
    /// Six weeks of cells in display order
    pub days: Vec<DayView>,
}

/// Behaviour shared by both picker flavours.
pub trait DatePicker: Send {
    /// Emit the normalized initial selection through the change callback.
    fn open(&mut self);

    /// Feed one event to the picker.
    fn handle(&mut self, event: PickerEvent) -> Handled;

    fn selection(&self) -> &Selection;

    fn navigation(&self) -> Navigation;

    /// Panels currently on screen, left to right.
    fn panels(&self) -> Vec<PanelView>;

    /// The month transition in flight, for the renderer.
    fn transition(&self) -> Option<MonthTransition>;

    /// Result delivered on close, if the picker was confirmed.
    fn outcome(&self) -> Option<PickerResult>;

    fn is_closed(&self) -> bool;

    fn set_on_change(&mut self, callback: ChangeCallback);

    fn set_on_result(&mut self, callback: ResultCallback);

    /// Tear down: cancel any transition without delivering a result.
    fn close(&mut self);
}

/// State and plumbing common to single and range pickers.
struct PickerCore {
    model: SelectionModel,
    current_month: CalendarDate,
    week_start: Weekday,
    orientation: Orientation,
    /// Panels shown before `current_month` (0 single, 1 range)
    leading_panels: i32,
    transitions: TransitionController,
    on_change: Option<ChangeCallback>,
    on_result: Option<ResultCallback>,
    outcome: Option<PickerResult>,
    closed: bool,
}

impl PickerCore {
    fn new(
        options: &PickerOptions,
        current_month: CalendarDate,
        leading_panels: i32,
        scheduler: Box<dyn TransitionScheduler>,
    ) -> Self {
        Self {
            model: options.selection_model(),
            current_month: current_month.first_of_month(),
            week_start: options.week_start,
            orientation: options.orientation,
            leading_panels,
            transitions: TransitionController::new(options.timing, scheduler),
            on_change: None,
            on_result: None,
            outcome: None,
            closed: false,
        }
    }

    /// Replace selection, bounds and month wholesale.
    fn reset(&mut self, options: &PickerOptions, current_month: CalendarDate) {
        self.transitions.cancel();
        self.model = options.selection_model();
        self.current_month = current_month.first_of_month();
        self.week_start = options.week_start;
        self.orientation = options.orientation;
        self.outcome = None;
        self.closed = false;
    }

    fn notify_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.model.selection());
        }
    }

    fn first_shown_month(&self) -> CalendarDate {
        self.current_month.add_months(-self.leading_panels)
    }

    fn can_go_prev(&self) -> bool {
        self.model
            .bounds()
            .overlaps_month(self.first_shown_month().add_months(-1))
    }

    fn can_go_next(&self) -> bool {
        self.model
            .bounds()
            .overlaps_month(self.current_month.add_months(1))
    }

    fn navigation(&self) -> Navigation {
        Navigation {
            can_go_prev: self.can_go_prev(),
            can_go_next: self.can_go_next(),
            current_month: MonthLabel::of(self.current_month),
            transitioning: self.transitions.is_transitioning(),
        }
    }

    /// Prev/next month request; refused at the bounds or mid-transition.
    fn step_month(&mut self, delta: i32) -> Handled {
        let allowed = if delta < 0 {
            self.can_go_prev()
        } else {
            self.can_go_next()
        };
        if !allowed {
            debug!("Month navigation refused at bounds {}", self.model.bounds());
            return Handled::Ignored;
        }
        self.show_month(self.current_month.add_months(delta))
    }

    /// Start a transition so `target` becomes the current month.
    fn show_month(&mut self, target: CalendarDate) -> Handled {
        match self.transitions.begin(self.current_month, target) {
            Some(_) => Handled::Applied,
            None => Handled::Ignored,
        }
    }

    fn settle(&mut self, id: TransitionId, from_animation: bool) -> Handled {
        let settled = if from_animation {
            self.transitions.animation_finished(id)
        } else {
            self.transitions.deadline_elapsed(id)
        };
        match settled {
            Some(month) => {
                self.current_month = month;
                Handled::Applied
            }
            None => Handled::Ignored,
        }
    }

    fn finish(&mut self, result: Option<PickerResult>) -> Handled {
        self.transitions.cancel();
        self.outcome = result;
        self.closed = true;
        match result {
            Some(r) => info!("Picker confirmed: {:?}", r.to_day_strings()),
            None => info!("Picker cancelled"),
        }
        if let Some(callback) = self.on_result.as_mut() {
            callback(result);
        }
        Handled::Closed
    }

    /// Events every picker treats the same way, `None` for the rest.
    fn handle_common(&mut self, event: PickerEvent) -> Option<Handled> {
        let handled = match event {
            PickerEvent::AnimationEnd(id) => self.settle(id, true),
            PickerEvent::TransitionDeadline(id) => self.settle(id, false),
            PickerEvent::Confirm => {
                let result = self.model.selection().to_result();
                self.finish(Some(result))
            }
            PickerEvent::Cancel => self.finish(None),
            PickerEvent::PrevMonth | PickerEvent::Key(KeyCommand::PageUp) => {
                self.when_idle(|core| core.step_month(-1))
            }
            PickerEvent::NextMonth | PickerEvent::Key(KeyCommand::PageDown) => {
                self.when_idle(|core| core.step_month(1))
            }
            _ => return None,
        };
        Some(handled)
    }

    /// Run `f` unless a transition is in flight.
    fn when_idle(&mut self, f: impl FnOnce(&mut Self) -> Handled) -> Handled {
        if self.transitions.is_transitioning() {
            debug!("Input muted during month transition");
            return Handled::Ignored;
        }
        f(self)
    }

    fn panel_view(&self, grid: &MonthGrid, hide_overflow: bool) -> PanelView {
        PanelView {
            month: MonthLabel::of(grid.month()),
            header: grid.weekday_header(),
            days: self.day_views(grid, hide_overflow),
        }
    }

    /// Render state of every cell of `grid`.
    fn day_views(&self, grid: &MonthGrid, hide_overflow: bool) -> Vec<DayView> {
        let range = self.model.range_selection();
        grid.days()
            .iter()
            .map(|cell| {
                let visible = cell.in_current_month || !hide_overflow;
                DayView {
                    date: cell.date,
                    in_current_month: cell.in_current_month,
                    visible,
                    selectable: visible && self.model.is_selectable(cell.date, grid.month()),
                    selected: visible && self.model.is_selected(cell.date),
                    range_cell: range
                        .filter(|_| visible)
                        .and_then(|r| r.cell(cell.date)),
                }
            })
            .collect()
    }
}

/// Year key mapping used while the year list is open.
const fn year_key(key: KeyCommand) -> Option<YearKey> {
    match key {
        KeyCommand::Up | KeyCommand::Left => Some(YearKey::Up),
        KeyCommand::Down | KeyCommand::Right => Some(YearKey::Down),
        KeyCommand::Enter => Some(YearKey::Confirm),
        _ => None,
    }
}
