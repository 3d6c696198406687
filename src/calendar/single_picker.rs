//! Single-day picker: one month grid plus the year list.

use tracing::{debug, info};

use super::{
    year_key, ChangeCallback, DatePicker, DayView, Handled, KeyCommand, Navigation, PanelView,
    PickerCore, PickerEvent, PickerOptions, ResultCallback,
};
use crate::grid::MonthGrid;
use crate::selection::{PickerResult, Selection};
use crate::transition::{MonthTransition, TransitionScheduler};
use crate::types::CalendarDate;
use crate::year::YearSelector;

/// Picker for one day.
pub struct SingleDatePicker {
    core: PickerCore,
    years: YearSelector,
    year_list_open: bool,
}

impl SingleDatePicker {
    /// Build a picker showing the month of the (clamped) initial day.
    pub fn new(options: &PickerOptions, scheduler: Box<dyn TransitionScheduler>) -> Self {
        let selected = options.selection_model().selection().selected_range().start();
        let core = PickerCore::new(options, selected, 0, scheduler);
        let years = year_list(&core, selected);
        Self {
            core,
            years,
            year_list_open: false,
        }
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(&Selection) + Send + 'static) -> Self {
        self.core.on_change = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_result(
        mut self,
        callback: impl FnMut(Option<PickerResult>) + Send + 'static,
    ) -> Self {
        self.core.on_result = Some(Box::new(callback));
        self
    }

    /// Replace selection, bounds and displayed month from fresh options.
    pub fn reset(&mut self, options: &PickerOptions) {
        let selected = options.selection_model().selection().selected_range().start();
        self.core.reset(options, selected);
        self.years = year_list(&self.core, selected);
        self.year_list_open = false;
        self.core.notify_change();
    }

    fn selected(&self) -> CalendarDate {
        self.core.model.selection().selected_range().start()
    }

    /// First day of the displayed month.
    #[must_use]
    pub const fn current_month(&self) -> CalendarDate {
        self.core.current_month
    }

    /// Grid of the displayed month.
    #[must_use]
    pub fn grid(&self) -> MonthGrid {
        MonthGrid::build(self.core.current_month, self.core.week_start)
    }

    /// Grid sliding in while a transition is in flight.
    #[must_use]
    pub fn incoming_grid(&self) -> Option<MonthGrid> {
        self.core
            .transitions
            .pending()
            .map(|t| MonthGrid::build(t.target_month, self.core.week_start))
    }

    /// Render state of the displayed grid. Overflow days stay visible but
    /// never selectable.
    #[must_use]
    pub fn day_views(&self) -> Vec<DayView> {
        self.core.day_views(&self.grid(), false)
    }

    #[must_use]
    pub const fn year_selector(&self) -> &YearSelector {
        &self.years
    }

    #[must_use]
    pub const fn is_year_list_open(&self) -> bool {
        self.year_list_open
    }

    fn when_idle(&mut self, f: impl FnOnce(&mut Self) -> Handled) -> Handled {
        if self.core.transitions.is_transitioning() {
            debug!("Input muted during month transition");
            return Handled::Ignored;
        }
        f(self)
    }

    fn click(&mut self, day: CalendarDate) -> Handled {
        if self.year_list_open {
            return Handled::Ignored;
        }
        if !self.core.model.is_selectable(day, self.core.current_month) {
            debug!("Day {} is not selectable", day);
            return Handled::Ignored;
        }
        self.core.model.set_single(day);
        self.core.notify_change();
        Handled::Applied
    }

    /// Move the selection by `offset` days, clamped into bounds. Leaving the
    /// displayed month starts a transition to the new day's month.
    fn move_by(&mut self, offset: i64) -> Handled {
        let selected = self.selected();
        let target = self.core.model.bounds().clamp(selected.add_days(offset));
        if target == selected {
            return Handled::Ignored;
        }
        self.core.model.set_single(target);
        self.core.notify_change();
        self.core.show_month(target);
        Handled::Applied
    }

    fn toggle_year_list(&mut self) -> Handled {
        self.year_list_open = !self.year_list_open;
        if self.year_list_open {
            self.years = year_list(&self.core, self.selected());
        }
        debug!("Year list open: {}", self.year_list_open);
        Handled::Applied
    }

    /// Move the selection to `year`, keeping month and day where possible.
    fn apply_year(&mut self, year: i32) -> Handled {
        let target = self
            .core
            .model
            .bounds()
            .clamp(self.selected().with_year(year));
        self.year_list_open = false;
        self.core.model.set_single(target);
        self.years = year_list(&self.core, target);
        self.core.notify_change();
        info!("Year {} picked, selection {}", year, target);
        self.core.show_month(target);
        Handled::Applied
    }

    fn key(&mut self, key: KeyCommand) -> Handled {
        if self.year_list_open {
            if key == KeyCommand::Escape {
                self.year_list_open = false;
                return Handled::Applied;
            }
            let Some(year_key) = year_key(key) else {
                return Handled::Ignored;
            };
            return self.when_idle(|p| match p.years.handle_key(year_key) {
                Some(year) => p.apply_year(year),
                None => Handled::Applied,
            });
        }

        match key {
            KeyCommand::Enter => self.handle(PickerEvent::Confirm),
            KeyCommand::Escape => self.handle(PickerEvent::Cancel),
            _ => match key.day_offset() {
                Some(offset) => self.when_idle(|p| p.move_by(offset)),
                None => Handled::Ignored,
            },
        }
    }
}

fn year_list(core: &PickerCore, selected: CalendarDate) -> YearSelector {
    let (min_year, max_year) = core.model.bounds().years();
    YearSelector::new(min_year, max_year, selected.year())
}

impl DatePicker for SingleDatePicker {
    fn open(&mut self) {
        info!("Single picker opened on {}", self.selected());
        self.core.notify_change();
    }

    fn handle(&mut self, event: PickerEvent) -> Handled {
        if self.core.closed {
            return Handled::Closed;
        }
        if let Some(handled) = self.core.handle_common(event) {
            return handled;
        }
        match event {
            PickerEvent::DayClicked(day) => self.when_idle(|p| p.click(day)),
            PickerEvent::Key(key) => self.key(key),
            PickerEvent::ToggleYearSelector => self.toggle_year_list(),
            PickerEvent::YearPicked(year) => self.when_idle(|p| {
                let year = p.years.pick(year);
                p.apply_year(year)
            }),
            _ => Handled::Ignored,
        }
    }

    fn selection(&self) -> &Selection {
        self.core.model.selection()
    }

    fn navigation(&self) -> Navigation {
        self.core.navigation()
    }

    fn panels(&self) -> Vec<PanelView> {
        vec![self.core.panel_view(&self.grid(), false)]
    }

    fn transition(&self) -> Option<MonthTransition> {
        self.core.transitions.pending().copied()
    }

    fn outcome(&self) -> Option<PickerResult> {
        self.core.outcome
    }

    fn is_closed(&self) -> bool {
        self.core.closed
    }

    fn set_on_change(&mut self, callback: ChangeCallback) {
        self.core.on_change = Some(callback);
    }

    fn set_on_result(&mut self, callback: ResultCallback) {
        self.core.on_result = Some(callback);
    }

    fn close(&mut self) {
        self.core.transitions.cancel();
        self.core.closed = true;
    }
}
