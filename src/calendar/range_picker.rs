//! Range picker: two side-by-side month panels sharing one transition.

use tracing::{debug, info};

use super::{
    ChangeCallback, DatePicker, DayView, Handled, KeyCommand, Navigation, PanelView, PickerCore,
    PickerEvent, PickerOptions, ResultCallback,
};
use crate::grid::MonthGrid;
use crate::range::RangeSelection;
use crate::selection::{PickerResult, Selection};
use crate::transition::{MonthTransition, TransitionScheduler};
use crate::types::{CalendarDate, Orientation};

/// Picker for a contiguous range of days.
///
/// The right panel shows `current_month`, the left panel the month before.
pub struct RangeDatePicker {
    core: PickerCore,
}

impl RangeDatePicker {
    /// Build a picker whose right panel shows the month of the range end.
    pub fn new(options: &PickerOptions, scheduler: Box<dyn TransitionScheduler>) -> Self {
        let end = options.selection_model().selection().selected_range().end();
        Self {
            core: PickerCore::new(options, end, 1, scheduler),
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

    /// Replace selection, bounds and displayed months from fresh options.
    pub fn reset(&mut self, options: &PickerOptions) {
        let end = options.selection_model().selection().selected_range().end();
        self.core.reset(options, end);
        self.core.notify_change();
    }

    /// First day of the right panel's month.
    #[must_use]
    pub const fn current_month(&self) -> CalendarDate {
        self.core.current_month
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.core.orientation
    }

    /// Range protocol state.
    #[must_use]
    pub const fn range(&self) -> Option<&RangeSelection> {
        self.core.model.range_selection()
    }

    fn grids_for(&self, month: CalendarDate) -> [MonthGrid; 2] {
        [
            MonthGrid::build(month.add_months(-1), self.core.week_start),
            MonthGrid::build(month, self.core.week_start),
        ]
    }

    /// Left and right grids.
    #[must_use]
    pub fn grids(&self) -> [MonthGrid; 2] {
        self.grids_for(self.core.current_month)
    }

    /// Grids sliding in while a transition is in flight.
    #[must_use]
    pub fn incoming_grids(&self) -> Option<[MonthGrid; 2]> {
        self.core
            .transitions
            .pending()
            .map(|t| self.grids_for(t.target_month))
    }

    /// Render state of both panels. Overflow days are hidden.
    #[must_use]
    pub fn day_views(&self) -> [Vec<DayView>; 2] {
        let [left, right] = self.grids();
        [
            self.core.day_views(&left, true),
            self.core.day_views(&right, true),
        ]
    }

    /// Panel month showing `day`, if any.
    fn panel_month_of(&self, day: CalendarDate) -> Option<CalendarDate> {
        let right = self.core.current_month;
        let left = right.add_months(-1);
        [left, right].into_iter().find(|m| day.same_month(*m))
    }

    fn click(&mut self, day: CalendarDate) -> Handled {
        let Some(month) = self.panel_month_of(day) else {
            debug!("Day {} is not shown in either panel", day);
            return Handled::Ignored;
        };
        if !self.core.model.is_selectable(day, month) {
            debug!("Day {} is outside the selectable window", day);
            return Handled::Ignored;
        }
        self.core.model.set_range_endpoint(day);
        self.core.notify_change();
        Handled::Applied
    }
}

impl DatePicker for RangeDatePicker {
    fn open(&mut self) {
        info!(
            "Range picker opened on {}",
            self.core.model.selection().selected_range()
        );
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
            PickerEvent::DayClicked(day) => {
                if self.core.transitions.is_transitioning() {
                    debug!("Click on {} muted during month transition", day);
                    return Handled::Ignored;
                }
                self.click(day)
            }
            PickerEvent::Key(KeyCommand::Enter) => self.handle(PickerEvent::Confirm),
            PickerEvent::Key(KeyCommand::Escape) => self.handle(PickerEvent::Cancel),
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
        self.grids_for(self.core.current_month)
            .iter()
            .map(|grid| self.core.panel_view(grid, true))
            .collect()
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

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::date_range::DateRange;
    use crate::range::{Awaiting, RangeCell};
    use crate::transition::ManualScheduler;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn picker(start: &str, end: &str) -> RangeDatePicker {
        let options = PickerOptions::range(date(start), date(end));
        RangeDatePicker::new(&options, Box::new(ManualScheduler::new()))
    }

    fn selected(picker: &RangeDatePicker) -> DateRange {
        picker.selection().selected_range()
    }

    fn click(picker: &mut RangeDatePicker, day: &str) -> Handled {
        picker.handle(PickerEvent::DayClicked(date(day)))
    }

    mod clicks {
        use super::*;

        #[test]
        fn forward_pair() {
            let mut p = picker("2022-01-10", "2022-01-12");
            click(&mut p, "2022-01-01");
            assert_eq!(selected(&p), DateRange::single(date("2022-01-01")));
            click(&mut p, "2022-01-05");
            assert_eq!(selected(&p), DateRange::new(date("2022-01-01"), date("2022-01-05")));
        }

        #[test]
        fn backward_pair() {
            let mut p = picker("2022-01-10", "2022-01-12");
            click(&mut p, "2022-01-15");
            click(&mut p, "2022-01-08");
            assert_eq!(selected(&p), DateRange::new(date("2022-01-08"), date("2022-01-15")));
            assert_eq!(p.range().unwrap().awaiting(), Awaiting::First);
        }

        #[test]
        fn clicks_span_both_panels() {
            let mut p = picker("2022-01-10", "2022-01-12");
            click(&mut p, "2021-12-30");
            click(&mut p, "2022-01-02");
            assert_eq!(selected(&p), DateRange::new(date("2021-12-30"), date("2022-01-02")));

            let [left, right] = p.day_views();
            let dec31 = left.iter().find(|v| v.date == date("2021-12-31")).unwrap();
            assert_eq!(dec31.range_cell, Some(RangeCell::Middle));
            let jan1 = right.iter().find(|v| v.date == date("2022-01-01")).unwrap();
            assert_eq!(jan1.range_cell, Some(RangeCell::Middle));
            let jan2 = right.iter().find(|v| v.date == date("2022-01-02")).unwrap();
            assert_eq!(jan2.range_cell, Some(RangeCell::End));
        }

        #[test]
        fn days_outside_panels_are_rejected() {
            let mut p = picker("2022-01-10", "2022-01-12");
            assert_eq!(click(&mut p, "2022-02-01"), Handled::Ignored);
            assert_eq!(click(&mut p, "2021-11-30"), Handled::Ignored);
            assert_eq!(selected(&p), DateRange::new(date("2022-01-10"), date("2022-01-12")));
        }

        #[test]
        fn overflow_days_are_hidden() {
            let p = picker("2022-01-10", "2022-01-12");
            let [_, right] = p.day_views();
            // 2022-01-01 is a Saturday: six hidden December days lead the grid
            assert!(right.iter().take(6).all(|v| !v.visible && !v.selectable));
            assert!(right.iter().take(6).all(|v| v.range_cell.is_none()));
        }

        #[test]
        fn every_click_notifies() {
            let count = Arc::new(Mutex::new(0));
            let counter = Arc::clone(&count);
            let mut p =
                picker("2022-01-10", "2022-01-12").on_change(move |_| *counter.lock().unwrap() += 1);
            click(&mut p, "2022-01-03");
            click(&mut p, "2022-01-03");
            assert_eq!(*count.lock().unwrap(), 2);
            assert!(selected(&p).is_single_day());
        }
    }

    #[test]
    fn max_selectable_days_window() {
        let options = PickerOptions::range(date("2022-01-01"), date("2022-01-05"))
            .with_max_selectable_days(10);
        let mut p = RangeDatePicker::new(&options, Box::new(ManualScheduler::new()));

        click(&mut p, "2021-12-31");
        assert_eq!(click(&mut p, "2021-12-21"), Handled::Ignored);
        assert_eq!(click(&mut p, "2022-01-10"), Handled::Ignored);
        assert_eq!(click(&mut p, "2022-01-09"), Handled::Applied);
        assert_eq!(selected(&p), DateRange::new(date("2021-12-31"), date("2022-01-09")));
    }

    #[test]
    fn initial_month_is_range_end() {
        let p = picker("2021-11-20", "2022-01-05");
        assert_eq!(p.current_month(), date("2022-01-01"));
        let [left, right] = p.grids();
        assert_eq!(left.month(), date("2021-12-01"));
        assert_eq!(right.month(), date("2022-01-01"));

        let views = p.panels();
        assert_eq!(views.len(), 2);
        assert_eq!((views[0].month.year, views[0].month.month), (2021, 12));
        assert_eq!((views[1].month.year, views[1].month.month), (2022, 1));
        assert_eq!(p.orientation(), Orientation::Landscape);
    }

    #[test]
    fn navigation_accounts_for_left_panel() {
        let options = PickerOptions::range(date("2022-02-03"), date("2022-02-05"))
            .with_bounds(date("2022-01-15"), date("2022-03-31"));
        let mut p = RangeDatePicker::new(&options, Box::new(ManualScheduler::new()));
        let nav = p.navigation();
        // January is already in the left panel
        assert!(!nav.can_go_prev);
        assert!(nav.can_go_next);

        assert_eq!(p.handle(PickerEvent::NextMonth), Handled::Applied);
        let t = p.transition().unwrap();
        assert_eq!(p.incoming_grids().unwrap()[1].month(), date("2022-03-01"));
        assert_eq!(click(&mut p, "2022-02-10"), Handled::Ignored);
        p.handle(PickerEvent::AnimationEnd(t.id));
        assert_eq!(p.current_month(), date("2022-03-01"));
        assert!(!p.navigation().can_go_next);
        assert!(p.navigation().can_go_prev);
    }

    #[test]
    fn enter_confirms_range() {
        let mut p = picker("2022-01-05", "2022-01-01");
        assert_eq!(p.handle(PickerEvent::Key(KeyCommand::Enter)), Handled::Closed);
        assert_eq!(
            p.outcome().unwrap().to_day_strings(),
            vec!["2022-01-01", "2022-01-05"]
        );
    }
}
